use super::*;

fn product(id: u64, title: &str, tags: &[&str], image: Option<&str>) -> Product {
    Product {
        id,
        title: title.to_owned(),
        handle: title.to_lowercase().replace(' ', "-"),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        images: image
            .map(|src| ProductImage {
                id: None,
                src: src.to_owned(),
                alt: None,
                extra: serde_json::Map::new(),
            })
            .into_iter()
            .collect(),
        vendor: None,
        product_type: None,
        created_at: None,
        updated_at: None,
        extra: serde_json::Map::new(),
    }
}

fn default_tags() -> Vec<String> {
    DEFAULT_HERO_TAGS.iter().map(|t| (*t).to_owned()).collect()
}

#[test]
fn hero_prefers_first_tag_match_ignoring_case() {
    let products = vec![
        product(1, "Plain Case", &["Silicone"], Some("https://cdn/1.jpg")),
        product(2, "Wallet", &["magsafe-compatible"], None),
        product(3, "Leather Case", &["Leather"], Some("https://cdn/3.jpg")),
    ];

    let hero = select_hero_product(&products, &default_tags()).expect("hero");
    assert_eq!(hero.id, 2);
}

#[test]
fn hero_falls_back_to_first_product_with_image() {
    let products = vec![
        product(1, "No Image", &["Silicone"], None),
        product(2, "Has Image", &["Silicone"], Some("https://cdn/2.jpg")),
    ];

    let hero = select_hero_product(&products, &default_tags()).expect("hero");
    assert_eq!(hero.id, 2);
}

#[test]
fn hero_is_none_without_match_or_images() {
    let products = vec![product(1, "Bare", &[], None)];
    assert!(select_hero_product(&products, &default_tags()).is_none());
    assert!(select_hero_product(&[], &default_tags()).is_none());
}

#[test]
fn preview_escapes_product_fields() {
    let hero = product(
        9,
        "<script>alert(1)</script> & Co",
        &["A\"B", "C"],
        Some("https://cdn/img.jpg?w=1&h=2"),
    );

    let html = render_preview_html(Some(&hero)).expect("render");
    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;alert(1)"));
    assert!(html.contains("&amp; Co"));
    assert!(!html.contains("A\"B"));
    assert!(html.contains("w=1&amp;h=2"));
}

#[test]
fn preview_uses_fallback_content_without_product() {
    let html = render_preview_html(None).expect("render");
    assert!(html.contains(FALLBACK_TITLE));
    assert!(html.contains("/products/magsafe-leather-series"));
    assert!(html.contains("photo-1511707171634-5f897ff02aa9"));
    assert!(html.contains("<dd>None</dd>"));
}

#[test]
fn preview_does_not_expand_template_syntax_in_values() {
    let mut hero = product(3, "Case {{ product_handle }}", &["MagSafe"], None);
    hero.handle = "case-handle".to_owned();

    let html = render_preview_html(Some(&hero)).expect("render");
    assert!(html.contains("Case {{ product_handle }}"));
    assert!(html.contains("<dd>MagSafe</dd>"));
    assert!(html.contains("/products/case-handle"));
}

#[test]
fn section_file_ends_with_schema_block() {
    let section = render_hero_section().expect("render");
    assert!(section.starts_with("<section class=\"hero-section"));
    assert!(section.contains("{% comment %} Section Schema {% endcomment %}\n{% schema %}\n{"));
    assert!(section.trim_end().ends_with("{% endschema %}"));

    let start = section.find("{% schema %}").expect("schema start") + "{% schema %}".len();
    let end = section.find("{% endschema %}").expect("schema end");
    let schema: Value = serde_json::from_str(section[start..end].trim()).expect("schema json");
    assert_eq!(schema["name"], "Hero Section");
    assert_eq!(schema["presets"][0]["category"], "Custom Sections");
}

#[test]
fn schema_declares_every_setting_the_markup_reads() {
    let schema = section_schema();
    let ids: Vec<&str> = schema["settings"]
        .as_array()
        .expect("settings")
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();

    for id in [
        "headline",
        "subheadline",
        "product_title",
        "product_handle",
        "primary_cta",
        "primary_cta_link",
        "secondary_cta",
        "secondary_cta_link",
        "show_badge",
        "badge_text",
        "show_trust_indicators",
        "show_scroll_indicator",
    ] {
        assert!(ids.contains(&id), "missing setting {id}");
        assert!(
            HERO_SECTION_LIQUID.contains(&format!("section.settings.{id}")),
            "markup does not use {id}"
        );
    }
}

#[test]
fn index_template_orders_sections() {
    let index = index_template();
    let order: Vec<&str> = index["order"]
        .as_array()
        .expect("order")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(
        order,
        ["hero_product", "featured_collections", "trust_block", "newsletter_signup"]
    );
    for name in order {
        assert!(index["sections"][name]["type"].is_string(), "{name} has no type");
    }
    assert_eq!(index["sections"]["hero_product"]["type"], "hero-product");
}

#[test]
fn write_theme_file_creates_parent_directories() {
    let out_dir =
        std::env::temp_dir().join(format!("shopmcp-theme-test-{}", std::process::id()));
    let path = write_theme_file(&out_dir, INDEX_FILE, "{}").expect("write");

    assert_eq!(path, out_dir.join("templates").join("index.json"));
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    std::fs::remove_dir_all(&out_dir).ok();
}
