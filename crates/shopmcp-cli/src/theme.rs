//! Storefront theme file generation.
//!
//! Produces a hero section (Liquid markup plus its `{% schema %}` block),
//! a standalone HTML preview of that section, and the home page
//! `templates/index.json` layout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use askama::Template;
use serde_json::{json, Value};
use shopmcp_core::{Product, ProductImage};

use crate::gateway::GatewayClient;

pub(crate) const HERO_PRODUCT_FETCH_LIMIT: u32 = 50;
pub(crate) const DEFAULT_HERO_TAGS: &[&str] = &["MagSafe", "Leather"];

const HERO_SECTION_LIQUID: &str = include_str!("../templates/hero-product.liquid");

const SAMPLE_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=1200&h=800&fit=crop";
const FALLBACK_TITLE: &str = "Explore MagSafe Leather Cases";
const FALLBACK_HANDLE: &str = "magsafe-leather-series";
const BADGE_TEXT: &str = "Ships in 24H ⏱️ | COD Available";
const HEADLINE: &str = "Your Phone Deserves Better.";
const SUBHEADLINE: &str =
    "Explore curated, premium cases engineered for grip, style & performance.";

pub(crate) const SECTION_FILE: &str = "sections/hero-product.liquid";
pub(crate) const PREVIEW_FILE: &str = "hero-section-preview.html";
pub(crate) const INDEX_FILE: &str = "templates/index.json";

/// Picks the product to feature in the hero section.
///
/// The first product with a tag containing any wanted tag (ignoring case)
/// wins. Failing that, the first product with at least one image.
pub(crate) fn select_hero_product<'a>(
    products: &'a [Product],
    wanted_tags: &[String],
) -> Option<&'a Product> {
    let wanted: Vec<String> = wanted_tags.iter().map(|t| t.to_lowercase()).collect();

    products
        .iter()
        .find(|p| {
            p.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                wanted.iter().any(|w| tag.contains(w.as_str()))
            })
        })
        .or_else(|| products.iter().find(|p| !p.images.is_empty()))
}

/// Built-in product used by `--offline` runs.
pub(crate) fn sample_product() -> Product {
    Product {
        id: 0,
        title: "Premium MagSafe Leather Case for iPhone 15 Pro".to_owned(),
        handle: "premium-magsafe-leather-case-iphone-15-pro".to_owned(),
        tags: ["MagSafe", "Leather", "iPhone 15", "Premium"]
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
        images: vec![ProductImage {
            id: None,
            src: format!("{SAMPLE_IMAGE_URL}&crop=center"),
            alt: None,
            extra: serde_json::Map::new(),
        }],
        vendor: Some("Kraftokase".to_owned()),
        product_type: None,
        created_at: None,
        updated_at: None,
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn section_schema() -> Value {
    json!({
        "name": "Hero Section",
        "tag": "section",
        "class": "hero-section",
        "settings": [
            { "type": "header", "content": "Content Settings" },
            { "type": "text", "id": "headline", "label": "Main Headline", "default": HEADLINE },
            { "type": "textarea", "id": "subheadline", "label": "Subheadline", "default": SUBHEADLINE },
            { "type": "header", "content": "Product Settings" },
            { "type": "text", "id": "product_title", "label": "Product Title (overrides subheadline)" },
            { "type": "image_picker", "id": "product_image", "label": "Product Background Image" },
            { "type": "text", "id": "product_handle", "label": "Product Handle (for CTA link)" },
            { "type": "header", "content": "Call-to-Action" },
            { "type": "text", "id": "primary_cta", "label": "Primary CTA Text", "default": "Shop Now" },
            { "type": "url", "id": "primary_cta_link", "label": "Primary CTA Link (if no product)" },
            { "type": "text", "id": "secondary_cta", "label": "Secondary CTA Text", "default": "See Bestsellers" },
            {
                "type": "url",
                "id": "secondary_cta_link",
                "label": "Secondary CTA Link",
                "default": "/collections/magsafe-leather-series"
            },
            { "type": "header", "content": "Background" },
            { "type": "image_picker", "id": "background_image", "label": "Background Image (overrides product image)" },
            { "type": "header", "content": "Display Options" },
            { "type": "checkbox", "id": "show_badge", "label": "Show Badge", "default": true },
            { "type": "text", "id": "badge_text", "label": "Badge Text", "default": BADGE_TEXT },
            { "type": "checkbox", "id": "show_trust_indicators", "label": "Show Trust Indicators", "default": true },
            { "type": "checkbox", "id": "show_scroll_indicator", "label": "Show Scroll Indicator", "default": true }
        ],
        "presets": [
            { "name": "Hero Section", "category": "Custom Sections" }
        ]
    })
}

/// Full section file: markup followed by the schema block.
pub(crate) fn render_hero_section() -> anyhow::Result<String> {
    let schema = serde_json::to_string_pretty(&section_schema())?;
    Ok(format!(
        "{}\n{{% comment %}} Section Schema {{% endcomment %}}\n{{% schema %}}\n{schema}\n{{% endschema %}}\n",
        HERO_SECTION_LIQUID.trim_end()
    ))
}

/// Standalone page showing the hero with the selected product filled in.
#[derive(Template)]
#[template(path = "hero-preview.html")]
struct HeroPreview<'a> {
    product_title: &'a str,
    product_handle: &'a str,
    product_image: &'a str,
    product_tags: &'a str,
}

pub(crate) fn render_preview_html(product: Option<&Product>) -> anyhow::Result<String> {
    let tags = match product {
        Some(p) if !p.tags.is_empty() => p.tags.join(", "),
        _ => "None".to_owned(),
    };

    let preview = HeroPreview {
        product_title: product.map_or(FALLBACK_TITLE, |p| p.title.as_str()),
        product_handle: product.map_or(FALLBACK_HANDLE, |p| p.handle.as_str()),
        product_image: product
            .and_then(Product::primary_image)
            .unwrap_or(SAMPLE_IMAGE_URL),
        product_tags: &tags,
    };
    Ok(preview.render()?)
}

/// Home page layout referencing the hero section and its siblings.
pub(crate) fn index_template() -> Value {
    json!({
        "sections": {
            "hero_product": {
                "type": "hero-product",
                "settings": {
                    "headline": HEADLINE,
                    "subheadline": SUBHEADLINE,
                    "product_title": "Premium MagSafe Leather Case for iPhone 15 Pro",
                    "product_handle": "premium-magsafe-leather-case-iphone-15-pro",
                    "primary_cta": "Shop Now",
                    "secondary_cta": "See Bestsellers",
                    "secondary_cta_link": "/collections/magsafe-leather-series",
                    "show_badge": true,
                    "badge_text": BADGE_TEXT,
                    "show_trust_indicators": true,
                    "show_scroll_indicator": true
                }
            },
            "featured_collections": {
                "type": "featured-collections",
                "settings": {
                    "title": "Shop by Category",
                    "subtitle": "Find the perfect case for your device"
                }
            },
            "trust_block": {
                "type": "trust-block",
                "settings": {
                    "title": "Why Choose Kraftokase?",
                    "show_trust_indicators": true
                }
            },
            "newsletter_signup": {
                "type": "newsletter-signup",
                "settings": {
                    "title": "Stay Updated",
                    "subtitle": "Get notified about new products and exclusive offers"
                }
            }
        },
        "order": ["hero_product", "featured_collections", "trust_block", "newsletter_signup"]
    })
}

/// Writes `contents` to `out_dir/relative`, creating parent directories.
pub(crate) fn write_theme_file(
    out_dir: &Path,
    relative: &str,
    contents: &str,
) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Generates the hero section and its preview.
///
/// Without `offline`, products come from the gateway. A gateway failure is
/// logged and the section falls back to generic content.
pub(crate) async fn run_theme_hero(
    gateway: &GatewayClient,
    out_dir: &Path,
    offline: bool,
    tags: &[String],
) -> anyhow::Result<()> {
    let wanted: Vec<String> = if tags.is_empty() {
        DEFAULT_HERO_TAGS.iter().map(|t| (*t).to_owned()).collect()
    } else {
        tags.to_vec()
    };

    let hero = if offline {
        Some(sample_product())
    } else {
        match gateway.products(HERO_PRODUCT_FETCH_LIMIT).await {
            Ok(products) => select_hero_product(&products, &wanted).cloned(),
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch products; using fallback hero content");
                None
            }
        }
    };

    let section_path = write_theme_file(out_dir, SECTION_FILE, &render_hero_section()?)?;
    let preview_path = write_theme_file(out_dir, PREVIEW_FILE, &render_preview_html(hero.as_ref())?)?;

    match &hero {
        Some(product) => println!("hero product: {} ({})", product.title, product.handle),
        None => println!("hero product: none (using fallback content)"),
    }
    println!("wrote {}", section_path.display());
    println!("wrote {}", preview_path.display());
    Ok(())
}

pub(crate) fn run_theme_index(out_dir: &Path) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(&index_template())?;
    let path = write_theme_file(out_dir, INDEX_FILE, &contents)?;
    println!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
