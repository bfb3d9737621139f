mod gateway;
mod theme;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use shopmcp_core::{MetafieldInput, MetafieldType, NewSmartCollection};
use tracing_subscriber::EnvFilter;

use crate::gateway::GatewayClient;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Parser)]
#[command(name = "shopmcp")]
#[command(about = "Command line client for the shopmcp gateway")]
struct Cli {
    /// Gateway base URL.
    #[arg(long, env = "MCP_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// API key sent as `x-api-key`.
    #[arg(long, env = "MCP_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Gateway and remote store health.
    Health,
    Products {
        #[arg(long)]
        limit: Option<u32>,
    },
    Product {
        id: u64,
    },
    /// Replace a product's tags.
    Tags {
        id: u64,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    Metafields {
        id: u64,
    },
    SetMetafield {
        id: u64,
        #[command(flatten)]
        metafield: MetafieldArgs,
    },
    Collections,
    Collection {
        id: u64,
    },
    /// Create a smart collection with one tag rule per keyword.
    CreateCollection {
        #[arg(long)]
        title: String,
        #[arg(long = "keyword", required = true)]
        keywords: Vec<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Set a metafield on every product whose title contains the keyword.
    SyncMetafield {
        #[arg(long)]
        keyword: String,
        #[command(flatten)]
        metafield: MetafieldArgs,
        #[arg(long)]
        limit: Option<u32>,
    },
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

#[derive(Debug, clap::Args)]
struct MetafieldArgs {
    #[arg(long)]
    namespace: String,
    #[arg(long)]
    key: String,
    #[arg(long)]
    value: String,
    #[arg(long = "type", default_value_t = MetafieldType::SingleLineTextField)]
    metafield_type: MetafieldType,
}

impl From<MetafieldArgs> for MetafieldInput {
    fn from(args: MetafieldArgs) -> Self {
        Self {
            namespace: args.namespace,
            key: args.key,
            value: args.value,
            metafield_type: args.metafield_type,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ThemeCommands {
    /// Generate the hero section and an HTML preview.
    Hero {
        #[arg(long, default_value = "theme")]
        out_dir: PathBuf,
        /// Use the built-in sample product instead of querying the gateway.
        #[arg(long)]
        offline: bool,
        /// Tags that qualify a product for the hero (default: MagSafe, Leather).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Generate `templates/index.json`.
    Index {
        #[arg(long, default_value = "theme")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("shopmcp: no command given, see --help");
        return Ok(());
    };

    let gateway = GatewayClient::new(&cli.base_url, cli.api_key.as_deref(), REQUEST_TIMEOUT_SECS)?;

    match command {
        Commands::Health => {
            let (status, body) = gateway.health().await?;
            print_json(&body)?;
            if !status.is_success() {
                anyhow::bail!("gateway reported {status}");
            }
        }
        Commands::Products { limit } => print_json(&gateway.list_products(limit).await?)?,
        Commands::Product { id } => print_json(&gateway.get_product(id).await?)?,
        Commands::Tags { id, tags } => print_json(&gateway.update_tags(id, &tags).await?)?,
        Commands::Metafields { id } => print_json(&gateway.get_metafields(id).await?)?,
        Commands::SetMetafield { id, metafield } => {
            let input = MetafieldInput::from(metafield);
            print_json(&gateway.set_metafield(id, &input).await?)?;
        }
        Commands::Collections => print_json(&gateway.list_collections().await?)?,
        Commands::Collection { id } => print_json(&gateway.get_collection(id).await?)?,
        Commands::CreateCollection {
            title,
            keywords,
            description,
        } => {
            let new = NewSmartCollection {
                title,
                rule_keywords: keywords,
                description,
            };
            print_json(&gateway.create_collection(&new).await?)?;
        }
        Commands::SyncMetafield {
            keyword,
            metafield,
            limit,
        } => {
            let input = MetafieldInput::from(metafield);
            print_json(&gateway.sync_metafield(&keyword, &input, limit).await?)?;
        }
        Commands::Theme { command } => match command {
            ThemeCommands::Hero {
                out_dir,
                offline,
                tags,
            } => theme::run_theme_hero(&gateway, &out_dir, offline, &tags).await?,
            ThemeCommands::Index { out_dir } => theme::run_theme_index(&out_dir)?,
        },
    }

    Ok(())
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
