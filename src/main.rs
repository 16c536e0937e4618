pub mod types;
pub mod config;
pub mod data;
pub mod processing;
pub mod render;
pub mod events;
pub mod session;
pub mod handlers;
pub mod dispatch;
pub mod spatial;
pub mod context;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the globe, the destination map and the session API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Override the routes CSV (path or URL) from the config file
        #[arg(long, value_name = "SRC")]
        routes: Option<String>,
    },
    /// Print the destination map for a click on ORIGIN as JSON
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        #[arg(long, value_name = "SRC")]
        routes: Option<String>,
        /// Origin name as shown on the globe; omit for the initial empty map
        #[arg(short, long)]
        origin: Option<String>,
    },
}

fn load_config(path: &Path, routes: Option<&str>) -> anyhow::Result<config::AppConfig> {
    let mut app_config = config::AppConfig::load_from_file(path)?;
    if let Some(src) = routes {
        app_config.input.routes_csv = src.to_string();
    }
    Ok(app_config)
}

async fn load_context(app_config: &config::AppConfig) -> anyhow::Result<context::AppContext> {
    let dataset = data::load_dataset(&app_config.routes_source()).await?;
    if dataset.is_empty() {
        warn!("Routes table is empty; the globe will have no origins");
    }
    Ok(context::AppContext::new(dataset))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config, routes } => {
            let app_config = load_config(config, routes.as_deref())?;
            let context = load_context(&app_config).await?;
            server::start_server(app_config, context).await?;
        }
        Commands::Render { config, routes, origin } => {
            let app_config = load_config(config, routes.as_deref())?;
            let context = load_context(&app_config).await?;

            // Same path as a click from the globe
            let dispatcher = dispatch::Dispatcher::with_default_handlers();
            let mut session = session::Session::new("cli");
            let payload = origin.as_deref().map(events::EventData::labelled);
            dispatcher.dispatch(&context, &mut session, events::EventSource::GlobeClick, payload.as_ref());

            println!("{}", serde_json::to_string_pretty(session.map())?);
        }
    }

    Ok(())
}
