mod agent;
mod config;
mod conversations;
mod error;
mod handlers;
mod routes;
mod state;
mod translate;
mod websocket;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("polyglot_chat_backend=debug,tower_http=debug")),
        )
        .init();

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.jsonld".to_string()),
        Some("conf.yaml".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let config = match Config::load_first(&config_paths)? {
        Some((config, path)) => {
            info!("Loaded configuration from: {}", path);
            config
        }
        None => {
            warn!("No config file found (tried {:?}), using defaults", config_paths);
            Config::default()
        }
    };

    let app_state = AppState::new(config.clone())?;
    let app = routes::build_app(app_state);

    let host = config.system_config.host.as_str();
    let port = config.system_config.port;
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
