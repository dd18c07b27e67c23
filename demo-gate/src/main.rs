use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_gate_axum::{GateConfig, GateState, gate_router, init, resolve_display_title};

mod server;

use crate::server::{ServerSettings, serve};

const DEFAULT_LOG_FILTER: &str = "demo_gate=debug,session_gate=debug,session_gate_axum=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install default CryptoProvider for rustls to prevent:
    // "no process-level CryptoProvider available -- call CryptoProvider::install_default() before this point"
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install default CryptoProvider");

    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GateConfig::from_env()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    // A configured title lookup that fails stops startup here
    let title = resolve_display_title(&config).await?;
    let gate = init(&config).await?;

    let settings = ServerSettings::from_env()?;
    tracing::debug!("Server settings: {:?}", settings);

    let state = GateState::new(gate, title, config.redirect_url.as_str());
    let app = gate_router(state, &settings.resource_path);

    serve(&settings, app).await
}
