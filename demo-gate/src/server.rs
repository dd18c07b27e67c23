use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_ADDR_PORT: &str = "0.0.0.0:3000";
const DEFAULT_RESOURCE_PATH: &str = "./resources";

/// Listener settings, read from `GATE_ADDR_PORT`, `GATE_RESOURCE_PATH`,
/// `GATE_TLS_CERT_PATH` and `GATE_TLS_KEY_PATH`
#[derive(Debug)]
pub(crate) struct ServerSettings {
    pub(crate) addr: SocketAddr,
    pub(crate) resource_path: PathBuf,
    pub(crate) tls: Option<(PathBuf, PathBuf)>,
}

impl ServerSettings {
    pub(crate) fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let addr = non_empty_var("GATE_ADDR_PORT")
            .unwrap_or_else(|| DEFAULT_ADDR_PORT.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("GATE_ADDR_PORT: {e}"))?;

        let resource_path = non_empty_var("GATE_RESOURCE_PATH")
            .unwrap_or_else(|| DEFAULT_RESOURCE_PATH.to_string())
            .into();

        let tls = match (
            non_empty_var("GATE_TLS_CERT_PATH"),
            non_empty_var("GATE_TLS_KEY_PATH"),
        ) {
            (Some(cert), Some(key)) => Some((cert.into(), key.into())),
            (None, None) => None,
            _ => {
                return Err(
                    "GATE_TLS_CERT_PATH and GATE_TLS_KEY_PATH must be set together".into(),
                );
            }
        };

        Ok(Self {
            addr,
            resource_path,
            tls,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

pub(crate) async fn serve(
    settings: &ServerSettings,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    match &settings.tls {
        Some((cert, key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;
            tracing::info!("HTTPS server listening on {}", settings.addr);
            axum_server::bind_rustls(settings.addr, config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!("HTTP server listening on {}", settings.addr);
            axum_server::bind(settings.addr)
                .serve(app.into_make_service())
                .await?;
        }
    }
    Ok(())
}
