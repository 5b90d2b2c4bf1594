//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::middleware::Cors;
use backend::settings::AppSettings;
use server::{ServerConfig, build_adapters, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;
    let cors = Cors::new(settings.cors_allow_origin())
        .wrap_err_with(|| format!("invalid CORS origin {}", settings.cors_allow_origin()))?;
    if settings.allow_body_identity {
        warn!("body identity fallback enabled; do not use in production");
    }

    let adapters = build_adapters(&settings).await?;
    let config = ServerConfig::new(bind_addr, adapters)
        .with_cors(cors)
        .with_body_identity(settings.allow_body_identity);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "feedback server listening");
    server.await.wrap_err("server terminated with an error")
}
