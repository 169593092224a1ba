mod ats;
mod config;
mod errors;
mod extract;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::catalogue::RoleCatalogue;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume ATS v{}", env!("CARGO_PKG_VERSION"));

    let catalogue = load_catalogue(&config)?;
    info!(
        "Role catalogue loaded: {} roles, {} keywords",
        catalogue.roles().len(),
        catalogue.total_keyword_count()
    );

    let state = AppState::new(config.clone(), catalogue);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Built-in catalogue unless `ROLE_CATALOGUE_PATH` points at a JSON file.
fn load_catalogue(config: &Config) -> Result<RoleCatalogue> {
    match &config.role_catalogue_path {
        Some(path) => RoleCatalogue::from_json_file(path)
            .with_context(|| format!("Failed to load role catalogue from {}", path.display())),
        None => Ok(RoleCatalogue::builtin()),
    }
}
