use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use procrastination_sort::config::Config;
use procrastination_sort::routes::build_router;
use procrastination_sort::state::AppState;
use procrastination_sort::SortOptions;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("procrastination_sort={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Procrastination Sort v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config.clone());

    // Surface broken server-wide defaults at startup rather than on every request.
    let effective = SortOptions::default().merged(&config.sort_defaults);
    effective.validate()?;
    info!(
        "Default procrastination: p={} delay={}..{}ms",
        effective.procrastination_probability,
        effective.min_delay.as_millis(),
        effective.max_delay.as_millis()
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
