use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commerce_orders::api::{self, AppState};
use commerce_orders::config::{AppConfig, Backend};
use commerce_orders::metrics::{self, Metrics};
use commerce_orders::store::{DataContext, MemoryDatabase, ScyllaDatabase};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,commerce_orders=debug")),
        )
        .init();

    tracing::info!("🚀 Starting commerce orders service");

    let config = AppConfig::from_env()?;

    // === 1. Storage backend ===
    let context: Arc<dyn DataContext> = match config.backend {
        Backend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on shutdown");
            Arc::new(MemoryDatabase::new())
        }
        Backend::Scylla => Arc::new(ScyllaDatabase::connect(&config.scylla).await?),
    };

    // === 2. Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());
    let registry = Arc::new(metrics.registry().clone());

    // === 3. HTTP API ===
    let state = web::Data::new(AppState::new(context, Some(metrics)));
    let addr = config.socket_addr();
    tracing::info!("🌐 Serving API on http://{}", addr);

    let api_server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind(addr)?
    .run();

    let metrics_server = metrics::start_metrics_server(registry, config.metrics_port);

    futures_util::future::try_join(api_server, metrics_server).await?;

    tracing::info!("👋 Shut down");
    Ok(())
}
