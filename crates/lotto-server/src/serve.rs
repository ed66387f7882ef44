use crate::config::LottoConfig;
use crate::http::{AppState, HttpResolver};
use lotto_core::*;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub async fn run(config: LottoConfig) -> anyhow::Result<()> {
    info!("Starting lotto server v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP: {}", config.server.http_addr);
    info!("Origin: {}", config.origin.endpoint);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(DrawCache::with_clock(config.cache.ttl(), clock.clone()));
    info!("Draw cache TTL: {}s", config.cache.ttl_secs);

    let origin: Arc<dyn DrawOrigin> = Arc::new(
        DhLotteryClient::new(config.origin.clone())
            .map_err(|e| anyhow::anyhow!("Failed to build origin client: {}", e))?,
    );

    let resolver: Arc<HttpResolver> =
        Arc::new(DrawResolver::with_config(origin, cache, config.resolver));
    info!(
        "Resolver: max span {}, concurrency {}",
        config.resolver.max_span, config.resolver.concurrency
    );

    let mut app = crate::http::create_router(AppState::new(resolver, clock));
    if config.server.cors {
        app = app.layer(
            CorsLayer::new()
                .allow_methods([axum::http::Method::GET])
                .allow_origin(Any),
        );
    }

    let addr = config.server.http_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP server on {}: {}", addr, e))?;
    info!("Lotto server ready on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, terminating..."),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
