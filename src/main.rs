use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradovate_proxy::{
    config::AppConfig,
    proxy,
    session::{clock::SystemClock, start_sweep_task, InMemorySessionRepository},
    shared::AppState,
    tradovate::TradovateClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradovate_proxy=debug,tower_http=debug,audit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(
        tradovate = ?config.tradovate,
        secure_cookies = config.secure_cookies,
        "Starting Tradovate proxy"
    );

    let clock = Arc::new(SystemClock::new());
    let session_repository =
        Arc::new(InMemorySessionRepository::new(config.session.clone()).with_clock(clock.clone()));
    let tradovate = Arc::new(TradovateClient::new(config.tradovate.clone())?);

    // Periodic eviction of expired and idle sessions
    tokio::spawn(start_sweep_task(
        session_repository.clone(),
        config.session.sweep_interval,
    ));

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(session_repository, tradovate, clock, Arc::new(config));
    let app = proxy::router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
