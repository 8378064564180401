//! AlarmWatcher service entry point

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use alarmwatcher::{
    api::routes, AlarmService, AppConfig, AppState, LifecycleScheduler, LogSink, Notifier,
    SqliteClient,
};
use alarmwatcher::store::AlarmStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting AlarmWatcher...");

    let config = Arc::new(AppConfig::load()?);

    let client = SqliteClient::new(&config.storage.db_path).await?;
    let store = Arc::new(AlarmStore::new(&client));
    store.init_schema().await?;

    let notifier = Arc::new(Notifier::new());
    if config.notifier.log_sink {
        notifier.subscribe(Arc::new(LogSink)).await;
    }

    let service = Arc::new(AlarmService::new(store, notifier));

    let scheduler = LifecycleScheduler::new(
        service.clone(),
        Duration::from_secs(config.scheduler.tick_interval_secs),
    );
    tokio::spawn(scheduler.run());

    let state = AppState {
        config: config.clone(),
        service,
    };
    let app = routes::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("AlarmWatcher started on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
