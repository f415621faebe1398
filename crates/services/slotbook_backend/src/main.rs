// File: services/slotbook_backend/src/main.rs
use slotbook_backend::{app::build_router, service_factory::SlotbookServiceFactory};
use slotbook_common::logging;
use slotbook_config::{load_config, load_logging_config, LoggingConfig};
use slotbook_gcal::booking::{BookingCoordinator, BookingSettings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Server terminated: {}", e);
        eprintln!("slotbook: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // installed first so that configuration warnings are not lost
    let logging_config = load_logging_config().unwrap_or_else(|e| {
        eprintln!("slotbook: logging section unreadable, using defaults: {}", e);
        LoggingConfig::default()
    });
    // keeps the file writer flushing until shutdown
    let _log_guard = logging::init_from_config(&logging_config);

    let config = logging::log_result(
        load_config(),
        "Configuration loaded",
        "Configuration rejected",
    )?;
    let settings = BookingSettings::from_config(&config.booking)?;

    let factory = logging::log_result(
        SlotbookServiceFactory::new(&config).await,
        "Calendar gateway ready",
        "Calendar gateway initialization failed",
    )?;
    info!("Calendar gateway: {:?}", factory.kind());
    let coordinator = Arc::new(BookingCoordinator::new(factory.calendar_gateway(), settings));

    let settings = coordinator.settings();
    info!(
        "Booking {}:00-{}:00 at {} for {} days on calendar '{}' ({:?})",
        settings.start_hour,
        settings.end_hour,
        settings.offset,
        settings.days_ahead,
        settings.calendar_id,
        settings.conflict_policy
    );

    let app = build_router(coordinator);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
