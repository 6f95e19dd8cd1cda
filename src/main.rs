// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::coordinator;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::broadcast_sink::BroadcastRenderSink;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::tokio_scheduler::TokioScheduler;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Render events fan out to every open event stream
    let events = BroadcastRenderSink::new(config.server.event_buffer);

    // Create the coordinator (application layer)
    let (scheduler, fired) = TokioScheduler::new();
    let mut service = DashboardService::new(&config, scheduler, Arc::new(events.clone()))?;
    match config.auto_refresh() {
        Some(interval) => {
            service.start_auto_refresh(interval);
        }
        None => tracing::info!("Auto refresh disabled"),
    }
    let (coordinator, task) = coordinator::spawn(service, fired, config.server.event_buffer);

    // Build router (presentation layer)
    let state = Arc::new(AppState {
        coordinator,
        events,
    });
    let router = presentation::router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting network-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    task.abort();
    Ok(())
}
