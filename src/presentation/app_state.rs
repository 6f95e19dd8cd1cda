// Application state for HTTP handlers
use crate::application::coordinator::CoordinatorHandle;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::broadcast_sink::BroadcastRenderSink;
use crate::infrastructure::tokio_scheduler::TokioScheduler;

pub type Dashboard = DashboardService<TokioScheduler>;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: CoordinatorHandle<TokioScheduler>,
    pub events: BroadcastRenderSink,
}
