// Application layer - coordinator and the components it owns
pub mod context_bridge;
pub mod coordinator;
pub mod dashboard_service;
pub mod filter_state;
pub mod notification_queue;
pub mod render;
pub mod scheduler;
pub mod selection_tracker;
pub mod view_router;
