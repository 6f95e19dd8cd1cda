// Infrastructure layer - external dependencies and adapters
pub mod broadcast_sink;
pub mod config;
pub mod tokio_scheduler;
