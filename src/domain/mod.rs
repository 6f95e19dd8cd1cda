// Domain layer - dashboard entities and invariants
pub mod dashboard;
pub mod drill;
pub mod error;
pub mod filters;
pub mod flag;
pub mod notification;
pub mod operation;
pub mod role;
pub mod scenario;
pub mod selection;
pub mod view;
