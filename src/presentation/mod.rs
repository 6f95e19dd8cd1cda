// Presentation layer - HTTP routes for the dashboard page
pub mod app_state;
pub mod event_stream;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/state", get(get_state))
        .route("/events", get(stream_events))
        .route("/views/:group", get(get_active_view))
        .route("/views/:group/:view", post(activate_view))
        .route("/role/:role", post(switch_role))
        .route("/filters", post(apply_filters))
        .route("/filters/reset", post(reset_filters))
        .route("/tables/:table/select-all", post(select_all))
        .route("/tables/:table/rows", put(replace_rows))
        .route("/tables/:table/labels", get(get_action_labels))
        .route("/tables/:table/bulk/:action", post(bulk_action))
        .route("/rows/:row/toggle", post(toggle_row))
        .route("/flags", post(flag_to_contracting))
        .route("/flags/:id/dismiss", post(dismiss_flag))
        .route("/badge/clear", post(clear_badge))
        .route("/escalations/executive", post(flag_to_executive))
        .route("/escalations/contracting", post(assign_to_contracting))
        .route("/providers/:provider/info-request", post(request_more_info))
        .route("/providers/:provider/executive-update", post(update_executive))
        .route("/drill", post(drill_to).delete(clear_drill_down))
        .route("/drill/contracting", post(drill_to_contracting))
        .route("/drill/region", post(drill_down_to_region))
        .route("/drill/gap", post(drill_down_to_gap))
        .route("/regions/critical/flag", post(flag_critical_regions))
        .route("/scenario", post(calculate_scenario))
        .route("/drill/context/:entity", delete(remove_context))
        .route("/panels/:panel", post(show_panel).delete(hide_panel))
        .route("/collaboration/toggle", post(toggle_collaboration))
        .route("/collaboration/close", post(close_collaboration))
        .route("/sync", put(set_sync_enabled))
        .route("/operations", post(start_operation))
        .route("/notifications/:id", delete(dismiss_notification))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
