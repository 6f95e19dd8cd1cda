// HTTP request handlers - the UI adapter in front of the coordinator
use crate::application::coordinator::CoordinatorClosed;
use crate::domain::error::{DashboardError, EntityKind};
use crate::domain::filters::FilterCriteria;
use crate::domain::flag::FlagId;
use crate::domain::notification::NotificationId;
use crate::domain::operation::SimulatedOperation;
use crate::domain::role::Role;
use crate::domain::scenario::ScenarioInput;
use crate::domain::selection::BulkAction;
use crate::domain::view::ViewRef;
use crate::presentation::app_state::{AppState, Dashboard};
use crate::presentation::event_stream::sse_from_receiver;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SelectAllRequest {
    pub checked: bool,
}

#[derive(Deserialize)]
pub struct ProviderRequest {
    pub provider_id: String,
}

#[derive(Deserialize)]
pub struct ContextRequest {
    pub context: String,
}

#[derive(Deserialize)]
pub struct DrillRequest {
    pub group: String,
    pub view: String,
    pub entity_id: String,
    #[serde(default)]
    pub reveal: Option<String>,
}

#[derive(Deserialize)]
pub struct RegionRequest {
    pub region: String,
    #[serde(default)]
    pub adequacy: Option<f64>,
}

#[derive(Deserialize)]
pub struct CriticalRegionsRequest {
    pub regions: Vec<String>,
}

#[derive(Deserialize)]
pub struct SyncRequest {
    pub enabled: bool,
}

/// Runs `f` on the coordinator and answers with the resulting state. Lookup
/// failures and refused bulk actions are logged, never surfaced to the page:
/// the response is simply the unchanged dashboard.
async fn respond<F>(state: &AppState, operation: &'static str, f: F) -> Response
where
    F: FnOnce(&mut Dashboard) -> Result<(), DashboardError> + Send + 'static,
{
    let result = state
        .coordinator
        .call(move |dashboard| {
            if let Err(err) = f(dashboard) {
                if err.is_not_found() {
                    tracing::warn!("{} ignored: {}", operation, err);
                } else {
                    tracing::debug!("{} refused: {}", operation, err);
                }
            }
            dashboard.snapshot()
        })
        .await;

    match result {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!("{} failed: {}", operation, e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_state(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "get_state", |_| Ok(())).await
}

pub async fn stream_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    sse_from_receiver(state.events.subscribe())
}

pub async fn get_active_view(
    Path(group): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state
        .coordinator
        .call(move |d| {
            d.active_view(&group)
                .map(|view| json!({ "group": group, "view": view }))
        })
        .await;
    lookup_response("get_active_view", result)
}

/// Button labels for every bulk action, e.g. `Export Selected (3)`.
pub async fn get_action_labels(
    Path(table): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state
        .coordinator
        .call(move |d| -> Result<Value, DashboardError> {
            let mut labels = serde_json::Map::new();
            for action in BulkAction::ALL {
                let label = d.action_label(&table, action)?;
                labels.insert(action.as_str().to_string(), Value::String(label));
            }
            Ok(Value::Object(labels))
        })
        .await;
    lookup_response("get_action_labels", result)
}

fn lookup_response(
    operation: &'static str,
    result: Result<Result<Value, DashboardError>, CoordinatorClosed>,
) -> Response {
    match result {
        Ok(Ok(value)) => Json(value).into_response(),
        Ok(Err(err)) => {
            tracing::warn!("{} ignored: {}", operation, err);
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            tracing::error!("{} failed: {}", operation, e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

pub async fn activate_view(
    Path((group, view)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&state, "activate_view", move |d| {
        d.activate(&group, &view).map(|_| ())
    })
    .await
}

pub async fn switch_role(Path(role): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "switch_role", move |d| {
        let role: Role = role
            .parse()
            .map_err(|_| DashboardError::not_found(EntityKind::View, role))?;
        d.switch_role(role).map(|_| ())
    })
    .await
}

pub async fn apply_filters(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> Response {
    respond(&state, "apply_filters", move |d| {
        d.apply_filters(criteria);
        Ok(())
    })
    .await
}

pub async fn reset_filters(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "reset_filters", |d| {
        d.reset_filters();
        Ok(())
    })
    .await
}

pub async fn select_all(
    Path(table): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectAllRequest>,
) -> Response {
    respond(&state, "select_all", move |d| {
        d.toggle_all(&table, req.checked).map(|_| ())
    })
    .await
}

pub async fn replace_rows(
    Path(table): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(rows): Json<Vec<String>>,
) -> Response {
    respond(&state, "replace_rows", move |d| d.set_rows(&table, rows).map(|_| ())).await
}

pub async fn toggle_row(Path(row): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "toggle_row", move |d| d.toggle_row(&row).map(|_| ())).await
}

pub async fn bulk_action(
    Path((table, action)): Path<(String, BulkAction)>,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&state, "bulk_action", move |d| d.bulk(&table, action).map(|_| ())).await
}

pub async fn flag_to_contracting(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProviderRequest>,
) -> Response {
    respond(&state, "flag_to_contracting", move |d| {
        d.flag_to_contracting(&req.provider_id);
        Ok(())
    })
    .await
}

pub async fn dismiss_flag(Path(id): Path<u64>, State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "dismiss_flag", move |d| d.dismiss_flag(FlagId(id)).map(|_| ())).await
}

pub async fn clear_badge(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "clear_badge", |d| {
        d.clear_badge();
        Ok(())
    })
    .await
}

pub async fn flag_to_executive(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> Response {
    respond(&state, "flag_to_executive", move |d| {
        d.flag_to_executive(&req.context);
        Ok(())
    })
    .await
}

pub async fn assign_to_contracting(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> Response {
    respond(&state, "assign_to_contracting", move |d| {
        d.assign_to_contracting(&req.context);
        Ok(())
    })
    .await
}

pub async fn request_more_info(
    Path(provider): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&state, "request_more_info", move |d| {
        d.request_more_info(&provider);
        Ok(())
    })
    .await
}

pub async fn update_executive(
    Path(provider): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&state, "update_executive", move |d| {
        d.update_executive(&provider);
        Ok(())
    })
    .await
}

pub async fn drill_to(State(state): State<Arc<AppState>>, Json(req): Json<DrillRequest>) -> Response {
    respond(&state, "drill_to", move |d| {
        d.drill_to(
            ViewRef::new(req.group, req.view),
            &req.entity_id,
            req.reveal.as_deref(),
        )
    })
    .await
}

pub async fn drill_to_contracting(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextRequest>,
) -> Response {
    respond(&state, "drill_to_contracting", move |d| {
        d.drill_to_contracting(&req.context)
    })
    .await
}

pub async fn drill_down_to_region(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegionRequest>,
) -> Response {
    respond(&state, "drill_down_to_region", move |d| {
        d.drill_down_to_region(&req.region, req.adequacy.unwrap_or_default())
    })
    .await
}

pub async fn drill_down_to_gap(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegionRequest>,
) -> Response {
    respond(&state, "drill_down_to_gap", move |d| d.drill_down_to_gap(&req.region)).await
}

pub async fn clear_drill_down(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "clear_drill_down", |d| {
        d.clear_drill_down();
        Ok(())
    })
    .await
}

pub async fn remove_context(
    Path(entity): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&state, "remove_context", move |d| d.remove_context(&entity).map(|_| ())).await
}

pub async fn show_panel(Path(panel): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "show_panel", move |d| {
        d.show_panel(&panel);
        Ok(())
    })
    .await
}

pub async fn hide_panel(Path(panel): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "hide_panel", move |d| {
        d.hide_panel(&panel);
        Ok(())
    })
    .await
}

pub async fn toggle_collaboration(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "toggle_collaboration", |d| {
        d.toggle_collaboration();
        Ok(())
    })
    .await
}

pub async fn close_collaboration(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, "close_collaboration", |d| {
        d.close_collaboration();
        Ok(())
    })
    .await
}

pub async fn set_sync_enabled(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SyncRequest>,
) -> Response {
    respond(&state, "set_sync_enabled", move |d| {
        d.set_sync_enabled(req.enabled);
        Ok(())
    })
    .await
}

pub async fn start_operation(
    State(state): State<Arc<AppState>>,
    Json(operation): Json<SimulatedOperation>,
) -> Response {
    respond(&state, "start_operation", move |d| {
        d.simulate(operation);
        Ok(())
    })
    .await
}

pub async fn flag_critical_regions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CriticalRegionsRequest>,
) -> Response {
    respond(&state, "flag_critical_regions", move |d| {
        d.flag_critical_regions(&req.regions);
        Ok(())
    })
    .await
}

pub async fn calculate_scenario(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ScenarioInput>,
) -> Response {
    respond(&state, "calculate_scenario", move |d| {
        d.calculate_scenario(input).map(|_| ())
    })
    .await
}

pub async fn dismiss_notification(
    Path(id): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(&state, "dismiss_notification", move |d| {
        d.dismiss_notification(NotificationId(id))
    })
    .await
}

#[cfg(test)]
mod tests {
    use crate::application::coordinator;
    use crate::application::dashboard_service::DashboardService;
    use crate::infrastructure::broadcast_sink::BroadcastRenderSink;
    use crate::infrastructure::config::DashboardConfig;
    use crate::infrastructure::tokio_scheduler::TokioScheduler;
    use crate::presentation::app_state::AppState;
    use crate::presentation::router;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let events = BroadcastRenderSink::new(64);
        let (scheduler, fired) = TokioScheduler::new();
        let service = DashboardService::new(
            &DashboardConfig::default(),
            scheduler,
            Arc::new(events.clone()),
        )
        .unwrap();
        let (coordinator, _task) = coordinator::spawn(service, fired, 16);
        router(Arc::new(AppState { coordinator, events }))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_role_tab_activation() {
        let app = app();
        let (status, state) = send(&app, Method::POST, "/views/dashboard/manager", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["active_role"], "manager");
        assert_eq!(state["active_views"]["dashboard"], "manager");
    }

    #[tokio::test]
    async fn test_unknown_view_fails_silently() {
        let app = app();
        let (status, state) = send(&app, Method::POST, "/views/dashboard/finance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["active_views"]["dashboard"], "executive");

        let (status, state) = send(&app, Method::POST, "/role/auditor", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["active_role"], "executive");
    }

    #[tokio::test]
    async fn test_bulk_without_selection_shows_warning() {
        let app = app();
        let (status, state) = send(&app, Method::POST, "/tables/outliers/bulk/request_approval", None).await;
        assert_eq!(status, StatusCode::OK);
        let notifications = state["notifications"].as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["severity"], "warning");
        assert_eq!(notifications[0]["message"], "Please select items for approval");
    }

    #[tokio::test]
    async fn test_apply_filters_replaces_mapping() {
        let app = app();
        let filters = json!({"region": "northeast", "specialty": "cardiology"});
        let (_, state) = send(&app, Method::POST, "/filters", Some(filters.clone())).await;
        assert_eq!(state["active_filters"], filters);

        let (_, state) = send(&app, Method::POST, "/filters/reset", None).await;
        assert_eq!(
            state["active_filters"],
            json!({"region": "all", "specialty": "all", "plan": "all", "provider": "all", "time": "ytd"})
        );
    }

    #[tokio::test]
    async fn test_labels_follow_selection() {
        let app = app();
        send(&app, Method::POST, "/rows/PRV-1002/toggle", None).await;
        send(&app, Method::POST, "/rows/PRV-1004/toggle", None).await;
        let (status, labels) = send(&app, Method::GET, "/tables/outliers/labels", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(labels["export"], "Export Selected (2)");
        assert_eq!(labels["request_approval"], "Request Approval (2)");

        let (status, _) = send(&app, Method::GET, "/tables/missing/labels", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, view) = send(&app, Method::GET, "/views/time-range", None).await;
        assert_eq!(view, json!({"group": "time-range", "view": "ytd"}));
    }

    #[tokio::test]
    async fn test_flag_then_dismiss() {
        let app = app();
        let (_, state) = send(&app, Method::POST, "/flags", Some(json!({"provider_id": "P123"}))).await;
        assert_eq!(state["badge_count"], 1);
        let id = state["flagged_items"][0]["id"].as_u64().unwrap();
        assert_eq!(state["flagged_items"][0]["target_id"], "P123");

        let (_, state) = send(&app, Method::POST, &format!("/flags/{}/dismiss", id), None).await;
        assert_eq!(state["flagged_items"][0]["status"], "dismissed");
    }

    #[tokio::test]
    async fn test_scenario_and_critical_regions() {
        let app = app();
        let scenario = json!({"rate_reduction": 10.0, "systems": "all", "timeline": "12"});
        let (_, state) = send(&app, Method::POST, "/scenario", Some(scenario)).await;
        assert_eq!(state["scenario"]["annual_savings_millions"], 16.4);
        assert_eq!(state["scenario"]["pmpm_reduction"], 48.52);

        let (status, state) = send(&app, Method::POST, "/scenario", Some(json!({"rate_reduction": 150.0}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["scenario"]["input"]["rate_reduction"], 10.0);

        let regions = json!({"regions": ["Southwest", "Rural TX"]});
        let (_, state) = send(&app, Method::POST, "/regions/critical/flag", Some(regions)).await;
        let last = state["notifications"].as_array().unwrap().last().unwrap().clone();
        assert_eq!(last["message"], "Flagging 2 critical region(s) to executive");
    }

    #[tokio::test]
    async fn test_event_stream_delivers_render_events() {
        let app = app();
        let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

        send(&app, Method::POST, "/collaboration/toggle", None).await;
        let frame = response.into_body().frame().await.unwrap().unwrap();
        let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
        assert!(text.contains(r#"{"type":"collaboration_changed","active":true}"#));
    }
}
