// Dashboard service - the coordinator that owns all view/selection state
use crate::application::context_bridge::{ContextBridge, MANAGER_FLAG_PANEL};
use crate::application::filter_state::{FilterState, APPLY_DELAY};
use crate::application::notification_queue::NotificationQueue;
use crate::application::render::{RenderEvent, RenderSink};
use crate::application::scheduler::{Scheduler, Timer, TimerId};
use crate::application::selection_tracker::SelectionTracker;
use crate::application::view_router::{ViewRouter, DASHBOARD_GROUP};
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::drill::DrillContext;
use crate::domain::error::{DashboardError, EntityKind};
use crate::domain::filters::FilterCriteria;
use crate::domain::flag::{Flag, FlagId};
use crate::domain::notification::{Notification, NotificationId, Severity};
use crate::domain::operation::SimulatedOperation;
use crate::domain::role::Role;
use crate::domain::scenario::{ScenarioInput, ScenarioResult};
use crate::domain::selection::{BulkAction, BulkRecord};
use crate::domain::view::ViewRef;
use crate::infrastructure::config::DashboardConfig;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Every mutation goes through `&mut self`, so whoever owns the service
/// serializes access. Delays are handed to the scheduler and come back
/// through `on_timer`.
pub struct DashboardService<S: Scheduler> {
    scheduler: S,
    sink: Arc<dyn RenderSink>,
    role: Role,
    router: ViewRouter,
    selection: SelectionTracker,
    bridge: ContextBridge,
    filters: FilterState,
    notifications: NotificationQueue,
    collaboration_active: bool,
    sync_enabled: bool,
    last_updated: DateTime<Utc>,
    auto_refresh: Option<(TimerId, Duration)>,
    scenario: Option<ScenarioResult>,
}

impl<S: Scheduler> DashboardService<S> {
    pub fn new(
        config: &DashboardConfig,
        scheduler: S,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, DashboardError> {
        let router = ViewRouter::new(config.view_groups()?)?;
        let selection = SelectionTracker::new(config.tables()?)?;
        let role = router
            .active(DASHBOARD_GROUP)
            .ok()
            .and_then(|view| view.parse().ok())
            .unwrap_or_default();

        Ok(Self {
            scheduler,
            sink,
            role,
            router,
            selection,
            bridge: ContextBridge::new(),
            filters: FilterState::new(),
            notifications: NotificationQueue::new(config.notification_display()),
            collaboration_active: false,
            sync_enabled: true,
            last_updated: Utc::now(),
            auto_refresh: None,
            scenario: None,
        })
    }

    #[cfg(test)]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ---- notifications ----

    /// Shows a notification immediately and schedules its removal.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let notification = self.notifications.push(message.into(), severity);
        let id = notification.id;
        tracing::debug!("Notification {:?} ({:?}): {}", id, severity, notification.message);
        self.sink.render(RenderEvent::NotificationShown { notification });

        let timer = self.scheduler.schedule(
            self.notifications.display_duration(),
            Timer::ExpireNotification(id),
        );
        self.notifications.attach_expiry(id, timer);
        id
    }

    pub fn dismiss_notification(&mut self, id: NotificationId) -> Result<(), DashboardError> {
        let (_, timer) = self
            .notifications
            .remove(id)
            .ok_or_else(|| DashboardError::not_found(EntityKind::Notification, id.0.to_string()))?;
        if let Some(timer) = timer {
            self.scheduler.cancel(timer);
        }
        self.sink.render(RenderEvent::NotificationRemoved { id });
        Ok(())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.active().cloned().collect()
    }

    // ---- timers ----

    pub fn on_timer(&mut self, id: TimerId, timer: Timer) {
        if !self.scheduler.take(id) {
            tracing::debug!("Ignoring cancelled timer {:?}", id);
            return;
        }

        match timer {
            Timer::ExpireNotification(notification) => {
                if self.notifications.remove(notification).is_some() {
                    self.sink
                        .render(RenderEvent::NotificationRemoved { id: notification });
                }
            }
            Timer::FiltersApplied => {
                self.notify("Filters applied successfully", Severity::Success);
                self.refresh_data();
            }
            Timer::Completed(operation) => {
                self.notify(operation.completed_message(), Severity::Success);
                if operation.refreshes_data() {
                    self.last_updated = Utc::now();
                    self.refresh_data();
                }
            }
            Timer::AutoRefresh => {
                let Some((_, interval)) = self.auto_refresh else {
                    return;
                };
                if self.sync_enabled {
                    tracing::debug!("Auto-refreshing dashboard data");
                    self.last_updated = Utc::now();
                    self.refresh_data();
                }
                let next = self.scheduler.schedule(interval, Timer::AutoRefresh);
                self.auto_refresh = Some((next, interval));
            }
        }
    }

    /// Starts a simulated remote operation; it always succeeds after its delay.
    pub fn simulate(&mut self, operation: SimulatedOperation) -> TimerId {
        self.notify(operation.started_message(), Severity::Info);
        let delay = operation.delay();
        self.scheduler.schedule(delay, Timer::Completed(operation))
    }

    /// Cancels a pending delayed operation.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Returns false for a zero interval: any running refresh is stopped and
    /// nothing is armed.
    pub fn start_auto_refresh(&mut self, interval: Duration) -> bool {
        self.stop_auto_refresh();
        if interval.is_zero() {
            tracing::warn!("Ignoring zero auto-refresh interval");
            return false;
        }
        let timer = self.scheduler.schedule(interval, Timer::AutoRefresh);
        self.auto_refresh = Some((timer, interval));
        true
    }

    pub fn stop_auto_refresh(&mut self) -> bool {
        match self.auto_refresh.take() {
            Some((timer, _)) => self.scheduler.cancel(timer),
            None => false,
        }
    }

    /// Cancels every pending timer; notifications that can no longer expire are dropped.
    pub fn teardown(&mut self) -> usize {
        self.auto_refresh = None;
        for id in self.notifications.clear() {
            self.sink.render(RenderEvent::NotificationRemoved { id });
        }
        let cancelled = self.scheduler.cancel_all();
        tracing::debug!("Teardown cancelled {} pending timers", cancelled);
        cancelled
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    fn refresh_data(&mut self) {
        self.sink.render(RenderEvent::DataRefresh);
    }

    // ---- view router ----

    /// Returns whether the active view changed. Activating a role tab in the
    /// dashboard group also switches the active role.
    pub fn activate(&mut self, group: &str, view: &str) -> Result<bool, DashboardError> {
        self.activate_view(group, view, true)
    }

    pub fn switch_role(&mut self, role: Role) -> Result<bool, DashboardError> {
        self.activate(DASHBOARD_GROUP, role.as_str())
    }

    fn activate_view(&mut self, group: &str, view: &str, announce: bool) -> Result<bool, DashboardError> {
        let Some(previous) = self.router.activate(group, view)? else {
            return Ok(false);
        };
        tracing::debug!("View group {}: {} -> {}", group, previous, view);
        self.sink.render(RenderEvent::ViewActivated {
            group: group.to_string(),
            view: view.to_string(),
        });
        for panel in self.bridge.panels_out_of_scope(group, view) {
            self.hide_panel(&panel);
        }

        if group == DASHBOARD_GROUP {
            if let Ok(role) = view.parse::<Role>() {
                self.role = role;
                if announce {
                    self.notify(format!("Switched to {} view", role), Severity::Info);
                }
            }
        }
        Ok(true)
    }

    pub fn active_view(&self, group: &str) -> Result<&str, DashboardError> {
        self.router.active(group)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    // ---- selection tracker ----

    pub fn toggle_all(&mut self, table: &str, checked: bool) -> Result<usize, DashboardError> {
        let count = self.selection.toggle_all(table, checked)?;
        self.selection_changed(table, count);
        Ok(count)
    }

    pub fn toggle_row(&mut self, row: &str) -> Result<usize, DashboardError> {
        let (table, count) = self.selection.toggle_row(row)?;
        self.selection_changed(&table, count);
        Ok(count)
    }

    pub fn set_rows(&mut self, table: &str, rows: Vec<String>) -> Result<usize, DashboardError> {
        let count = self.selection.set_rows(table, rows)?;
        self.selection_changed(table, count);
        Ok(count)
    }

    pub fn count(&self, table: &str) -> Result<usize, DashboardError> {
        self.selection.count(table)
    }

    pub fn action_label(&self, table: &str, action: BulkAction) -> Result<String, DashboardError> {
        self.selection.action_label(table, action)
    }

    pub fn bulk_log(&self) -> &[BulkRecord] {
        self.selection.log()
    }

    fn selection_changed(&mut self, table: &str, count: usize) {
        self.sink.render(RenderEvent::SelectionChanged {
            table: table.to_string(),
            count,
        });
    }

    /// Runs a bulk action over the table's selection. With nothing selected
    /// the action is refused and a single warning is shown.
    pub fn bulk(&mut self, table: &str, action: BulkAction) -> Result<BulkRecord, DashboardError> {
        let record = match self.selection.begin_bulk(table, action) {
            Ok(record) => record,
            Err(DashboardError::Validation(message)) => {
                self.notify(message.clone(), Severity::Warning);
                return Err(DashboardError::Validation(message));
            }
            Err(err) => return Err(err),
        };

        let count = record.rows.len();
        match action {
            BulkAction::Export => {
                self.notify(format!("Exporting {} provider(s)...", count), Severity::Info);
            }
            BulkAction::Flag => {
                for row in &record.rows {
                    self.bridge.add_flag(row.clone(), self.role);
                }
                self.flags_changed();
                self.bump_badge(count as u32);
                self.notify(
                    format!("Sending {} provider(s) to contracting team", count),
                    Severity::Success,
                );
            }
            BulkAction::RequestApproval => {
                self.notify(
                    format!("Requesting executive approval for {} items...", count),
                    Severity::Info,
                );
            }
            BulkAction::ExportPacket => {
                self.simulate(SimulatedOperation::SelectedPacket { count });
            }
            BulkAction::ExportExcel => {
                self.notify(format!("Exporting {} items to Excel...", count), Severity::Info);
            }
        }
        Ok(record)
    }

    // ---- context bridge ----

    pub fn flag_to_contracting(&mut self, provider_id: &str) -> FlagId {
        let id = self.bridge.add_flag(provider_id.to_string(), self.role).id;
        tracing::debug!("Provider {} flagged to contracting by {}", provider_id, self.role);
        self.flags_changed();
        self.bump_badge(1);
        self.notify("Provider flagged to contracting team", Severity::Success);
        id
    }

    pub fn flag_to_executive(&mut self, context: &str) {
        self.notify(format!("Flagging {} to executive dashboard", context), Severity::Info);
        self.bump_badge(1);
    }

    pub fn assign_to_contracting(&mut self, context: &str) {
        self.notify(format!("Assigning {} to contracting team", context), Severity::Info);
        self.bump_badge(1);
    }

    pub fn request_more_info(&mut self, provider_id: &str) {
        tracing::debug!("Information requested for {}", provider_id);
        self.notify("Sending information request to network manager", Severity::Info);
        self.bump_badge(1);
    }

    pub fn update_executive(&mut self, provider_id: &str) -> TimerId {
        self.simulate(SimulatedOperation::UpdateExecutive {
            provider_id: provider_id.to_string(),
        })
    }

    pub fn dismiss_flag(&mut self, id: FlagId) -> Result<bool, DashboardError> {
        let dismissed = self.bridge.dismiss_flag(id)?;
        if dismissed {
            self.flags_changed();
        }
        Ok(dismissed)
    }

    pub fn flags(&self) -> &[Flag] {
        self.bridge.flags()
    }

    pub fn badge(&self) -> u32 {
        self.bridge.badge()
    }

    pub fn clear_badge(&mut self) {
        if self.bridge.clear_badge() {
            self.sink.render(RenderEvent::BadgeChanged { count: 0 });
        }
    }

    fn bump_badge(&mut self, by: u32) {
        let count = self.bridge.bump_badge(by);
        self.sink.render(RenderEvent::BadgeChanged { count });
    }

    fn flags_changed(&mut self) {
        self.sink.render(RenderEvent::FlagsChanged {
            displayed: self.bridge.displayed_flags(),
        });
    }

    /// Switches to `target` carrying `entity_id` as drill-down context.
    pub fn drill_to(
        &mut self,
        target: ViewRef,
        entity_id: &str,
        reveal: Option<&str>,
    ) -> Result<(), DashboardError> {
        let message = format!(
            "Drilling down to {} with {} context",
            target.view, entity_id
        );
        self.drill(target, entity_id, reveal, message)
    }

    pub fn drill_to_contracting(&mut self, context: &str) -> Result<(), DashboardError> {
        let message = format!("Navigating to contracting team with {} context", context);
        self.drill(
            ViewRef::new(DASHBOARD_GROUP, Role::Contracting.as_str()),
            context,
            Some(MANAGER_FLAG_PANEL),
            message,
        )
    }

    pub fn drill_down_to_gap(&mut self, region: &str) -> Result<(), DashboardError> {
        let message = format!("Viewing coverage gaps in {}", region);
        self.drill(
            ViewRef::new(DASHBOARD_GROUP, Role::Manager.as_str()),
            region,
            None,
            message,
        )
    }

    /// Narrows the current view to one region and asks the charts to redraw.
    pub fn drill_down_to_region(&mut self, region: &str, adequacy: f64) -> Result<(), DashboardError> {
        let here = ViewRef::new(DASHBOARD_GROUP, self.router.active(DASHBOARD_GROUP)?);
        self.notify(
            format!("Drilling down to {} - Adequacy: {}%", region, adequacy),
            Severity::Info,
        );
        self.bridge.push_drill(DrillContext {
            entity_id: region.to_string(),
            origin: here.clone(),
            target: here,
        });
        self.drill_changed();
        self.refresh_data();
        Ok(())
    }

    fn drill(
        &mut self,
        target: ViewRef,
        entity_id: &str,
        reveal: Option<&str>,
        message: String,
    ) -> Result<(), DashboardError> {
        let origin = ViewRef::new(target.group.clone(), self.router.active(&target.group)?);
        if !self.router.contains(&target.group, &target.view) {
            return Err(DashboardError::view_not_found(&target.group, &target.view));
        }
        self.activate_view(&target.group, &target.view, false)?;

        self.bridge.push_drill(DrillContext {
            entity_id: entity_id.to_string(),
            origin,
            target: target.clone(),
        });
        self.drill_changed();
        if let Some(panel) = reveal {
            if self.bridge.show_scoped_panel(panel, target) {
                self.sink.render(RenderEvent::PanelChanged {
                    panel: panel.to_string(),
                    visible: true,
                });
            }
        }
        self.notify(message, Severity::Info);
        Ok(())
    }

    pub fn clear_drill_down(&mut self) -> usize {
        let removed = self.bridge.clear_drill();
        self.drill_changed();
        self.notify("Drill-down context cleared", Severity::Info);
        removed
    }

    pub fn remove_context(&mut self, entity_id: &str) -> Result<usize, DashboardError> {
        let removed = self.bridge.remove_drill(entity_id)?;
        self.drill_changed();
        self.notify(format!("{} filter removed", entity_id), Severity::Info);
        Ok(removed)
    }

    pub fn drill_context(&self) -> &[DrillContext] {
        self.bridge.drill_context()
    }

    fn drill_changed(&mut self) {
        self.sink.render(RenderEvent::DrillContextChanged {
            context: self.bridge.drill_context().to_vec(),
        });
    }

    pub fn show_panel(&mut self, panel: &str) {
        if self.bridge.show_panel(panel) {
            self.sink.render(RenderEvent::PanelChanged {
                panel: panel.to_string(),
                visible: true,
            });
        }
    }

    pub fn hide_panel(&mut self, panel: &str) {
        if self.bridge.hide_panel(panel) {
            self.sink.render(RenderEvent::PanelChanged {
                panel: panel.to_string(),
                visible: false,
            });
        }
    }

    pub fn toggle_collaboration(&mut self) -> bool {
        self.set_collaboration(!self.collaboration_active);
        self.collaboration_active
    }

    pub fn close_collaboration(&mut self) {
        self.set_collaboration(false);
    }

    fn set_collaboration(&mut self, active: bool) {
        if self.collaboration_active != active {
            self.collaboration_active = active;
            self.sink.render(RenderEvent::CollaborationChanged { active });
        }
    }

    pub fn set_sync_enabled(&mut self, enabled: bool) {
        self.sync_enabled = enabled;
    }

    /// Counts each critical region once and escalates them to the executive view.
    pub fn flag_critical_regions(&mut self, regions: &[String]) -> usize {
        let count = regions.iter().collect::<BTreeSet<_>>().len();
        tracing::debug!("Critical regions flagged to executive: {:?}", regions);
        self.notify(
            format!("Flagging {} critical region(s) to executive", count),
            Severity::Success,
        );
        count
    }

    pub fn calculate_scenario(&mut self, input: ScenarioInput) -> Result<ScenarioResult, DashboardError> {
        let result = input.calculate()?;
        tracing::debug!(
            "Scenario at {}% reduction: savings {}M, PMPM -{}",
            result.input.rate_reduction,
            result.annual_savings_millions,
            result.pmpm_reduction
        );
        self.scenario = Some(result.clone());
        self.sink.render(RenderEvent::ScenarioCalculated {
            result: result.clone(),
        });
        self.notify("Scenario calculated successfully", Severity::Success);
        Ok(result)
    }

    // ---- filters ----

    /// Replaces the active filters; the refresh follows after a simulated delay.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> TimerId {
        let filters = self.filters.apply(criteria).clone();
        tracing::debug!("Applying filters: {:?}", filters);
        self.sink.render(RenderEvent::FiltersChanged { filters });
        self.notify("Applying filters...", Severity::Info);
        self.scheduler.schedule(APPLY_DELAY, Timer::FiltersApplied)
    }

    pub fn reset_filters(&mut self) {
        let filters = self.filters.reset().clone();
        self.sink.render(RenderEvent::FiltersChanged { filters });
        self.notify("Filters reset", Severity::Info);
        self.refresh_data();
    }

    pub fn filters(&self) -> &FilterCriteria {
        self.filters.active()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            active_role: self.role,
            active_views: self.router.active_views(),
            selected_provider_ids: self.selection.selections(),
            bulk_log: self.selection.log().to_vec(),
            active_filters: self.filters.active().clone(),
            collaboration_active: self.collaboration_active,
            sync_enabled: self.sync_enabled,
            flagged_items: self.bridge.flags().to_vec(),
            badge_count: self.bridge.badge(),
            drill_context: self.bridge.drill_context().to_vec(),
            revealed_panels: self.bridge.panels().clone(),
            notifications: self.notifications(),
            scenario: self.scenario.clone(),
            last_updated: self.last_updated,
        }
    }
}
