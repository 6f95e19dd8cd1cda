// Dashboard domain model - serializable projection of coordinator state
use super::drill::DrillContext;
use super::filters::FilterCriteria;
use super::flag::Flag;
use super::notification::Notification;
use super::role::Role;
use super::scenario::ScenarioResult;
use super::selection::BulkRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub active_role: Role,
    pub active_views: BTreeMap<String, String>,
    pub selected_provider_ids: BTreeMap<String, BTreeSet<String>>,
    pub bulk_log: Vec<BulkRecord>,
    pub active_filters: FilterCriteria,
    pub collaboration_active: bool,
    pub sync_enabled: bool,
    pub flagged_items: Vec<Flag>,
    pub badge_count: u32,
    pub drill_context: Vec<DrillContext>,
    pub revealed_panels: BTreeSet<String>,
    pub notifications: Vec<Notification>,
    pub scenario: Option<ScenarioResult>,
    pub last_updated: DateTime<Utc>,
}
