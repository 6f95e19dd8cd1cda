use crate::domain::error::DashboardError;
use crate::domain::selection::SelectionTable;
use crate::domain::view::ViewGroup;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default = "default_notification_display_ms")]
    pub notification_display_ms: u64,
    /// Zero turns auto refresh off.
    #[serde(default = "default_auto_refresh_secs")]
    pub auto_refresh_secs: u64,
    #[serde(default = "default_view_groups")]
    pub view_groups: Vec<ViewGroupConfig>,
    #[serde(default = "default_tables")]
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewGroupConfig {
    pub id: String,
    pub views: Vec<String>,
    pub default: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    pub id: String,
    #[serde(default)]
    pub rows: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            notification_display_ms: default_notification_display_ms(),
            auto_refresh_secs: default_auto_refresh_secs(),
            view_groups: default_view_groups(),
            tables: default_tables(),
        }
    }
}

impl DashboardConfig {
    pub fn notification_display(&self) -> Duration {
        Duration::from_millis(self.notification_display_ms)
    }

    pub fn auto_refresh(&self) -> Option<Duration> {
        (self.auto_refresh_secs > 0).then(|| Duration::from_secs(self.auto_refresh_secs))
    }

    pub fn view_groups(&self) -> Result<Vec<ViewGroup>, DashboardError> {
        self.view_groups
            .iter()
            .map(|g| ViewGroup::new(g.id.clone(), g.views.clone(), g.default.as_deref()))
            .collect()
    }

    pub fn tables(&self) -> Result<Vec<SelectionTable>, DashboardError> {
        self.tables
            .iter()
            .map(|t| SelectionTable::new(t.id.clone(), t.rows.clone()))
            .collect()
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_event_buffer() -> usize {
    256
}

fn default_notification_display_ms() -> u64 {
    3000
}

fn default_auto_refresh_secs() -> u64 {
    60
}

fn group(id: &str, views: &[&str], default: Option<&str>) -> ViewGroupConfig {
    ViewGroupConfig {
        id: id.to_string(),
        views: views.iter().map(|v| v.to_string()).collect(),
        default: default.map(str::to_string),
    }
}

fn default_view_groups() -> Vec<ViewGroupConfig> {
    vec![
        group("dashboard", &["executive", "manager", "contracting", "pipeline"], None),
        group("collaboration", &["flags", "comments", "activity"], None),
        group("chart-view", &["specialty", "risk", "rate"], None),
        group("pipeline", &["overview", "sources", "journey", "api"], None),
        group("time-range", &["1m", "3m", "6m", "ytd", "1y"], Some("ytd")),
        group("benchmark-view", &["summary", "detailed"], None),
    ]
}

fn default_tables() -> Vec<TableConfig> {
    let table = |id: &str, rows: &[&str]| TableConfig {
        id: id.to_string(),
        rows: rows.iter().map(|r| r.to_string()).collect(),
    };
    vec![
        table("outliers", &["PRV-1001", "PRV-1002", "PRV-1003", "PRV-1004", "PRV-1005"]),
        table("benchmark", &["PRV-2001", "PRV-2002", "PRV-2003", "PRV-2004"]),
    ]
}

/// Reads `config/dashboard.*` when present, then `DASHBOARD__*` overrides.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
