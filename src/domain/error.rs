// Dashboard errors
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ViewGroup,
    View,
    Table,
    Row,
    Flag,
    Notification,
    DrillContext,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::ViewGroup => "view group",
            EntityKind::View => "view",
            EntityKind::Table => "table",
            EntityKind::Row => "row",
            EntityKind::Flag => "flag",
            EntityKind::Notification => "notification",
            EntityKind::DrillContext => "drill-down context",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("invalid dashboard layout: {0}")]
    InvalidLayout(String),
}

impl DashboardError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        DashboardError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn view_not_found(group: &str, view: &str) -> Self {
        Self::not_found(EntityKind::View, format!("{}/{}", group, view))
    }

    pub fn invalid_layout(reason: impl Into<String>) -> Self {
        DashboardError::InvalidLayout(reason.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::NotFound { .. })
    }
}
