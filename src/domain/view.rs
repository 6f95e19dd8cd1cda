// View domain model - mutually exclusive views grouped under one name
use super::error::DashboardError;
use serde::{Deserialize, Serialize};

/// Names one view inside one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewRef {
    pub group: String,
    pub view: String,
}

impl ViewRef {
    pub fn new(group: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            view: view.into(),
        }
    }
}

/// Exactly one view is active at any time; the active view is stored as an
/// index into a non-empty list so "none" and "several" are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewGroup {
    id: String,
    views: Vec<String>,
    active: usize,
}

impl ViewGroup {
    pub fn new(id: String, views: Vec<String>, default: Option<&str>) -> Result<Self, DashboardError> {
        if views.is_empty() {
            return Err(DashboardError::invalid_layout(format!(
                "view group {} has no views",
                id
            )));
        }
        for (i, view) in views.iter().enumerate() {
            if views[..i].contains(view) {
                return Err(DashboardError::invalid_layout(format!(
                    "view group {} lists view {} twice",
                    id, view
                )));
            }
        }
        let active = match default {
            Some(name) => views
                .iter()
                .position(|v| v == name)
                .ok_or_else(|| DashboardError::view_not_found(&id, name))?,
            None => 0,
        };
        Ok(Self { id, views, active })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn active(&self) -> &str {
        &self.views[self.active]
    }

    pub fn contains(&self, view: &str) -> bool {
        self.views.iter().any(|v| v == view)
    }

    /// Returns the previously active view when the selection changed.
    pub fn activate(&mut self, view: &str) -> Result<Option<String>, DashboardError> {
        let index = self
            .views
            .iter()
            .position(|v| v == view)
            .ok_or_else(|| DashboardError::view_not_found(&self.id, view))?;
        if index == self.active {
            return Ok(None);
        }
        let previous = std::mem::replace(&mut self.active, index);
        Ok(Some(self.views[previous].clone()))
    }
}
