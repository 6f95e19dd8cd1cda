// View router - one active view per named group
use crate::domain::error::{DashboardError, EntityKind};
use crate::domain::view::ViewGroup;
use std::collections::BTreeMap;

/// Top-level tab group whose role views also drive the active role.
pub const DASHBOARD_GROUP: &str = "dashboard";

#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    groups: BTreeMap<String, ViewGroup>,
}

impl ViewRouter {
    pub fn new(groups: Vec<ViewGroup>) -> Result<Self, DashboardError> {
        let mut router = Self::default();
        for group in groups {
            let id = group.id().to_string();
            if router.groups.insert(id.clone(), group).is_some() {
                return Err(DashboardError::invalid_layout(format!(
                    "view group {} declared twice",
                    id
                )));
            }
        }
        Ok(router)
    }

    fn group(&self, group: &str) -> Result<&ViewGroup, DashboardError> {
        self.groups
            .get(group)
            .ok_or_else(|| DashboardError::not_found(EntityKind::ViewGroup, group))
    }

    /// Returns the previously active view, or None when `view` was already active.
    pub fn activate(&mut self, group: &str, view: &str) -> Result<Option<String>, DashboardError> {
        self.groups
            .get_mut(group)
            .ok_or_else(|| DashboardError::not_found(EntityKind::ViewGroup, group))?
            .activate(view)
    }

    pub fn active(&self, group: &str) -> Result<&str, DashboardError> {
        Ok(self.group(group)?.active())
    }

    pub fn contains(&self, group: &str, view: &str) -> bool {
        self.groups.get(group).is_some_and(|g| g.contains(view))
    }

    pub fn active_views(&self) -> BTreeMap<String, String> {
        self.groups
            .iter()
            .map(|(id, group)| (id.clone(), group.active().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> ViewRouter {
        ViewRouter::new(vec![
            ViewGroup::new(
                DASHBOARD_GROUP.to_string(),
                vec!["executive".to_string(), "manager".to_string()],
                None,
            )
            .unwrap(),
            ViewGroup::new(
                "time-range".to_string(),
                vec!["3m".to_string(), "ytd".to_string()],
                Some("ytd"),
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_groups_switch_independently() {
        let mut router = router();
        router.activate(DASHBOARD_GROUP, "manager").unwrap();
        assert_eq!(router.active(DASHBOARD_GROUP).unwrap(), "manager");
        assert_eq!(router.active("time-range").unwrap(), "ytd");
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let mut router = router();
        let err = router.activate("sidebar", "open").unwrap_err();
        assert_eq!(
            err,
            DashboardError::not_found(EntityKind::ViewGroup, "sidebar")
        );
    }

    #[test]
    fn test_every_group_keeps_one_active_view() {
        let mut router = router();
        let steps = [
            (DASHBOARD_GROUP, "manager"),
            ("time-range", "3m"),
            (DASHBOARD_GROUP, "pipeline"),
            ("time-range", "3m"),
            ("missing", "x"),
            (DASHBOARD_GROUP, "executive"),
        ];
        for (group, view) in steps {
            let _ = router.activate(group, view);
            let active = router.active_views();
            assert_eq!(active.len(), 2);
            assert!(router.contains(DASHBOARD_GROUP, &active[DASHBOARD_GROUP]));
            assert!(router.contains("time-range", &active["time-range"]));
        }
        assert_eq!(router.active(DASHBOARD_GROUP).unwrap(), "executive");
        assert_eq!(router.active("time-range").unwrap(), "3m");
    }

    #[test]
    fn test_duplicate_groups_rejected() {
        let group = ViewGroup::new("g".to_string(), vec!["a".to_string()], None).unwrap();
        assert!(ViewRouter::new(vec![group.clone(), group]).is_err());
    }
}
