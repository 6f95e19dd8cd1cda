// Cross-view context bridge - flags between roles and drill-down markers
use crate::domain::drill::DrillContext;
use crate::domain::error::{DashboardError, EntityKind};
use crate::domain::flag::{Flag, FlagId};
use crate::domain::role::Role;
use crate::domain::view::ViewRef;
use std::collections::{BTreeMap, BTreeSet};

/// Panel on the contracting dashboard listing what managers flagged.
pub const MANAGER_FLAG_PANEL: &str = "manager-flags";

#[derive(Debug, Default)]
pub struct ContextBridge {
    next_flag_id: u64,
    flags: Vec<Flag>,
    badge: u32,
    drill: Vec<DrillContext>,
    panels: BTreeSet<String>,
    scoped: BTreeMap<String, ViewRef>,
}

impl ContextBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flag(&mut self, target_id: String, source_role: Role) -> &Flag {
        self.next_flag_id += 1;
        self.flags
            .push(Flag::provider(FlagId(self.next_flag_id), target_id, source_role));
        &self.flags[self.flags.len() - 1]
    }

    /// Returns false when the flag had already been dismissed.
    pub fn dismiss_flag(&mut self, id: FlagId) -> Result<bool, DashboardError> {
        self.flags
            .iter_mut()
            .find(|flag| flag.id == id)
            .map(Flag::dismiss)
            .ok_or_else(|| DashboardError::not_found(EntityKind::Flag, id.0.to_string()))
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn displayed_flags(&self) -> usize {
        self.flags.iter().filter(|flag| flag.is_displayed()).count()
    }

    pub fn bump_badge(&mut self, by: u32) -> u32 {
        self.badge = self.badge.saturating_add(by);
        self.badge
    }

    pub fn clear_badge(&mut self) -> bool {
        std::mem::take(&mut self.badge) != 0
    }

    pub fn badge(&self) -> u32 {
        self.badge
    }

    pub fn push_drill(&mut self, context: DrillContext) {
        self.drill.push(context);
    }

    pub fn clear_drill(&mut self) -> usize {
        let removed = self.drill.len();
        self.drill.clear();
        removed
    }

    /// Removes every marker carrying `entity_id`.
    pub fn remove_drill(&mut self, entity_id: &str) -> Result<usize, DashboardError> {
        let before = self.drill.len();
        self.drill.retain(|ctx| ctx.entity_id != entity_id);
        match before - self.drill.len() {
            0 => Err(DashboardError::not_found(EntityKind::DrillContext, entity_id)),
            removed => Ok(removed),
        }
    }

    pub fn drill_context(&self) -> &[DrillContext] {
        &self.drill
    }

    /// An explicit reveal outlives any view change.
    pub fn show_panel(&mut self, panel: &str) -> bool {
        self.scoped.remove(panel);
        self.panels.insert(panel.to_string())
    }

    /// Reveals `panel` only for as long as `view` stays active.
    pub fn show_scoped_panel(&mut self, panel: &str, view: ViewRef) -> bool {
        self.scoped.insert(panel.to_string(), view);
        self.panels.insert(panel.to_string())
    }

    pub fn hide_panel(&mut self, panel: &str) -> bool {
        self.scoped.remove(panel);
        self.panels.remove(panel)
    }

    /// Scoped panels whose view is in `group` but is no longer `active`.
    pub fn panels_out_of_scope(&self, group: &str, active: &str) -> Vec<String> {
        self.scoped
            .iter()
            .filter(|(_, view)| view.group == group && view.view != active)
            .map(|(panel, _)| panel.clone())
            .collect()
    }

    pub fn panels(&self) -> &BTreeSet<String> {
        &self.panels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flag::FlagStatus;

    #[test]
    fn test_flags_keep_append_order() {
        let mut bridge = ContextBridge::new();
        bridge.add_flag("P2".to_string(), Role::Manager);
        bridge.add_flag("P1".to_string(), Role::Executive);
        let targets: Vec<_> = bridge.flags().iter().map(|f| f.target_id.as_str()).collect();
        assert_eq!(targets, vec!["P2", "P1"]);
    }

    #[test]
    fn test_dismiss_keeps_flag_in_list() {
        let mut bridge = ContextBridge::new();
        let id = bridge.add_flag("P1".to_string(), Role::Manager).id;
        assert!(bridge.dismiss_flag(id).unwrap());
        assert!(!bridge.dismiss_flag(id).unwrap());
        assert_eq!(bridge.flags().len(), 1);
        assert_eq!(bridge.flags()[0].status, FlagStatus::Dismissed);
        assert_eq!(bridge.displayed_flags(), 0);
        assert!(bridge.dismiss_flag(FlagId(99)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_drill_by_entity() {
        let mut bridge = ContextBridge::new();
        let origin = ViewRef::new("dashboard", "manager");
        let target = ViewRef::new("dashboard", "contracting");
        for entity in ["northeast", "cardiology", "northeast"] {
            bridge.push_drill(DrillContext {
                entity_id: entity.to_string(),
                origin: origin.clone(),
                target: target.clone(),
            });
        }
        assert_eq!(bridge.remove_drill("northeast").unwrap(), 2);
        assert!(bridge.remove_drill("northeast").is_err());
        assert_eq!(bridge.clear_drill(), 1);
    }

    #[test]
    fn test_badge_counts_up_until_cleared() {
        let mut bridge = ContextBridge::new();
        bridge.bump_badge(1);
        assert_eq!(bridge.bump_badge(2), 3);
        assert!(bridge.clear_badge());
        assert!(!bridge.clear_badge());
        assert_eq!(bridge.badge(), 0);
    }

    #[test]
    fn test_scoped_panel_follows_its_view() {
        let mut bridge = ContextBridge::new();
        let contracting = ViewRef::new("dashboard", "contracting");
        assert!(bridge.show_scoped_panel(MANAGER_FLAG_PANEL, contracting));
        assert!(bridge.panels_out_of_scope("dashboard", "contracting").is_empty());
        assert!(bridge.panels_out_of_scope("chart-view", "risk").is_empty());
        assert_eq!(
            bridge.panels_out_of_scope("dashboard", "manager"),
            vec![MANAGER_FLAG_PANEL.to_string()]
        );

        bridge.show_panel(MANAGER_FLAG_PANEL);
        assert!(bridge.panels_out_of_scope("dashboard", "manager").is_empty());
        assert!(bridge.panels().contains(MANAGER_FLAG_PANEL));
    }
}
