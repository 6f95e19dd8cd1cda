// Filter state - criteria applied wholesale, never merged
use crate::domain::filters::FilterCriteria;
use std::time::Duration;

/// Simulated latency between "Applying filters..." and the refresh.
pub const APPLY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    active: FilterCriteria,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active: FilterCriteria::defaults(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &FilterCriteria {
        &self.active
    }

    pub fn apply(&mut self, criteria: FilterCriteria) -> &FilterCriteria {
        self.active = criteria;
        &self.active
    }

    pub fn reset(&mut self) -> &FilterCriteria {
        self.active = FilterCriteria::defaults();
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::FilterDimension;

    #[test]
    fn test_apply_replaces_rather_than_merges() {
        let mut state = FilterState::new();
        let criteria = FilterCriteria::new()
            .with(FilterDimension::Region, "northeast")
            .with(FilterDimension::Specialty, "cardiology");
        assert_eq!(state.apply(criteria.clone()), &criteria);
        assert_eq!(state.active().get(FilterDimension::Time), None);
    }

    #[test]
    fn test_reset_restores_defaults_from_any_state() {
        let mut state = FilterState::new();
        state.apply(FilterCriteria::new().with(FilterDimension::Plan, "hmo"));
        assert_eq!(state.reset(), &FilterCriteria::defaults());
        state.apply(FilterCriteria::new());
        assert_eq!(state.reset(), &FilterCriteria::defaults());
    }
}
