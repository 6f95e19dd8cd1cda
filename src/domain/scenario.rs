// Rate negotiation scenario - projected savings for a proposed rate reduction
use super::error::DashboardError;
use serde::{Deserialize, Serialize};

/// Current annual spend across the modelled systems, in millions.
const BASE_ANNUAL_COST_MILLIONS: f64 = 164.0;
const BASE_PMPM: f64 = 485.20;
/// Market position above benchmark, in percent, before any reduction.
const BASE_MARKET_POSITION: f64 = 8.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Proposed rate reduction in percent.
    pub rate_reduction: f64,
    #[serde(default)]
    pub systems: String,
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub input: ScenarioInput,
    pub annual_savings_millions: f64,
    pub pmpm_reduction: f64,
    pub market_position: f64,
}

impl ScenarioInput {
    pub fn calculate(self) -> Result<ScenarioResult, DashboardError> {
        let reduction = self.rate_reduction;
        if !reduction.is_finite() || !(0.0..=100.0).contains(&reduction) {
            return Err(DashboardError::Validation(format!(
                "Rate reduction must be between 0 and 100, got {}",
                reduction
            )));
        }
        let share = reduction / 100.0;
        Ok(ScenarioResult {
            annual_savings_millions: round_to(BASE_ANNUAL_COST_MILLIONS * share, 1),
            pmpm_reduction: round_to(BASE_PMPM * share, 2),
            market_position: round_to(BASE_MARKET_POSITION - reduction, 1),
            input: self,
        })
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
