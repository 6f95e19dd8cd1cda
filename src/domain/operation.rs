// Simulated remote operations - always succeed after a fixed delay
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum SimulatedOperation {
    SyncDashboards,
    ExportDashboard { format: String },
    RefreshData,
    UpdateExecutive { provider_id: String },
    ExportHeatmap,
    RefreshMap,
    ExportAuditLog,
    NegotiationPacket { format: String },
    PipelineInfographic,
    SelectedPacket { count: usize },
}

impl SimulatedOperation {
    pub fn delay(&self) -> Duration {
        let ms = match self {
            SimulatedOperation::UpdateExecutive { .. }
            | SimulatedOperation::ExportHeatmap
            | SimulatedOperation::ExportAuditLog => 1000,
            SimulatedOperation::SyncDashboards
            | SimulatedOperation::ExportDashboard { .. }
            | SimulatedOperation::RefreshMap
            | SimulatedOperation::PipelineInfographic => 1500,
            SimulatedOperation::RefreshData
            | SimulatedOperation::NegotiationPacket { .. }
            | SimulatedOperation::SelectedPacket { .. } => 2000,
        };
        Duration::from_millis(ms)
    }

    pub fn started_message(&self) -> String {
        match self {
            SimulatedOperation::SyncDashboards => "Syncing dashboards across all roles...".to_string(),
            SimulatedOperation::ExportDashboard { format } => format!("Preparing {} export...", format),
            SimulatedOperation::RefreshData => "Refreshing data...".to_string(),
            SimulatedOperation::UpdateExecutive { .. } => "Sending update to executive dashboard".to_string(),
            SimulatedOperation::ExportHeatmap => "Preparing heatmap data export...".to_string(),
            SimulatedOperation::RefreshMap => "Refreshing map data...".to_string(),
            SimulatedOperation::ExportAuditLog => "Exporting audit trail...".to_string(),
            SimulatedOperation::NegotiationPacket { format } => {
                format!("Preparing negotiation packet ({})...", format.to_uppercase())
            }
            SimulatedOperation::PipelineInfographic => {
                "Preparing pipeline infographic for download...".to_string()
            }
            SimulatedOperation::SelectedPacket { count } => {
                format!("Creating negotiation packet for {} providers...", count)
            }
        }
    }

    pub fn completed_message(&self) -> String {
        match self {
            SimulatedOperation::SyncDashboards => "All dashboards synchronized successfully".to_string(),
            SimulatedOperation::ExportDashboard { format } => format!("{} export ready for download", format),
            SimulatedOperation::RefreshData => "Data refreshed successfully".to_string(),
            SimulatedOperation::UpdateExecutive { .. } => {
                "Executive dashboard updated successfully".to_string()
            }
            SimulatedOperation::ExportHeatmap => "Heatmap data exported successfully".to_string(),
            SimulatedOperation::RefreshMap => "Map data updated".to_string(),
            SimulatedOperation::ExportAuditLog => "Audit log exported successfully".to_string(),
            SimulatedOperation::NegotiationPacket { format } => {
                format!("Negotiation packet ready ({})", format.to_uppercase())
            }
            SimulatedOperation::PipelineInfographic => "Pipeline infographic exported as PNG".to_string(),
            SimulatedOperation::SelectedPacket { .. } => {
                "Negotiation packet ready for download (PPT)".to_string()
            }
        }
    }

    /// Whether completion should push fresh data to the charts.
    pub fn refreshes_data(&self) -> bool {
        matches!(
            self,
            SimulatedOperation::RefreshData | SimulatedOperation::RefreshMap
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_format() {
        let op = SimulatedOperation::NegotiationPacket {
            format: "ppt".to_string(),
        };
        assert_eq!(op.started_message(), "Preparing negotiation packet (PPT)...");
        assert_eq!(op.completed_message(), "Negotiation packet ready (PPT)");
        assert_eq!(op.delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_sync_delay() {
        assert_eq!(
            SimulatedOperation::SyncDashboards.delay(),
            Duration::from_millis(1500)
        );
        assert!(!SimulatedOperation::SyncDashboards.refreshes_data());
        assert!(SimulatedOperation::RefreshData.refreshes_data());
    }
}
