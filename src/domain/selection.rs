// Selection domain model - checked rows of one rendered table
use super::error::{DashboardError, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTable {
    id: String,
    rows: Vec<String>,
    selected: BTreeSet<String>,
}

impl SelectionTable {
    /// Row ids must be unique within the table, or select-all would check
    /// fewer rows than are rendered.
    pub fn new(id: String, rows: Vec<String>) -> Result<Self, DashboardError> {
        check_unique_rows(&id, &rows)?;
        Ok(Self {
            id,
            rows,
            selected: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn contains(&self, row: &str) -> bool {
        self.rows.iter().any(|r| r == row)
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn set_all(&mut self, checked: bool) {
        if checked {
            self.selected = self.rows.iter().cloned().collect();
        } else {
            self.selected.clear();
        }
    }

    /// Returns the new checked state of the row.
    pub fn toggle(&mut self, row: &str) -> Result<bool, DashboardError> {
        if !self.contains(row) {
            return Err(DashboardError::not_found(EntityKind::Row, row));
        }
        if self.selected.remove(row) {
            Ok(false)
        } else {
            self.selected.insert(row.to_string());
            Ok(true)
        }
    }

    /// Replace the rendered rows, keeping only selections that are still rendered.
    pub fn replace_rows(&mut self, rows: Vec<String>) -> Result<(), DashboardError> {
        check_unique_rows(&self.id, &rows)?;
        self.selected.retain(|row| rows.contains(row));
        self.rows = rows;
        Ok(())
    }
}

pub fn check_unique_rows(table: &str, rows: &[String]) -> Result<(), DashboardError> {
    let mut seen = BTreeSet::new();
    match rows.iter().find(|row| !seen.insert(row.as_str())) {
        Some(row) => Err(DashboardError::invalid_layout(format!(
            "row {} appears twice in {}",
            row, table
        ))),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Export,
    Flag,
    RequestApproval,
    ExportPacket,
    ExportExcel,
}

impl BulkAction {
    pub const ALL: [BulkAction; 5] = [
        BulkAction::Export,
        BulkAction::Flag,
        BulkAction::RequestApproval,
        BulkAction::ExportPacket,
        BulkAction::ExportExcel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Export => "export",
            BulkAction::Flag => "flag",
            BulkAction::RequestApproval => "request_approval",
            BulkAction::ExportPacket => "export_packet",
            BulkAction::ExportExcel => "export_excel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BulkAction::Export => "Export Selected",
            BulkAction::Flag => "Flag Selected",
            BulkAction::RequestApproval => "Request Approval",
            BulkAction::ExportPacket => "Export Packet",
            BulkAction::ExportExcel => "Export to Excel",
        }
    }

    pub fn empty_selection_message(&self) -> &'static str {
        match self {
            BulkAction::RequestApproval => "Please select items for approval",
            BulkAction::Flag => "Please select items to flag",
            _ => "Please select items to export",
        }
    }
}

/// One accepted bulk action. Refused actions never produce a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkRecord {
    pub table: String,
    pub action: BulkAction,
    pub rows: Vec<String>,
    pub at: DateTime<Utc>,
}
