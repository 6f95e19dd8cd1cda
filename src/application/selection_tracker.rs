// Selection tracker - checked rows per table and the bulk actions they guard
use crate::domain::error::{DashboardError, EntityKind};
use crate::domain::selection::{check_unique_rows, BulkAction, BulkRecord, SelectionTable};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct SelectionTracker {
    tables: BTreeMap<String, SelectionTable>,
    row_owner: HashMap<String, String>,
    log: Vec<BulkRecord>,
}

impl SelectionTracker {
    /// Row ids must be unique across all tables so a row can be toggled by id alone.
    pub fn new(tables: Vec<SelectionTable>) -> Result<Self, DashboardError> {
        let mut tracker = Self::default();
        for table in tables {
            let id = table.id().to_string();
            if tracker.tables.contains_key(&id) {
                return Err(DashboardError::invalid_layout(format!(
                    "table {} declared twice",
                    id
                )));
            }
            tracker.index_rows(&id, table.rows())?;
            tracker.tables.insert(id, table);
        }
        Ok(tracker)
    }

    fn index_rows(&mut self, table: &str, rows: &[String]) -> Result<(), DashboardError> {
        for row in rows {
            if let Some(owner) = self.row_owner.get(row) {
                if owner != table {
                    return Err(DashboardError::invalid_layout(format!(
                        "row {} appears in both {} and {}",
                        row, owner, table
                    )));
                }
            }
            self.row_owner.insert(row.clone(), table.to_string());
        }
        Ok(())
    }

    fn table(&self, table: &str) -> Result<&SelectionTable, DashboardError> {
        self.tables
            .get(table)
            .ok_or_else(|| DashboardError::not_found(EntityKind::Table, table))
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut SelectionTable, DashboardError> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| DashboardError::not_found(EntityKind::Table, table))
    }

    pub fn toggle_all(&mut self, table: &str, checked: bool) -> Result<usize, DashboardError> {
        let table = self.table_mut(table)?;
        table.set_all(checked);
        Ok(table.count())
    }

    /// Flips one row, returning the owning table and its new count.
    pub fn toggle_row(&mut self, row: &str) -> Result<(String, usize), DashboardError> {
        let owner = self
            .row_owner
            .get(row)
            .cloned()
            .ok_or_else(|| DashboardError::not_found(EntityKind::Row, row))?;
        let table = self.table_mut(&owner)?;
        table.toggle(row)?;
        let count = table.count();
        Ok((owner, count))
    }

    pub fn count(&self, table: &str) -> Result<usize, DashboardError> {
        Ok(self.table(table)?.count())
    }

    pub fn selected(&self, table: &str) -> Result<&BTreeSet<String>, DashboardError> {
        Ok(self.table(table)?.selected())
    }

    pub fn set_rows(&mut self, table: &str, rows: Vec<String>) -> Result<usize, DashboardError> {
        let previous: Vec<String> = self.table(table)?.rows().to_vec();
        check_unique_rows(table, &rows)?;
        for row in &previous {
            self.row_owner.remove(row);
        }
        if let Err(err) = self.index_rows(table, &rows) {
            // restore the old index so a rejected re-render changes nothing
            for row in &rows {
                if self.row_owner.get(row).is_some_and(|owner| owner == table) {
                    self.row_owner.remove(row);
                }
            }
            for row in &previous {
                self.row_owner.insert(row.clone(), table.to_string());
            }
            return Err(err);
        }
        let entry = self.table_mut(table)?;
        entry.replace_rows(rows)?;
        Ok(entry.count())
    }

    pub fn action_label(&self, table: &str, action: BulkAction) -> Result<String, DashboardError> {
        Ok(format!("{} ({})", action.label(), self.count(table)?))
    }

    /// Records the action against the current selection, or refuses it when
    /// nothing is selected.
    pub fn begin_bulk(&mut self, table: &str, action: BulkAction) -> Result<BulkRecord, DashboardError> {
        let selected = self.selected(table)?;
        if selected.is_empty() {
            return Err(DashboardError::Validation(
                action.empty_selection_message().to_string(),
            ));
        }
        let record = BulkRecord {
            table: table.to_string(),
            action,
            rows: selected.iter().cloned().collect(),
            at: Utc::now(),
        };
        self.log.push(record.clone());
        Ok(record)
    }

    pub fn log(&self) -> &[BulkRecord] {
        &self.log
    }

    pub fn selections(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.tables
            .iter()
            .map(|(id, table)| (id.clone(), table.selected().clone()))
            .collect()
    }
}
