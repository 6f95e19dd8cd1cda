// Flag domain model - cross-role follow-up markers
use super::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Provider,
}

/// A flag is created displayed; dismissal is its only transition and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Displayed,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flag {
    pub id: FlagId,
    pub target_id: String,
    pub item_type: ItemType,
    pub source_role: Role,
    pub created_at: DateTime<Utc>,
    pub status: FlagStatus,
}

impl Flag {
    pub fn provider(id: FlagId, target_id: String, source_role: Role) -> Self {
        Self {
            id,
            target_id,
            item_type: ItemType::Provider,
            source_role,
            created_at: Utc::now(),
            status: FlagStatus::Displayed,
        }
    }

    pub fn is_displayed(&self) -> bool {
        self.status == FlagStatus::Displayed
    }

    /// Returns false when the flag was already dismissed.
    pub fn dismiss(&mut self) -> bool {
        match self.status {
            FlagStatus::Displayed => {
                self.status = FlagStatus::Dismissed;
                true
            }
            FlagStatus::Dismissed => false,
        }
    }
}
