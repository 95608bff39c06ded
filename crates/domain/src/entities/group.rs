use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Open,
    Locked,
}

/// A shared-expense group. Status mutation is an admin action; the engine
/// reads status to enforce join eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub status: GroupStatus,
    pub max_members: Option<u32>,
    pub created_at: NaiveDateTime,
}

impl Group {
    pub fn new(name: String, max_members: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            status: GroupStatus::Open,
            max_members,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn with_id(
        id: Uuid,
        name: String,
        status: GroupStatus,
        max_members: Option<u32>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name,
            status,
            max_members,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Group name cannot be empty".to_string(),
            ));
        }
        if self.max_members == Some(0) {
            return Err(crate::DomainError::ValidationError(
                "Member cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.status == GroupStatus::Locked
    }
}
