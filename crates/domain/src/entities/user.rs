use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core User entity - represents the business domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

impl User {
    pub fn new(username: String, display_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            display_name,
        }
    }

    pub fn with_id(id: Uuid, username: String, display_name: String) -> Self {
        Self {
            id,
            username,
            display_name,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.username.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        if self.display_name.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Display name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
