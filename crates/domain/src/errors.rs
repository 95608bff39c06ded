use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid range: from {from} is after to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("No active members in group {0} for the requested period")]
    NoActiveMembers(Uuid),

    #[error("Group not found with id: {0}")]
    GroupNotFound(Uuid),

    #[error("User not found with id: {0}")]
    UserNotFound(Uuid),

    #[error("Incentive not found with id: {0}")]
    IncentiveNotFound(Uuid),

    #[error("User {user_id} is not an active member of group {group_id}")]
    NotAMember { user_id: Uuid, group_id: Uuid },

    #[error("Group {0} is at its member capacity")]
    GroupFull(Uuid),

    #[error("Group {0} is locked and rejects new joins")]
    GroupLocked(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Integrity error: {0}")]
    IntegrityError(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl DomainError {
    /// Caller-mistake kinds map to 4xx at the transport edge; anything else
    /// is a system fault.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            DomainError::IntegrityError(_) | DomainError::RepositoryError(_)
        )
    }

    /// Stable tag carried alongside the human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidRange { .. } => "invalid_range",
            DomainError::NoActiveMembers(_) => "no_active_members",
            DomainError::GroupNotFound(_) => "group_not_found",
            DomainError::UserNotFound(_) => "user_not_found",
            DomainError::IncentiveNotFound(_) => "incentive_not_found",
            DomainError::NotAMember { .. } => "not_a_member",
            DomainError::GroupFull(_) => "group_full",
            DomainError::GroupLocked(_) => "group_locked",
            DomainError::ValidationError(_) => "validation",
            DomainError::IntegrityError(_) => "integrity",
            DomainError::RepositoryError(_) => "repository",
        }
    }
}
