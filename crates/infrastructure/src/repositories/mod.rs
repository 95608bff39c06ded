pub mod sqlite_group_repository;
pub mod sqlite_incentive_repository;
pub mod sqlite_membership_repository;
pub mod sqlite_purchase_repository;
pub mod sqlite_user_repository;

pub use sqlite_group_repository::SqliteGroupRepository;
pub use sqlite_incentive_repository::SqliteIncentiveRepository;
pub use sqlite_membership_repository::SqliteMembershipRepository;
pub use sqlite_purchase_repository::SqlitePurchaseRepository;
pub use sqlite_user_repository::SqliteUserRepository;

use chrono::NaiveDate;
use diesel::result::DatabaseErrorKind;
use domain::DomainError;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

// Raw store rows carry ids, dates and amounts as text and flags as
// integers. Everything is decoded into strongly-typed domain values here,
// before any business logic sees it.

pub(crate) fn decode_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw)
        .map_err(|_| DomainError::IntegrityError(format!("Malformed identifier: {}", raw)))
}

pub(crate) fn decode_date(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_str(raw)
        .map_err(|_| DomainError::IntegrityError(format!("Malformed date: {}", raw)))
}

pub(crate) fn decode_amount(raw: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw)
        .map_err(|_| DomainError::IntegrityError(format!("Malformed amount: {}", raw)))
}

pub(crate) fn encode_date(date: NaiveDate) -> String {
    // ISO-8601; lexicographic order matches chronological order.
    date.format("%Y-%m-%d").to_string()
}

/// Constraint violations surface as integrity errors so the cascade can
/// distinguish them from transient store failures.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> DomainError {
    match error {
        diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::CheckViolation,
            info,
        ) => DomainError::IntegrityError(info.message().to_string()),
        other => DomainError::RepositoryError(other.to_string()),
    }
}

pub(crate) fn map_pool_error<E: std::fmt::Display>(error: E) -> DomainError {
    DomainError::RepositoryError(error.to_string())
}
