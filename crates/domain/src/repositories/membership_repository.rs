use crate::entities::{DateRange, Membership};
use crate::errors::DomainError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// The open (left_on = null) interval for a (user, group) pair, if any.
    /// The invariant is that at most one exists.
    async fn find_open(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<Membership>, DomainError>;

    /// Every interval of the group overlapping the range; a rejoining user
    /// contributes multiple rows here.
    async fn find_overlapping(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Membership>, DomainError>;

    /// Number of currently open intervals, for the member-cap check.
    async fn count_open(&self, group_id: Uuid) -> Result<usize, DomainError>;

    async fn save(&self, membership: &Membership) -> Result<Membership, DomainError>;

    /// Set left_on on an open interval.
    async fn close(&self, membership_id: Uuid, left_on: NaiveDate)
        -> Result<Membership, DomainError>;
}
