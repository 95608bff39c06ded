use crate::entities::DateRange;
use crate::errors::DomainError;
use crate::repositories::MembershipRepository;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Membership Ledger - answers who was active in a group during a range.
/// A user who left and rejoined inside the range holds several intervals but
/// is counted once.
#[derive(Clone)]
pub struct MembershipLedger {
    memberships: Arc<dyn MembershipRepository>,
}

impl MembershipLedger {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }

    /// Number of distinct users with at least one interval overlapping
    /// [from, to]. An inverted range is an input error.
    pub async fn active_member_count(
        &self,
        group_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize, DomainError> {
        let range = DateRange::new(from, to)?;
        Ok(self.active_members_in(group_id, &range).await?.len())
    }

    pub async fn active_members(
        &self,
        group_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Uuid>, DomainError> {
        let range = DateRange::new(from, to)?;
        self.active_members_in(group_id, &range).await
    }

    /// Distinct user ids with an interval overlapping the range.
    pub(crate) async fn active_members_in(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Uuid>, DomainError> {
        let intervals = self.memberships.find_overlapping(group_id, range).await?;
        let mut seen = HashSet::new();
        let mut members = Vec::new();
        for interval in intervals {
            if seen.insert(interval.user_id) {
                members.push(interval.user_id);
            }
        }
        Ok(members)
    }

    /// Whether the user has any interval covering the given day.
    pub async fn is_active_on(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, DomainError> {
        let members = self
            .active_members_in(group_id, &DateRange::on(date))
            .await?;
        Ok(members.contains(&user_id))
    }
}
