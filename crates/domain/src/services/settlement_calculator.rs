use crate::entities::{DateRange, MemberBalance, SettlementReport, User};
use crate::errors::DomainError;
use crate::repositories::{IncentiveRepository, PurchaseRepository, UserRepository};
use crate::services::MembershipLedger;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Settlement Calculator - combines the membership ledger and the expense
/// records into a per-member balance sheet for a date range.
#[derive(Clone)]
pub struct SettlementCalculator {
    memberships: MembershipLedger,
    purchases: Arc<dyn PurchaseRepository>,
    incentives: Arc<dyn IncentiveRepository>,
    users: Arc<dyn UserRepository>,
}

impl SettlementCalculator {
    pub fn new(
        memberships: MembershipLedger,
        purchases: Arc<dyn PurchaseRepository>,
        incentives: Arc<dyn IncentiveRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            memberships,
            purchases,
            incentives,
            users,
        }
    }

    pub async fn settlement(
        &self,
        group_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SettlementReport, DomainError> {
        let range = DateRange::new(from, to)?;
        self.settlement_in(group_id, &range).await
    }

    pub(crate) async fn settlement_in(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<SettlementReport, DomainError> {
        // The three reads are independent; only the per-member aggregation
        // below depends on the membership list.
        let (member_ids, purchases, realized) = tokio::try_join!(
            self.memberships.active_members_in(group_id, range),
            self.purchases.find_in_range(group_id, range),
            self.incentives.find_realized_in_range(group_id, range),
        )?;

        if member_ids.is_empty() {
            return Err(DomainError::NoActiveMembers(group_id));
        }

        let purchase_total: Decimal = purchases.iter().map(|p| p.amount).sum();
        let incentive_total: Decimal = realized.iter().map(|r| r.amount).sum();
        let total = purchase_total + incentive_total;
        let group_share = floor_share(total, member_ids.len())?;

        let mut members = self.resolve_members(&member_ids).await?;
        members.sort_by(|a, b| a.username.cmp(&b.username));

        let per_member = members
            .into_iter()
            .map(|user| {
                let mut total_purchases = Decimal::ZERO;
                let mut count_purchases = 0;
                for purchase in purchases.iter().filter(|p| p.user_id == user.id) {
                    total_purchases += purchase.amount;
                    count_purchases += 1;
                }

                let mut total_incentives = Decimal::ZERO;
                let mut count_incentives = 0;
                for grant in realized
                    .iter()
                    .filter(|r| r.realization.user_id == user.id)
                {
                    total_incentives += grant.amount;
                    count_incentives += 1;
                }

                let total_contribution = total_purchases + total_incentives;
                MemberBalance {
                    user_id: user.id,
                    username: user.username,
                    total_purchases,
                    total_incentives,
                    total_contribution,
                    owes: group_share - total_contribution,
                    count_purchases,
                    count_incentives,
                }
            })
            .collect();

        Ok(SettlementReport {
            group_id,
            from: range.from,
            to: range.to,
            member_count: member_ids.len(),
            total,
            group_share,
            count_purchases: purchases.len(),
            count_incentives: realized.len(),
            per_member,
        })
    }

    async fn resolve_members(&self, member_ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        let users = self.users.find_by_ids(member_ids).await?;
        let by_id: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        member_ids
            .iter()
            .map(|id| by_id.get(id).cloned().ok_or(DomainError::UserNotFound(*id)))
            .collect()
    }
}

/// Equal share per member: floor(total / count) at cent granularity. The
/// remainder of up to count - 1 cents is intentionally never redistributed;
/// changing this silently would change settlement outputs.
fn floor_share(total: Decimal, count: usize) -> Result<Decimal, DomainError> {
    let cents = (total * Decimal::from(100)).trunc();
    let cents = cents.to_i64().ok_or_else(|| {
        DomainError::ValidationError(format!("Total {} out of representable range", total))
    })?;
    Ok(Decimal::new(cents.div_euclid(count as i64), 2))
}
