use crate::entities::{
    DateRange, Group, IncentiveDefinition, IncentiveRealization, Membership, Purchase,
    SettlementReport, TransactionRecord, User,
};
use crate::errors::DomainError;
use crate::repositories::{
    GroupRepository, IncentiveRepository, MembershipRepository, PurchaseRepository, UserRepository,
};
use crate::services::{
    ExpenseAggregator, IncentiveCascade, MembershipLedger, SettlementCalculator,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Everything the reconciliation views need for one group and range:
/// settlement, active roster, incentive catalogue, and the merged record
/// stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group: Group,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub settlement: SettlementReport,
    pub members: Vec<User>,
    pub incentives: Vec<IncentiveDefinition>,
    pub records: Vec<TransactionRecord>,
}

/// Ledger Service - the public entry point. Composes the membership ledger,
/// expense aggregator, incentive cascade and settlement calculator; performs
/// every eligibility check eagerly before any write.
pub struct LedgerService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    memberships: Arc<dyn MembershipRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    incentives: Arc<dyn IncentiveRepository>,
    ledger: MembershipLedger,
    expenses: ExpenseAggregator,
    cascade: IncentiveCascade,
    settlements: SettlementCalculator,
}

impl LedgerService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        memberships: Arc<dyn MembershipRepository>,
        purchases: Arc<dyn PurchaseRepository>,
        incentives: Arc<dyn IncentiveRepository>,
    ) -> Self {
        let ledger = MembershipLedger::new(memberships.clone());
        let expenses = ExpenseAggregator::new(purchases.clone(), incentives.clone());
        let cascade = IncentiveCascade::new(incentives.clone());
        let settlements = SettlementCalculator::new(
            ledger.clone(),
            purchases.clone(),
            incentives.clone(),
            users.clone(),
        );
        Self {
            users,
            groups,
            memberships,
            purchases,
            incentives,
            ledger,
            expenses,
            cascade,
            settlements,
        }
    }

    pub fn membership_ledger(&self) -> &MembershipLedger {
        &self.ledger
    }

    pub fn expense_aggregator(&self) -> &ExpenseAggregator {
        &self.expenses
    }

    pub fn settlement_calculator(&self) -> &SettlementCalculator {
        &self.settlements
    }

    /// Snapshot framed on the wall-clock month.
    pub async fn current_month_snapshot(
        &self,
        group_id: Uuid,
    ) -> Result<GroupSnapshot, DomainError> {
        let range = DateRange::month_of(Utc::now().date_naive())?;
        self.snapshot_in(group_id, &range).await
    }

    pub async fn range_snapshot(
        &self,
        group_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GroupSnapshot, DomainError> {
        let range = DateRange::new(from, to)?;
        self.snapshot_in(group_id, &range).await
    }

    async fn snapshot_in(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<GroupSnapshot, DomainError> {
        let group = self.require_group(group_id).await?;

        // Independent reads fan out; nothing below mutates.
        let (settlement, records, incentives, member_ids) = tokio::try_join!(
            self.settlements.settlement_in(group_id, range),
            self.expenses.records_in(group_id, range),
            self.incentives.find_definitions(group_id),
            self.ledger.active_members_in(group_id, range),
        )?;
        let mut members = self.users.find_by_ids(&member_ids).await?;
        members.sort_by(|a, b| a.username.cmp(&b.username));

        Ok(GroupSnapshot {
            group,
            from: range.from,
            to: range.to,
            settlement,
            members,
            incentives,
            records,
        })
    }

    /// Records a purchase for an active member. The incentive cascade runs
    /// before the purchase row is written; the two-step sequence is
    /// deliberately non-atomic (see IncentiveCascade).
    pub async fn record_purchase(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        amount: Decimal,
        store: Option<String>,
        date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Purchase, DomainError> {
        let today = Utc::now().date_naive();
        let purchased_on = date.unwrap_or(today);

        self.require_group(group_id).await?;
        self.require_user(user_id).await?;
        if !self.ledger.is_active_on(user_id, group_id, purchased_on).await? {
            return Err(DomainError::NotAMember { user_id, group_id });
        }

        let purchase = Purchase::new(user_id, group_id, purchased_on, amount, store, notes);
        purchase.validate()?;

        self.cascade
            .on_purchase_recorded(user_id, group_id, purchased_on, today)
            .await?;

        self.purchases.save(&purchase).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn record_incentive_definition(
        &self,
        group_id: Uuid,
        name: String,
        amount: Decimal,
        effective_from: NaiveDate,
        effective_until: Option<NaiveDate>,
        on_purchase: bool,
        description: Option<String>,
    ) -> Result<IncentiveDefinition, DomainError> {
        self.require_group(group_id).await?;

        if self
            .incentives
            .find_definition_by_name(group_id, &name)
            .await?
            .is_some()
        {
            return Err(DomainError::ValidationError(format!(
                "Incentive '{}' already exists in this group",
                name
            )));
        }

        let definition = IncentiveDefinition::new(
            group_id,
            name,
            amount,
            effective_from,
            effective_until,
            on_purchase,
            description,
        );
        definition.validate()?;

        self.incentives.save_definition(&definition).await
    }

    /// Manual incentive bookkeeping. Never triggers the cascade.
    pub async fn record_incentive_realization(
        &self,
        user_id: Uuid,
        incentive_id: Uuid,
        date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<IncentiveRealization, DomainError> {
        let realized_on = date.unwrap_or_else(|| Utc::now().date_naive());

        self.require_user(user_id).await?;
        let definition = self
            .incentives
            .find_definition(incentive_id)
            .await?
            .ok_or(DomainError::IncentiveNotFound(incentive_id))?;
        self.require_group(definition.group_id).await?;
        if !self
            .ledger
            .is_active_on(user_id, definition.group_id, realized_on)
            .await?
        {
            return Err(DomainError::NotAMember {
                user_id,
                group_id: definition.group_id,
            });
        }

        let realization = IncentiveRealization::new(user_id, incentive_id, realized_on, notes);
        self.incentives.save_realization(&realization).await
    }

    /// Opens a membership interval. Locked groups reject joins; a member cap
    /// bounds the number of open intervals; a user cannot hold two open
    /// intervals in the same group.
    pub async fn join_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        joined_on: Option<NaiveDate>,
    ) -> Result<Membership, DomainError> {
        let joined_on = joined_on.unwrap_or_else(|| Utc::now().date_naive());

        let group = self.require_group(group_id).await?;
        self.require_user(user_id).await?;

        if group.is_locked() {
            return Err(DomainError::GroupLocked(group_id));
        }
        if self
            .memberships
            .find_open(user_id, group_id)
            .await?
            .is_some()
        {
            return Err(DomainError::ValidationError(
                "User is already an active member of this group".to_string(),
            ));
        }
        if let Some(cap) = group.max_members {
            if self.memberships.count_open(group_id).await? >= cap as usize {
                return Err(DomainError::GroupFull(group_id));
            }
        }

        let membership = Membership::new(user_id, group_id, joined_on);
        self.memberships.save(&membership).await
    }

    /// Closes the open membership interval. The interval itself is kept;
    /// history is never deleted.
    pub async fn leave_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        left_on: Option<NaiveDate>,
    ) -> Result<Membership, DomainError> {
        let left_on = left_on.unwrap_or_else(|| Utc::now().date_naive());

        let open = self
            .memberships
            .find_open(user_id, group_id)
            .await?
            .ok_or(DomainError::NotAMember { user_id, group_id })?;

        if left_on < open.joined_on {
            return Err(DomainError::ValidationError(format!(
                "Leave date {} is before join date {}",
                left_on, open.joined_on
            )));
        }

        self.memberships.close(open.id, left_on).await
    }

    pub async fn create_user(
        &self,
        username: String,
        display_name: String,
    ) -> Result<User, DomainError> {
        let user = User::new(username, display_name);
        user.validate()?;

        if self
            .users
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::ValidationError(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }

        self.users.save(&user).await
    }

    pub async fn create_group(
        &self,
        name: String,
        max_members: Option<u32>,
    ) -> Result<Group, DomainError> {
        let group = Group::new(name, max_members);
        group.validate()?;
        self.groups.save(&group).await
    }

    async fn require_group(&self, group_id: Uuid) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or(DomainError::GroupNotFound(group_id))
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))
    }
}
