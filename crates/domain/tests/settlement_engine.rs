//! End-to-end engine tests driving the ledger services against in-memory
//! repository implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::*;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct StoreInner {
    users: Vec<User>,
    groups: Vec<Group>,
    memberships: Vec<Membership>,
    purchases: Vec<Purchase>,
    definitions: Vec<IncentiveDefinition>,
    realizations: Vec<IncentiveRealization>,
    /// Failure plan for save_realization: each call pops one entry; `Some`
    /// makes that call fail with the given error.
    realization_faults: VecDeque<Option<DomainError>>,
}

#[derive(Clone, Default)]
struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store poisoned")
    }

    fn plan_realization_faults(&self, plan: Vec<Option<DomainError>>) {
        self.lock().realization_faults = plan.into();
    }

    fn realization_count(&self) -> usize {
        self.lock().realizations.len()
    }

    fn purchase_count(&self) -> usize {
        self.lock().purchases.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        self.lock().users.push(user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError> {
        Ok(self.lock().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn save(&self, group: &Group) -> Result<Group, DomainError> {
        self.lock().groups.push(group.clone());
        Ok(group.clone())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn find_open(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<Membership>, DomainError> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .find(|m| m.user_id == user_id && m.group_id == group_id && m.is_open())
            .cloned())
    }

    async fn find_overlapping(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Membership>, DomainError> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .filter(|m| m.group_id == group_id && m.overlaps(range))
            .cloned()
            .collect())
    }

    async fn count_open(&self, group_id: Uuid) -> Result<usize, DomainError> {
        Ok(self
            .lock()
            .memberships
            .iter()
            .filter(|m| m.group_id == group_id && m.is_open())
            .count())
    }

    async fn save(&self, membership: &Membership) -> Result<Membership, DomainError> {
        self.lock().memberships.push(membership.clone());
        Ok(membership.clone())
    }

    async fn close(
        &self,
        membership_id: Uuid,
        left_on: NaiveDate,
    ) -> Result<Membership, DomainError> {
        let mut inner = self.lock();
        let membership = inner
            .memberships
            .iter_mut()
            .find(|m| m.id == membership_id)
            .ok_or_else(|| DomainError::RepositoryError("membership missing".to_string()))?;
        membership.left_on = Some(left_on);
        Ok(membership.clone())
    }
}

#[async_trait]
impl PurchaseRepository for InMemoryStore {
    async fn save(&self, purchase: &Purchase) -> Result<Purchase, DomainError> {
        self.lock().purchases.push(purchase.clone());
        Ok(purchase.clone())
    }

    async fn find_in_range(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Purchase>, DomainError> {
        let mut rows: Vec<Purchase> = self
            .lock()
            .purchases
            .iter()
            .filter(|p| p.group_id == group_id && range.contains(p.purchased_on))
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.purchased_on);
        Ok(rows)
    }
}

#[async_trait]
impl IncentiveRepository for InMemoryStore {
    async fn find_definition(
        &self,
        id: Uuid,
    ) -> Result<Option<IncentiveDefinition>, DomainError> {
        Ok(self.lock().definitions.iter().find(|d| d.id == id).cloned())
    }

    async fn find_definition_by_name(
        &self,
        group_id: Uuid,
        name: &str,
    ) -> Result<Option<IncentiveDefinition>, DomainError> {
        Ok(self
            .lock()
            .definitions
            .iter()
            .find(|d| d.group_id == group_id && d.name == name)
            .cloned())
    }

    async fn find_definitions(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<IncentiveDefinition>, DomainError> {
        Ok(self
            .lock()
            .definitions
            .iter()
            .filter(|d| d.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn find_on_purchase_effective(
        &self,
        group_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<IncentiveDefinition>, DomainError> {
        Ok(self
            .lock()
            .definitions
            .iter()
            .filter(|d| d.group_id == group_id && d.on_purchase && d.is_effective_on(date))
            .cloned()
            .collect())
    }

    async fn save_definition(
        &self,
        definition: &IncentiveDefinition,
    ) -> Result<IncentiveDefinition, DomainError> {
        self.lock().definitions.push(definition.clone());
        Ok(definition.clone())
    }

    async fn save_realization(
        &self,
        realization: &IncentiveRealization,
    ) -> Result<IncentiveRealization, DomainError> {
        let mut inner = self.lock();
        if let Some(fault) = inner.realization_faults.pop_front().flatten() {
            return Err(fault);
        }
        inner.realizations.push(realization.clone());
        Ok(realization.clone())
    }

    async fn find_realized_in_range(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<RealizedIncentive>, DomainError> {
        let inner = self.lock();
        let mut rows: Vec<RealizedIncentive> = inner
            .realizations
            .iter()
            .filter(|r| range.contains(r.realized_on))
            .filter_map(|r| {
                inner
                    .definitions
                    .iter()
                    .find(|d| d.id == r.incentive_id && d.group_id == group_id)
                    .map(|d| RealizedIncentive {
                        realization: r.clone(),
                        incentive_name: d.name.clone(),
                        amount: d.amount,
                    })
            })
            .collect();
        rows.sort_by_key(|r| r.realization.realized_on);
        Ok(rows)
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn service_with_store() -> (Arc<LedgerService>, InMemoryStore) {
    let store = InMemoryStore::default();
    let service = Arc::new(LedgerService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    ));
    (service, store)
}

struct Household {
    service: Arc<LedgerService>,
    store: InMemoryStore,
    group: Group,
    alice: User,
    bob: User,
}

/// Two members, both joined 2024-06-01, no incentives defined.
async fn two_member_household() -> Household {
    let (service, store) = service_with_store();
    let alice = service
        .create_user("alice".to_string(), "Alice".to_string())
        .await
        .unwrap();
    let bob = service
        .create_user("bob".to_string(), "Bob".to_string())
        .await
        .unwrap();
    let group = service
        .create_group("flat".to_string(), None)
        .await
        .unwrap();
    service
        .join_group(alice.id, group.id, Some(d(2024, 6, 1)))
        .await
        .unwrap();
    service
        .join_group(bob.id, group.id, Some(d(2024, 6, 1)))
        .await
        .unwrap();
    Household {
        service,
        store,
        group,
        alice,
        bob,
    }
}

#[tokio::test]
async fn open_interval_counts_on_every_later_day() {
    let h = two_member_household().await;
    let ledger = h.service.membership_ledger();

    for day in [d(2024, 6, 1), d(2024, 6, 15), d(2025, 3, 3)] {
        assert_eq!(
            ledger
                .active_member_count(h.group.id, day, day)
                .await
                .unwrap(),
            2
        );
    }
    assert_eq!(
        ledger
            .active_member_count(h.group.id, d(2024, 5, 31), d(2024, 5, 31))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn rejoining_member_is_counted_exactly_once() {
    let (service, _store) = service_with_store();
    let user = service
        .create_user("carol".to_string(), "Carol".to_string())
        .await
        .unwrap();
    let group = service
        .create_group("flat".to_string(), None)
        .await
        .unwrap();

    service
        .join_group(user.id, group.id, Some(d(2024, 1, 1)))
        .await
        .unwrap();
    service
        .leave_group(user.id, group.id, Some(d(2024, 1, 15)))
        .await
        .unwrap();
    service
        .join_group(user.id, group.id, Some(d(2024, 2, 1)))
        .await
        .unwrap();

    let count = service
        .membership_ledger()
        .active_member_count(group.id, d(2024, 1, 1), d(2024, 2, 28))
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn inverted_range_is_rejected_not_zero() {
    let h = two_member_household().await;
    let err = h
        .service
        .membership_ledger()
        .active_member_count(h.group.id, d(2024, 6, 30), d(2024, 6, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidRange { .. }));

    let err = h
        .service
        .expense_aggregator()
        .group_expense_total(h.group.id, d(2024, 6, 30), d(2024, 6, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidRange { .. }));
}

#[tokio::test]
async fn expense_total_is_additive_over_adjacent_ranges() {
    let h = two_member_household().await;
    for (day, cents) in [(3, 1000), (10, 2550), (17, 999), (25, 12000)] {
        h.service
            .record_purchase(
                h.alice.id,
                h.group.id,
                money(cents),
                None,
                Some(d(2024, 6, day)),
                None,
            )
            .await
            .unwrap();
    }

    let aggregator = h.service.expense_aggregator();
    let whole = aggregator
        .group_expense_total(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();
    let first_half = aggregator
        .group_expense_total(h.group.id, d(2024, 6, 1), d(2024, 6, 15))
        .await
        .unwrap();
    let second_half = aggregator
        .group_expense_total(h.group.id, d(2024, 6, 16), d(2024, 6, 30))
        .await
        .unwrap();

    assert_eq!(whole, first_half + second_half);
    assert_eq!(whole, money(16549));
}

#[tokio::test]
async fn settlement_with_no_active_members_is_an_error() {
    let (service, _store) = service_with_store();
    let group = service
        .create_group("empty flat".to_string(), None)
        .await
        .unwrap();

    let err = service
        .settlement_calculator()
        .settlement(group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NoActiveMembers(_)));
}

#[tokio::test]
async fn two_member_hundred_dollar_settlement() {
    let h = two_member_household().await;
    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(3000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();
    h.service
        .record_purchase(
            h.bob.id,
            h.group.id,
            money(7000),
            None,
            Some(d(2024, 6, 6)),
            None,
        )
        .await
        .unwrap();

    let report = h
        .service
        .settlement_calculator()
        .settlement(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();

    assert_eq!(report.total, money(10000));
    assert_eq!(report.member_count, 2);
    assert_eq!(report.group_share, money(5000));
    assert_eq!(report.count_purchases, 2);
    assert_eq!(report.count_incentives, 0);

    // Rows ordered ascending by username.
    assert_eq!(report.per_member.len(), 2);
    assert_eq!(report.per_member[0].username, "alice");
    assert_eq!(report.per_member[0].total_contribution, money(3000));
    assert_eq!(report.per_member[0].owes, money(2000));
    assert_eq!(report.per_member[1].username, "bob");
    assert_eq!(report.per_member[1].total_contribution, money(7000));
    assert_eq!(report.per_member[1].owes, money(-2000));
}

#[tokio::test]
async fn floor_share_remainder_is_never_redistributed() {
    let (service, _store) = service_with_store();
    let group = service
        .create_group("flat".to_string(), None)
        .await
        .unwrap();
    let mut members = Vec::new();
    for name in ["ann", "ben", "cam"] {
        let user = service
            .create_user(name.to_string(), name.to_uppercase())
            .await
            .unwrap();
        service
            .join_group(user.id, group.id, Some(d(2024, 6, 1)))
            .await
            .unwrap();
        members.push(user);
    }
    service
        .record_purchase(
            members[0].id,
            group.id,
            money(10000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();

    let report = service
        .settlement_calculator()
        .settlement(group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();

    // floor(100.00 / 3) = 33.33; one cent stays with the pool.
    assert_eq!(report.group_share, money(3333));
    let remainder = report.total - report.group_share * Decimal::from(3);
    assert_eq!(remainder, money(1));
    assert!(remainder >= Decimal::ZERO);
    assert!(remainder < money(3));
}

#[tokio::test]
async fn on_purchase_incentive_cascades_exactly_once() {
    let h = two_member_household().await;
    h.service
        .record_incentive_definition(
            h.group.id,
            "shopping bonus".to_string(),
            money(150),
            d(2024, 1, 1),
            None,
            true,
            None,
        )
        .await
        .unwrap();

    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(2000),
            Some("GroceryCo".to_string()),
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();

    assert_eq!(h.store.realization_count(), 1);

    let records = h
        .service
        .expense_aggregator()
        .transaction_records(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();
    let incentive_rows: Vec<_> = records
        .iter()
        .filter(|r| r.kind == RecordKind::Incentive)
        .collect();
    assert_eq!(incentive_rows.len(), 1);
    assert_eq!(incentive_rows[0].date, d(2024, 6, 5));
    assert_eq!(incentive_rows[0].user_id, h.alice.id);
    assert_eq!(incentive_rows[0].amount, money(150));
    assert!(incentive_rows[0]
        .notes
        .as_deref()
        .unwrap()
        .contains("2024-06-05"));
}

#[tokio::test]
async fn expired_incentive_does_not_cascade() {
    let h = two_member_household().await;
    // Effective window closed long before today.
    h.service
        .record_incentive_definition(
            h.group.id,
            "old bonus".to_string(),
            money(150),
            d(2020, 1, 1),
            Some(d(2020, 12, 31)),
            true,
            None,
        )
        .await
        .unwrap();

    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(2000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();

    assert_eq!(h.store.realization_count(), 0);
}

#[tokio::test]
async fn manual_realization_does_not_cascade() {
    let h = two_member_household().await;
    let definition = h
        .service
        .record_incentive_definition(
            h.group.id,
            "deep clean".to_string(),
            money(500),
            d(2024, 1, 1),
            None,
            false,
            None,
        )
        .await
        .unwrap();

    h.service
        .record_incentive_realization(
            h.bob.id,
            definition.id,
            Some(d(2024, 6, 10)),
            Some("kitchen".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(h.store.realization_count(), 1);

    let report = h
        .service
        .settlement_calculator()
        .settlement(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();
    assert_eq!(report.count_incentives, 1);
    assert_eq!(report.per_member[1].total_incentives, money(500));
}

#[tokio::test]
async fn first_cascade_integrity_failure_aborts_the_purchase() {
    let h = two_member_household().await;
    h.service
        .record_incentive_definition(
            h.group.id,
            "bonus".to_string(),
            money(100),
            d(2024, 1, 1),
            None,
            true,
            None,
        )
        .await
        .unwrap();

    h.store.plan_realization_faults(vec![Some(DomainError::IntegrityError(
        "definition deleted mid-flight".to_string(),
    ))]);

    let err = h
        .service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(2000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IntegrityError(_)));
    assert_eq!(h.store.purchase_count(), 0);
}

#[tokio::test]
async fn later_cascade_failure_is_skipped_and_purchase_survives() {
    let h = two_member_household().await;
    for name in ["bonus a", "bonus b"] {
        h.service
            .record_incentive_definition(
                h.group.id,
                name.to_string(),
                money(100),
                d(2024, 1, 1),
                None,
                true,
                None,
            )
            .await
            .unwrap();
    }

    // First grant succeeds, second fails.
    h.store.plan_realization_faults(vec![
        None,
        Some(DomainError::RepositoryError("disk hiccup".to_string())),
    ]);

    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(2000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();

    assert_eq!(h.store.purchase_count(), 1);
    assert_eq!(h.store.realization_count(), 1);
}

#[tokio::test]
async fn purchase_round_trips_through_transaction_records() {
    let h = two_member_household().await;
    h.service
        .record_purchase(
            h.bob.id,
            h.group.id,
            money(1234),
            Some("CornerShop".to_string()),
            Some(d(2024, 6, 9)),
            Some("light bulbs".to_string()),
        )
        .await
        .unwrap();

    let records = h
        .service
        .expense_aggregator()
        .transaction_records(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.kind, RecordKind::Purchase);
    assert_eq!(record.amount, money(1234));
    assert_eq!(record.label.as_deref(), Some("CornerShop"));
    assert_eq!(record.notes.as_deref(), Some("light bulbs"));
}

#[tokio::test]
async fn transaction_records_merge_chronologically() {
    let h = two_member_household().await;
    let definition = h
        .service
        .record_incentive_definition(
            h.group.id,
            "bonus".to_string(),
            money(100),
            d(2024, 1, 1),
            None,
            false,
            None,
        )
        .await
        .unwrap();

    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(500),
            None,
            Some(d(2024, 6, 20)),
            None,
        )
        .await
        .unwrap();
    h.service
        .record_incentive_realization(h.bob.id, definition.id, Some(d(2024, 6, 10)), None)
        .await
        .unwrap();
    h.service
        .record_purchase(
            h.bob.id,
            h.group.id,
            money(700),
            None,
            Some(d(2024, 6, 1)),
            None,
        )
        .await
        .unwrap();

    let records = h
        .service
        .expense_aggregator()
        .transaction_records(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(2024, 6, 1), d(2024, 6, 10), d(2024, 6, 20)]);
    let kinds: Vec<RecordKind> = records.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RecordKind::Purchase,
            RecordKind::Incentive,
            RecordKind::Purchase
        ]
    );
}

#[tokio::test]
async fn settlement_is_idempotent_without_intervening_writes() {
    let h = two_member_household().await;
    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(4242),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();

    let calculator = h.service.settlement_calculator();
    let first = calculator
        .settlement(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();
    let second = calculator
        .settlement(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn purchase_by_non_member_is_rejected() {
    let h = two_member_household().await;
    let outsider = h
        .service
        .create_user("dora".to_string(), "Dora".to_string())
        .await
        .unwrap();

    let err = h
        .service
        .record_purchase(
            outsider.id,
            h.group.id,
            money(1000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAMember { .. }));
    assert_eq!(h.store.purchase_count(), 0);
}

#[tokio::test]
async fn backdated_purchase_inside_closed_interval_is_allowed() {
    let h = two_member_household().await;
    h.service
        .leave_group(h.bob.id, h.group.id, Some(d(2024, 6, 15)))
        .await
        .unwrap();

    // Bob was a member on the 10th even though he has since left.
    h.service
        .record_purchase(
            h.bob.id,
            h.group.id,
            money(800),
            None,
            Some(d(2024, 6, 10)),
            None,
        )
        .await
        .unwrap();

    // But not on the 20th.
    let err = h
        .service
        .record_purchase(
            h.bob.id,
            h.group.id,
            money(800),
            None,
            Some(d(2024, 6, 20)),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAMember { .. }));
}

#[tokio::test]
async fn locked_group_rejects_joins() {
    let (service, store) = service_with_store();
    let user = service
        .create_user("erin".to_string(), "Erin".to_string())
        .await
        .unwrap();
    let group = service
        .create_group("flat".to_string(), None)
        .await
        .unwrap();
    {
        let mut inner = store.lock();
        let stored = inner.groups.iter_mut().find(|g| g.id == group.id).unwrap();
        stored.status = GroupStatus::Locked;
    }

    let err = service
        .join_group(user.id, group.id, Some(d(2024, 6, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::GroupLocked(_)));
}

#[tokio::test]
async fn full_group_rejects_joins() {
    let (service, _store) = service_with_store();
    let group = service
        .create_group("tiny flat".to_string(), Some(1))
        .await
        .unwrap();
    let first = service
        .create_user("finn".to_string(), "Finn".to_string())
        .await
        .unwrap();
    let second = service
        .create_user("gabe".to_string(), "Gabe".to_string())
        .await
        .unwrap();

    service
        .join_group(first.id, group.id, Some(d(2024, 6, 1)))
        .await
        .unwrap();
    let err = service
        .join_group(second.id, group.id, Some(d(2024, 6, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::GroupFull(_)));
}

#[tokio::test]
async fn duplicate_open_membership_is_rejected() {
    let h = two_member_household().await;
    let err = h
        .service
        .join_group(h.alice.id, h.group.id, Some(d(2024, 7, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));
}

#[tokio::test]
async fn incentive_names_are_unique_per_group() {
    let h = two_member_household().await;
    h.service
        .record_incentive_definition(
            h.group.id,
            "bonus".to_string(),
            money(100),
            d(2024, 1, 1),
            None,
            false,
            None,
        )
        .await
        .unwrap();

    let err = h
        .service
        .record_incentive_definition(
            h.group.id,
            "bonus".to_string(),
            money(200),
            d(2024, 1, 1),
            None,
            false,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));
}

#[tokio::test]
async fn snapshot_bundles_settlement_roster_catalogue_and_records() {
    let h = two_member_household().await;
    h.service
        .record_incentive_definition(
            h.group.id,
            "bonus".to_string(),
            money(100),
            d(2024, 1, 1),
            None,
            false,
            None,
        )
        .await
        .unwrap();
    h.service
        .record_purchase(
            h.alice.id,
            h.group.id,
            money(5000),
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap();

    let snapshot = h
        .service
        .range_snapshot(h.group.id, d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap();

    assert_eq!(snapshot.group.id, h.group.id);
    assert_eq!(snapshot.settlement.total, money(5000));
    assert_eq!(snapshot.members.len(), 2);
    assert_eq!(snapshot.members[0].username, "alice");
    assert_eq!(snapshot.members[1].username, "bob");
    assert_eq!(snapshot.incentives.len(), 1);
    assert_eq!(snapshot.records.len(), 1);
}

#[tokio::test]
async fn snapshot_for_unknown_group_is_not_found() {
    let (service, _store) = service_with_store();
    let err = service
        .range_snapshot(Uuid::new_v4(), d(2024, 6, 1), d(2024, 6, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::GroupNotFound(_)));
}

#[tokio::test]
async fn amounts_with_more_than_two_decimals_are_rejected() {
    let h = two_member_household().await;
    let err = h
        .service
        .record_purchase(
            h.alice.id,
            h.group.id,
            Decimal::new(10001, 3), // 10.001
            None,
            Some(d(2024, 6, 5)),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));
}
