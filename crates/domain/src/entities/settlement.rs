use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-member line of a settlement report. `owes` is the equal share minus
/// the member's own contribution: positive means the member owes the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub user_id: Uuid,
    pub username: String,
    pub total_purchases: Decimal,
    pub total_incentives: Decimal,
    pub total_contribution: Decimal,
    pub owes: Decimal,
    pub count_purchases: usize,
    pub count_incentives: usize,
}

/// Derived balance sheet for a (group, from, to) triple. Never persisted;
/// always recomputable from the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub group_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub member_count: usize,
    pub total: Decimal,
    pub group_share: Decimal,
    pub count_purchases: usize,
    pub count_incentives: usize,
    pub per_member: Vec<MemberBalance>,
}
