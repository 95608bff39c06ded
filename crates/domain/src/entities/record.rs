use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Purchase,
    Incentive,
}

/// One row of the merged chronological transaction stream: either a purchase
/// or an incentive realization, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub kind: RecordKind,
    pub record_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    /// Store name for purchases, incentive name for realizations.
    pub label: Option<String>,
    pub notes: Option<String>,
}

impl TransactionRecord {
    pub fn from_purchase(purchase: &crate::Purchase) -> Self {
        Self {
            kind: RecordKind::Purchase,
            record_id: purchase.id,
            user_id: purchase.user_id,
            date: purchase.purchased_on,
            amount: purchase.amount,
            label: purchase.store.clone(),
            notes: purchase.notes.clone(),
        }
    }

    pub fn from_realized(realized: &crate::RealizedIncentive) -> Self {
        Self {
            kind: RecordKind::Incentive,
            record_id: realized.realization.id,
            user_id: realized.realization.user_id,
            date: realized.realization.realized_on,
            amount: realized.amount,
            label: Some(realized.incentive_name.clone()),
            notes: realized.realization.notes.clone(),
        }
    }
}
