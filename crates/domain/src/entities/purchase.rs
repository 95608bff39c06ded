use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only expense fact. Never mutated or deleted once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub purchased_on: NaiveDate,
    pub amount: Decimal,
    pub store: Option<String>,
    pub notes: Option<String>,
}

impl Purchase {
    pub fn new(
        user_id: Uuid,
        group_id: Uuid,
        purchased_on: NaiveDate,
        amount: Decimal,
        store: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            group_id,
            purchased_on,
            amount,
            store,
            notes,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        crate::entities::validate_amount(self.amount)
    }
}
