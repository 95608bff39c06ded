use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring credit available to a group. Definitions with `on_purchase`
/// set are auto-granted whenever a member records a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveDefinition {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub effective_from: NaiveDate,
    pub effective_until: Option<NaiveDate>,
    pub on_purchase: bool,
    pub description: Option<String>,
}

impl IncentiveDefinition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        group_id: Uuid,
        name: String,
        amount: Decimal,
        effective_from: NaiveDate,
        effective_until: Option<NaiveDate>,
        on_purchase: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            name,
            amount,
            effective_from,
            effective_until,
            on_purchase,
            description,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Incentive name cannot be empty".to_string(),
            ));
        }
        crate::entities::validate_amount(self.amount)?;
        if let Some(until) = self.effective_until {
            if until <= self.effective_from {
                return Err(crate::DomainError::ValidationError(
                    "Effective-until must be after effective-from".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Effective-from is inclusive, effective-until exclusive.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_until.map_or(true, |until| until > date)
    }
}

/// One instance of a member earning an incentive's amount. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveRealization {
    pub id: Uuid,
    pub user_id: Uuid,
    pub incentive_id: Uuid,
    pub realized_on: NaiveDate,
    pub notes: Option<String>,
}

impl IncentiveRealization {
    pub fn new(
        user_id: Uuid,
        incentive_id: Uuid,
        realized_on: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            incentive_id,
            realized_on,
            notes,
        }
    }
}

/// Read model joining a realization with its definition's amount and name,
/// as produced by the range-scan query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedIncentive {
    pub realization: IncentiveRealization,
    pub incentive_name: String,
    pub amount: Decimal,
}
