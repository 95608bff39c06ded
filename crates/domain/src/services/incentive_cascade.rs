use crate::entities::IncentiveRealization;
use crate::errors::DomainError;
use crate::repositories::IncentiveRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Incentive Cascade Resolver - auto-grants on-purchase incentives.
///
/// Runs once per purchase, before the purchase row is written. The sequence
/// is not atomic: a crash mid-cascade leaves realizations without a purchase,
/// which is accepted because realizations are idempotent facts on their own.
#[derive(Clone)]
pub struct IncentiveCascade {
    incentives: Arc<dyn IncentiveRepository>,
}

impl IncentiveCascade {
    pub fn new(incentives: Arc<dyn IncentiveRepository>) -> Self {
        Self { incentives }
    }

    /// Creates one realization dated `purchase_date` for every on-purchase
    /// definition effective on `today`. An integrity failure on the first
    /// insert aborts the purchase; any later failure is logged and skipped
    /// so an otherwise-valid expense record is not lost.
    pub async fn on_purchase_recorded(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        purchase_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<IncentiveRealization>, DomainError> {
        let definitions = self
            .incentives
            .find_on_purchase_effective(group_id, today)
            .await?;

        let mut granted = Vec::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            let notes = format!("Auto-granted by purchase on {}", purchase_date);
            let realization =
                IncentiveRealization::new(user_id, definition.id, purchase_date, Some(notes));

            match self.incentives.save_realization(&realization).await {
                Ok(saved) => granted.push(saved),
                Err(err @ DomainError::IntegrityError(_)) if index == 0 => return Err(err),
                Err(err) => {
                    warn!(
                        incentive_id = %definition.id,
                        user_id = %user_id,
                        error = %err,
                        "incentive cascade step failed, skipping"
                    );
                }
            }
        }
        Ok(granted)
    }
}
