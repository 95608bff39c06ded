use crate::entities::{DateRange, IncentiveDefinition, IncentiveRealization, RealizedIncentive};
use crate::errors::DomainError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[async_trait]
pub trait IncentiveRepository: Send + Sync {
    async fn find_definition(&self, id: Uuid)
        -> Result<Option<IncentiveDefinition>, DomainError>;

    async fn find_definition_by_name(
        &self,
        group_id: Uuid,
        name: &str,
    ) -> Result<Option<IncentiveDefinition>, DomainError>;

    /// The group's full incentive catalogue.
    async fn find_definitions(&self, group_id: Uuid)
        -> Result<Vec<IncentiveDefinition>, DomainError>;

    /// Definitions with the on-purchase flag that are effective on `date`
    /// (effective_from inclusive, effective_until exclusive).
    async fn find_on_purchase_effective(
        &self,
        group_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<IncentiveDefinition>, DomainError>;

    async fn save_definition(
        &self,
        definition: &IncentiveDefinition,
    ) -> Result<IncentiveDefinition, DomainError>;

    async fn save_realization(
        &self,
        realization: &IncentiveRealization,
    ) -> Result<IncentiveRealization, DomainError>;

    /// Realizations for the group's definitions inside the inclusive range,
    /// joined with each definition's amount and name, ordered by date.
    async fn find_realized_in_range(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<RealizedIncentive>, DomainError>;
}
