use crate::entities::{DateRange, Purchase};
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn save(&self, purchase: &Purchase) -> Result<Purchase, DomainError>;

    /// All purchases for the group with a date inside the inclusive range,
    /// ordered by date.
    async fn find_in_range(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Purchase>, DomainError>;
}
