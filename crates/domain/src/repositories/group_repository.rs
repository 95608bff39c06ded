use crate::entities::Group;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError>;
    async fn save(&self, group: &Group) -> Result<Group, DomainError>;
}
