use async_trait::async_trait;
use uuid::Uuid;

use super::User;
use crate::domain::DomainResult;

/// Identity store port.
///
/// `insert` must report a duplicate email as `DomainError::UserAlreadyRegistered`
/// so the store's unique constraint backs up the service-level check.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_admins(&self) -> DomainResult<Vec<User>>;
    async fn insert(&self, user: &User) -> DomainResult<()>;
    async fn update(&self, user: &User) -> DomainResult<()>;
}
