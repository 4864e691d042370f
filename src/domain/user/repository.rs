use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Look a user up by username or email
    async fn find_by_login(&self, username_or_email: &str) -> DomainResult<Option<User>>;

    async fn count(&self) -> DomainResult<u64>;

    async fn record_login(&self, id: &str) -> DomainResult<()>;
}
