//! Room repository interface

use async_trait::async_trait;

use super::model::Room;
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Find every room whose ID is in `ids` (unknown IDs are skipped)
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Room>>;

    /// All rooms ordered by room number
    async fn list(&self) -> DomainResult<Vec<Room>>;
}
