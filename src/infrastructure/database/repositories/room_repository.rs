//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::room::{Room, RoomRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::room;

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn room_model_to_domain(m: room::Model) -> Room {
    Room::new(m.id, m.room_number, m.price)
}

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(room_model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Room>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = room::Entity::find()
            .filter(room::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(room::Column::RoomNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(room_model_to_domain).collect())
    }

    async fn list(&self) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .order_by_asc(room::Column::RoomNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(room_model_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomSeed;
    use crate::infrastructure::database::seed::seed_rooms;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn lists_rooms_by_number() {
        let db = test_database().await;
        let rooms = [RoomSeed::new("102", 9_000), RoomSeed::new("101", 8_000)];
        let seeded = seed_rooms(&db, &rooms).await.unwrap();
        assert_eq!(seeded, 2);

        let repo = SeaOrmRoomRepository::new(db);
        let rooms = repo.list().await.unwrap();
        let numbers: Vec<_> = rooms.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "102"]);
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown() {
        let db = test_database().await;
        seed_rooms(&db, &[RoomSeed::new("101", 8_000)]).await.unwrap();
        let repo = SeaOrmRoomRepository::new(db);

        let all = repo.list().await.unwrap();
        let id = all[0].id;

        let found = repo.find_by_ids(&[id, 9999]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, "101");
        assert!(repo.find_by_id(9999).await.unwrap().is_none());
        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }
}
