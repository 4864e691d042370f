//! First-start data: the default admin account and the room inventory

use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait, Set};
use tracing::{error, info};

use crate::config::{AdminConfig, RoomSeed};
use crate::domain::{NewUser, Role, UserRepository};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::database::entities::room;

/// Create the configured admin user if no users exist yet.
///
/// Failures are logged; the server still starts without an admin.
pub async fn ensure_default_admin(users: &dyn UserRepository, admin: &AdminConfig, cost: u32) {
    match users.count().await {
        Ok(0) => {}
        Ok(_) => return,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&admin.password, cost) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let new_admin = NewUser {
        username: admin.username.clone(),
        email: admin.email.clone(),
        password_hash,
        role: Role::Admin,
    };

    match users.create(new_admin).await {
        Ok(user) => {
            info!(email = %user.email, "Default admin created");
            info!("⚠️  Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

/// Insert `rooms` when the rooms table is empty; returns how many were added.
pub async fn seed_rooms(db: &DatabaseConnection, rooms: &[RoomSeed]) -> Result<u64, DbErr> {
    if rooms.is_empty() || room::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    let models = rooms.iter().map(|r| room::ActiveModel {
        id: NotSet,
        room_number: Set(r.number.clone()),
        price: Set(r.price),
        created_at: Set(now),
    });
    room::Entity::insert_many(models).exec(db).await?;

    info!(count = rooms.len(), "Seeded rooms");
    Ok(rooms.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::password::password_matches;
    use crate::infrastructure::database::repositories::SeaOrmUserRepository;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn rooms_are_seeded_once() {
        let db = test_database().await;
        let first = [RoomSeed::new("101", 100), RoomSeed::new("102", 200)];
        assert_eq!(seed_rooms(&db, &first).await.unwrap(), 2);
        assert_eq!(seed_rooms(&db, &[RoomSeed::new("103", 300)]).await.unwrap(), 0);
        assert_eq!(room::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn default_admin_is_created_only_when_no_users_exist() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        let admin = AdminConfig {
            password: "pw".into(),
            ..AdminConfig::default()
        };

        ensure_default_admin(&repo, &admin, 4).await;
        ensure_default_admin(&repo, &admin, 4).await;

        assert_eq!(repo.count().await.unwrap(), 1);
        let user = repo.find_by_login(&admin.username).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(password_matches("pw", &user.password_hash));
    }

    #[tokio::test]
    async fn unusable_admin_password_creates_no_user() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        let admin = AdminConfig {
            password: String::new(),
            ..AdminConfig::default()
        };

        ensure_default_admin(&repo, &admin, 4).await;

        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
