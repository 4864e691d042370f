use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, FieldErrors, NewUser, Role, User, UserRepository};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> Role {
    match role {
        user::UserRole::Admin => Role::Admin,
        user::UserRole::Staff => Role::Staff,
        user::UserRole::Customer => Role::Customer,
    }
}

fn domain_role_to_entity(role: Role) -> user::UserRole {
    match role {
        Role::Admin => user::UserRole::Admin,
        Role::Staff => user::UserRole::Staff,
        Role::Customer => user::UserRole::Customer,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(domain_role_to_entity(new_user.role)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        let saved = model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                DomainError::Validation(FieldErrors::single(
                    "username",
                    "username or email already exists",
                ))
            } else {
                DomainError::from(e)
            }
        })?;
        debug!(user_id = %saved.id, "User created");
        Ok(user_model_to_domain(saved))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_login(&self, username_or_email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                user::Column::Username
                    .eq(username_or_email)
                    .or(user::Column::Email.eq(username_or_email)),
            )
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        };

        let now = Utc::now();
        let mut active: user::ActiveModel = existing.into();
        active.last_login_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.into(),
            email: format!("{}@example.com", username),
            password_hash: "hash".into(),
            role,
        }
    }

    #[tokio::test]
    async fn finds_by_username_or_email() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        let created = repo.create(new_user("alice", Role::Staff)).await.unwrap();

        let by_name = repo.find_by_login("alice").await.unwrap().unwrap();
        let by_email = repo
            .find_by_login("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_name.role, Role::Staff);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        repo.create(new_user("bob", Role::Customer)).await.unwrap();
        let err = repo.create(new_user("bob", Role::Customer)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn record_login_sets_timestamp() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        let user = repo.create(new_user("carol", Role::Customer)).await.unwrap();
        assert!(user.last_login_at.is_none());

        repo.record_login(&user.id).await.unwrap();
        let reloaded = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());
    }
}
