//! User authentication service
//!
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, User, UserRepository};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::password_matches;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Generic over `R: UserRepository` so it stays decoupled from the
/// concrete persistence layer.
pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    jwt_config: JwtConfig,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    /// Authenticate by username or email + password and issue a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repo.find_by_login(username_or_email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        if !password_matches(password, &user.password_hash) {
            warn!(username = %user.username, "Rejected login attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.to_actor(), &self.jwt_config)
            .map_err(|e| DomainError::Persistence(format!("Failed to create token: {}", e)))?;

        // A failed timestamp write must not block the login
        if let Err(e) = self.repo.record_login(&user.id).await {
            warn!(user_id = %user.id, "Failed to record login: {}", e);
        }

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }
}
