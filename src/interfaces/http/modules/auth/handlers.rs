//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{LoginRequest, LoginResponse, UserInfo};
use crate::application::UserService;
use crate::domain::{Actor, DomainError};
use crate::infrastructure::database::repositories::SeaOrmUserRepository;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService<SeaOrmUserRepository>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Missing username or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let auth = state
        .users
        .login(&request.username, &request.password)
        .await
        .map_err(|e| match e {
            DomainError::Unauthorized(reason) => ApiError::new(StatusCode::UNAUTHORIZED, reason),
            other => ApiError::from(other),
        })?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: auth.user.into(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user info", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<ApiResponse<UserInfo>>> {
    let user = state.users.get_user(&actor.user_id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}
