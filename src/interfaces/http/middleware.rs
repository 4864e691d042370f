//! Authentication middleware for Axum
//!
//! Resolves the bearer token into an [`Actor`] and stores it in the
//! request extensions; handlers extract it with `Extension<Actor>`.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::common::ApiResponse;
use crate::domain::Actor;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

/// State for the authentication middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            let actor: Actor = claims.to_actor();
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        Err(e) => {
            debug!("Rejected bearer token: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    auth_error_response(AuthError::ExpiredToken)
                }
                _ => auth_error_response(AuthError::InvalidToken),
            }
        }
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MissingToken => "Missing authentication token",
        AuthError::InvalidToken => "Invalid authentication token",
        AuthError::ExpiredToken => "Token has expired",
    };

    (StatusCode::UNAUTHORIZED, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::Role;
    use crate::infrastructure::crypto::jwt::{create_token, TokenClaims};

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "hotel-reservations".into(),
        }
    }

    fn app() -> Router {
        async fn whoami(Extension(actor): Extension<Actor>) -> String {
            format!("{}:{}", actor.username, actor.role)
        }

        Router::new().route("/whoami", get(whoami)).layer(
            middleware::from_fn_with_state(
                AuthState {
                    jwt_config: jwt_config(),
                },
                auth_middleware,
            ),
        )
    }

    async fn call(auth: Option<String>) -> Response {
        let mut req = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        app()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn error_message(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
    }

    #[tokio::test]
    async fn valid_token_puts_actor_in_extensions() {
        let actor = Actor::new("u-1", "desk", "desk@hotel.local", Role::Staff);
        let token = create_token(&actor, &jwt_config()).unwrap();

        let resp = call(Some(format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"desk:staff");
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let resp = call(None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(resp).await, "Missing authentication token");
    }

    #[tokio::test]
    async fn expired_token_is_401() {
        let actor = Actor::new("u-1", "desk", "desk@hotel.local", Role::Staff);
        let mut claims = TokenClaims::new(&actor, &jwt_config());
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let resp = call(Some(format!("Bearer {token}"))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(resp).await, "Token has expired");
    }
}
