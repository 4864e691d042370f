//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::EmptyData;
use super::middleware::{auth_middleware, AuthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, health, reservations, rooms};
use crate::application::{ReservationService, UserService};
use crate::config::AppConfig;
use crate::domain::RolePolicy;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::{
    SeaOrmReservationRepository, SeaOrmRoomRepository, SeaOrmUserRepository,
};
use crate::infrastructure::mail::gateway_from_config;

/// State shared by every route; handlers extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: AuthState,
    pub users: Arc<UserService<SeaOrmUserRepository>>,
    pub reservations: Arc<ReservationService>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wire repositories, services and the notification gateway over `db`.
    pub fn build(db: DatabaseConnection, config: &AppConfig) -> Self {
        let jwt_config = JwtConfig::from_security(&config.security);

        let users = UserService::new(
            Arc::new(SeaOrmUserRepository::new(db.clone())),
            jwt_config.clone(),
        );
        let reservations = ReservationService::new(
            Arc::new(SeaOrmRoomRepository::new(db.clone())),
            Arc::new(SeaOrmReservationRepository::new(db.clone())),
            gateway_from_config(&config.mail),
            Arc::new(RolePolicy),
        );

        Self {
            db,
            auth: AuthState { jwt_config },
            users: Arc::new(users),
            reservations: Arc::new(reservations),
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationAppState {
    fn from_ref(s: &AppState) -> Self {
        reservations::ReservationAppState {
            reservations: Arc::clone(&s.reservations),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::get_current_user,
        rooms::list_rooms,
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::edit_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
    ),
    components(schemas(
        EmptyData,
        health::HealthResponse,
        health::ComponentHealth,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::UserInfo,
        rooms::RoomDto,
        reservations::ReservationRequest,
        reservations::ReservationSummary,
        reservations::ReservationDetail,
        reservations::ReservationEditForm,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Login and current user"),
        (name = "Rooms", description = "Room inventory"),
        (name = "Reservations", description = "Booking lifecycle")
    ),
    info(
        title = "Hotel Reservations API",
        version = "1.0.0",
        description = "Room reservations with double-booking prevention"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::get_current_user))
        .route("/api/v1/rooms", get(rooms::list_rooms))
        .route(
            "/api/v1/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}/edit",
            get(reservations::edit_reservation),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(metrics_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::RoomSeed;
    use crate::domain::{NewUser, Role, UserRepository};
    use crate::infrastructure::crypto::password::hash_password;
    use crate::infrastructure::database::seed::seed_rooms;
    use crate::infrastructure::database::test_database;

    const PASSWORD: &str = "secret-pw";

    async fn test_app() -> Router {
        let db = test_database().await;
        seed_rooms(&db, &[RoomSeed::new("101", 10_000), RoomSeed::new("102", 12_000)])
            .await
            .unwrap();

        let users = SeaOrmUserRepository::new(db.clone());
        for (username, role) in [("admin", Role::Admin), ("guest", Role::Customer)] {
            users
                .create(NewUser {
                    username: username.into(),
                    email: format!("{username}@hotel.local"),
                    password_hash: hash_password(PASSWORD, 4).unwrap(),
                    role,
                })
                .await
                .unwrap();
        }

        let state = AppState::build(db, &AppConfig::default());
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(state, handle)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, username: &str) -> String {
        let resp = send(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"username": username, "password": PASSWORD})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        json_body(resp).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn booking(guest: &str, room_ids: &[i32], from: &str, to: &str) -> Value {
        json!({
            "guest_name": guest,
            "total_person": 2,
            "total_price": 40000,
            "from_date": from,
            "to_date": to,
            "room_ids": room_ids,
        })
    }

    #[tokio::test]
    async fn health_reports_database_ok() {
        let app = test_app().await;
        let resp = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = test_app().await;

        let resp = send(&app, Method::GET, "/api/v1/reservations", None, None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["success"], false);

        let resp = send(&app, Method::GET, "/api/v1/rooms", Some("garbage"), None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = test_app().await;
        let resp = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "admin", "password": "nope"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_the_token_owner() {
        let app = test_app().await;
        let token = login(&app, "guest").await;

        let resp = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["username"], "guest");
        assert_eq!(body["data"]["role"], "customer");
    }

    #[tokio::test]
    async fn booking_lifecycle_over_http() {
        let app = test_app().await;
        let token = login(&app, "admin").await;
        let token = Some(token.as_str());

        let rooms = json_body(send(&app, Method::GET, "/api/v1/rooms", token, None).await).await;
        let rooms = rooms["data"].as_array().unwrap().clone();
        assert_eq!(rooms.len(), 2);
        let room_101 = rooms[0]["id"].as_i64().unwrap() as i32;
        let room_102 = rooms[1]["id"].as_i64().unwrap() as i32;

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            token,
            Some(booking("Jane Doe", &[room_101], "2024-06-01", "2024-06-05")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = json_body(resp).await;
        let id = created["data"]["id"].as_i64().unwrap();
        assert_eq!(created["data"]["room_numbers"], json!(["101"]));

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            token,
            Some(booking("John Roe", &[room_101], "2024-06-04", "2024-06-08")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let conflict = json_body(resp).await;
        assert!(conflict["error"].as_str().unwrap().contains("101"));

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            token,
            Some(booking("John Roe", &[room_102], "2024-06-04", "2024-06-08")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let index = json_body(
            send(
                &app,
                Method::GET,
                "/api/v1/reservations?from_date=2024-06-01&to_date=2024-06-02",
                token,
                None,
            )
            .await,
        )
        .await;
        assert_eq!(index["data"]["total"], 1);
        assert_eq!(index["data"]["items"][0]["id"], id);

        let uri = format!("/api/v1/reservations/{id}/edit");
        let edit = json_body(send(&app, Method::GET, &uri, token, None).await).await;
        assert_eq!(edit["data"]["checkin_time"], "");
        assert_eq!(edit["data"]["rooms"].as_array().unwrap().len(), 2);

        let uri = format!("/api/v1/reservations/{id}");
        let resp = send(
            &app,
            Method::PUT,
            &uri,
            token,
            Some(booking("Jane Doe", &[room_101], "2024-06-01", "2024-06-03")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["data"]["to_date"], "2024-06-03");

        let resp = send(&app, Method::DELETE, &uri, token, None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, Method::GET, &uri, token, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_reservation_is_422_with_field_errors() {
        let app = test_app().await;
        let token = login(&app, "admin").await;

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking("ab", &[], "2024-06-05", "2024-06-01")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(resp).await;
        assert!(body["errors"]["guest_name"].is_array());
        assert!(body["errors"]["room_ids"].is_array());
        assert!(body["errors"]["to_date"].is_array());
    }

    #[tokio::test]
    async fn missing_dates_are_422() {
        let app = test_app().await;
        let token = login(&app, "admin").await;

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(json!({"guest_name": "Jane Doe", "total_person": 1, "room_ids": [1]})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(resp).await["errors"]["from_date"].is_array());
    }

    #[tokio::test]
    async fn missing_price_is_422() {
        let app = test_app().await;
        let token = login(&app, "admin").await;

        let mut body = booking("Jane Doe", &[1], "2024-06-01", "2024-06-05");
        body.as_object_mut().unwrap().remove("total_price");
        let resp = send(&app, Method::POST, "/api/v1/reservations", Some(&token), Some(body)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(resp).await["errors"]["total_price"][0],
            "total price is required"
        );

        let resp = send(&app, Method::GET, "/api/v1/reservations", Some(&token), None).await;
        assert_eq!(json_body(resp).await["data"]["total"], 0);
    }

    #[tokio::test]
    async fn customers_cannot_open_other_guests_bookings() {
        let app = test_app().await;
        let admin = login(&app, "admin").await;
        let guest = login(&app, "guest").await;

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            Some(&admin),
            Some(booking("Walk In", &[2], "2024-08-01", "2024-08-03")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let id = json_body(resp).await["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/v1/reservations/{id}");

        let resp = send(&app, Method::GET, &uri, Some(&guest), None).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = send(&app, Method::GET, &format!("{uri}/edit"), Some(&guest), None).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = send(
            &app,
            Method::PUT,
            &uri,
            Some(&guest),
            Some(booking("Jane Doe", &[2], "2024-08-01", "2024-08-02")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = send(&app, Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(json_body(resp).await["data"]["guest_name"], "Walk In");
    }

    #[tokio::test]
    async fn customers_cannot_delete() {
        let app = test_app().await;
        let token = login(&app, "guest").await;

        let resp = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking("Jane Doe", &[1], "2024-07-01", "2024-07-02")),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let id = json_body(resp).await["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/v1/reservations/{id}");
        let resp = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = test_app().await;
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = test_app().await;
        let resp = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let doc = json_body(resp).await;
        assert!(doc["paths"]["/api/v1/reservations/{reservation_id}"].is_object());
    }
}
