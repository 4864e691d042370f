//! Room HTTP handlers

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Actor, Room};
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::modules::reservations::ReservationAppState;

/// Room in API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub number: String,
    /// Nightly price in minor currency units
    pub price: i64,
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            number: room.number,
            price: room.price,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All rooms ordered by number", body = ApiResponse<Vec<RoomDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_rooms(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<ApiResponse<Vec<RoomDto>>>> {
    let rooms = state.reservations.list_rooms(&actor).await?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(RoomDto::from).collect(),
    )))
}
