//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

use super::dto::*;
use crate::application::ReservationService;
use crate::domain::Actor;
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};

/// Application state for reservation and room handlers
#[derive(Clone)]
pub struct ReservationAppState {
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(IndexQuery),
    responses(
        (status = 200, description = "One page of reservations, newest first", body = ApiResponse<PaginatedResponse<ReservationSummary>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<IndexQuery>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<ReservationSummary>>>> {
    let page = state
        .reservations
        .index(&actor, query.filter(), query.page())
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        ReservationSummary::from,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDetail>),
        (status = 409, description = "A requested room is already booked for these dates"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReservationDetail>>)> {
    let booking = state
        .reservations
        .create(&actor, request.into_input()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDetail::from_booking(
            booking,
            Utc::now(),
        ))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDetail>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
    Path(reservation_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ReservationDetail>>> {
    let booking = state.reservations.show(&actor, reservation_id).await?;
    Ok(Json(ApiResponse::success(ReservationDetail::from_booking(
        booking,
        Utc::now(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}/edit",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Form values and room options", body = ApiResponse<ReservationEditForm>),
        (status = 404, description = "Not found")
    )
)]
pub async fn edit_reservation(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
    Path(reservation_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ReservationEditForm>>> {
    let form = state.reservations.edit(&actor, reservation_id).await?;
    Ok(Json(ApiResponse::success(form.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDetail>),
        (status = 404, description = "Not found"),
        (status = 409, description = "A requested room is already booked for these dates"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
    Path(reservation_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> ApiResult<Json<ApiResponse<ReservationDetail>>> {
    let booking = state
        .reservations
        .update(&actor, reservation_id, request.into_input()?)
        .await?;
    Ok(Json(ApiResponse::success(ReservationDetail::from_booking(
        booking,
        Utc::now(),
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Role may not delete reservations"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationAppState>,
    Extension(actor): Extension<Actor>,
    Path(reservation_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.reservations.delete(&actor, reservation_id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
