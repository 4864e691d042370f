//! Reservation DTOs
//!
//! Projections of [`ReservationWithRooms`] for the booking form. The
//! check-in/check-out defaults below exist only in these payloads; the
//! stored reservation keeps `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::EditForm;
use crate::domain::{
    DomainError, DomainResult, FieldErrors, ReservationFilter, ReservationInput,
    ReservationWithRooms,
};
use crate::interfaces::http::modules::rooms::RoomDto;

/// Body of create and update
///
/// Only field presence is checked here; every other rule is enforced by
/// the reservation service.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReservationRequest {
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub total_person: i32,
    /// Minor currency units
    #[validate(required(message = "total price is required"))]
    pub total_price: Option<i64>,
    #[validate(required(message = "from date is required"))]
    pub from_date: Option<NaiveDate>,
    #[validate(required(message = "to date is required"))]
    pub to_date: Option<NaiveDate>,
    /// Omit on update to keep the stored value
    pub checkin_time: Option<DateTime<Utc>>,
    /// Omit on update to keep the stored value
    pub checkout_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub room_ids: Vec<i32>,
}

impl ReservationRequest {
    /// Unwraps the required fields. The `required` rules above are the
    /// only presence check, so a body that skipped [`ValidatedJson`]
    /// fails with the same field messages.
    ///
    /// [`ValidatedJson`]: crate::interfaces::http::common::ValidatedJson
    pub fn into_input(self) -> DomainResult<ReservationInput> {
        let (Some(total_price), Some(from_date), Some(to_date)) =
            (self.total_price, self.from_date, self.to_date)
        else {
            let fields = self
                .validate()
                .map_or_else(FieldErrors::from, |()| FieldErrors::new());
            return Err(DomainError::Validation(fields));
        };

        Ok(ReservationInput {
            guest_name: self.guest_name,
            total_person: self.total_person,
            total_price,
            from_date,
            to_date,
            checkin_time: self.checkin_time,
            checkout_time: self.checkout_time,
            room_ids: self.room_ids,
        })
    }
}

/// Index query: reservations whose stay overlaps `[from_date, to_date]`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IndexQuery {
    /// Lower bound (inclusive); open-ended when omitted
    pub from_date: Option<NaiveDate>,
    /// Upper bound (inclusive); open-ended when omitted
    pub to_date: Option<NaiveDate>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl IndexQuery {
    pub fn filter(&self) -> ReservationFilter {
        ReservationFilter {
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Index row
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationSummary {
    pub id: i32,
    pub guest_name: String,
    pub rooms: Vec<String>,
    pub total_person: i32,
    pub total_price: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<ReservationWithRooms> for ReservationSummary {
    fn from(booking: ReservationWithRooms) -> Self {
        let rooms = booking.room_numbers();
        let r = booking.reservation;
        Self {
            id: r.id,
            guest_name: r.guest_name,
            rooms,
            total_person: r.total_person,
            total_price: r.total_price,
            from_date: r.from_date,
            to_date: r.to_date,
            checkin_time: r.checkin_time,
            checkout_time: r.checkout_time,
            status: r.status.as_str().to_string(),
        }
    }
}

/// Full reservation, as returned by show, create and update
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDetail {
    pub id: i32,
    pub user_id: String,
    pub guest_name: String,
    pub total_person: i32,
    pub total_price: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Current time when not checked in yet
    pub checkin_time: DateTime<Utc>,
    /// Current time when not checked out yet
    pub checkout_time: DateTime<Utc>,
    pub status: String,
    pub room_ids: Vec<i32>,
    pub room_numbers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReservationDetail {
    pub fn from_booking(booking: ReservationWithRooms, now: DateTime<Utc>) -> Self {
        let room_ids = booking.room_ids();
        let room_numbers = booking.room_numbers();
        let r = booking.reservation;
        Self {
            id: r.id,
            user_id: r.user_id,
            guest_name: r.guest_name,
            total_person: r.total_person,
            total_price: r.total_price,
            from_date: r.from_date,
            to_date: r.to_date,
            checkin_time: r.checkin_time.unwrap_or(now),
            checkout_time: r.checkout_time.unwrap_or(now),
            status: r.status.as_str().to_string(),
            room_ids,
            room_numbers,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Edit form values plus every room as a selectable option
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationEditForm {
    pub id: i32,
    pub guest_name: String,
    pub total_person: i32,
    pub total_price: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// RFC 3339, or `""` when unset
    pub checkin_time: String,
    /// RFC 3339, or `""` when unset
    pub checkout_time: String,
    pub status: String,
    pub room_ids: Vec<i32>,
    pub rooms: Vec<RoomDto>,
}

impl From<EditForm> for ReservationEditForm {
    fn from(form: EditForm) -> Self {
        let room_ids = form.booking.room_ids();
        let r = form.booking.reservation;
        let as_text = |t: Option<DateTime<Utc>>| t.map(|t| t.to_rfc3339()).unwrap_or_default();
        Self {
            id: r.id,
            guest_name: r.guest_name,
            total_person: r.total_person,
            total_price: r.total_price,
            from_date: r.from_date,
            to_date: r.to_date,
            checkin_time: as_text(r.checkin_time),
            checkout_time: as_text(r.checkout_time),
            status: r.status.as_str().to_string(),
            room_ids,
            rooms: form.rooms.into_iter().map(RoomDto::from).collect(),
        }
    }
}
