//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};
use validator::Validate;

use crate::domain::room::Room;
use crate::support::errors::{DomainResult, FieldErrors};

/// Reservation status, derived from the stay timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Booked, guest not yet arrived
    Reserved,
    /// Guest has checked in
    CheckedIn,
    /// Guest has checked out
    CheckedOut,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "checked_in" => Self::CheckedIn,
            "checked_out" => Self::CheckedOut,
            _ => Self::Reserved,
        }
    }

    pub fn from_stay(
        checkin_time: Option<DateTime<Utc>>,
        checkout_time: Option<DateTime<Utc>>,
    ) -> Self {
        match (checkin_time, checkout_time) {
            (_, Some(_)) => Self::CheckedOut,
            (Some(_), None) => Self::CheckedIn,
            (None, None) => Self::Reserved,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive calendar date range of a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl StayRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// `[a1, a2]` and `[b1, b2]` overlap iff `a1 <= b2 && b1 <= a2`.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    pub fn is_ordered(&self) -> bool {
        self.from <= self.to
    }
}

/// Stored reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    /// Owning user
    pub user_id: String,
    pub guest_name: String,
    pub total_person: i32,
    /// Total price in minor currency units
    pub total_price: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn stay(&self) -> StayRange {
        StayRange::new(self.from_date, self.to_date)
    }

    /// Overwrite the scalar fields from `input`.
    ///
    /// Check-in and check-out are only overwritten when supplied; every
    /// other field is always replaced.
    pub fn apply(&mut self, input: &ReservationInput) {
        self.guest_name = input.guest_name.clone();
        self.total_person = input.total_person;
        self.total_price = input.total_price;
        self.from_date = input.from_date;
        self.to_date = input.to_date;
        if let Some(checkin) = input.checkin_time {
            self.checkin_time = Some(checkin);
        }
        if let Some(checkout) = input.checkout_time {
            self.checkout_time = Some(checkout);
        }
        self.status = ReservationStatus::from_stay(self.checkin_time, self.checkout_time);
    }
}

/// Reservation fields submitted by the booking form (create and update)
#[derive(Debug, Clone, Validate)]
pub struct ReservationInput {
    #[validate(length(min = 3, max = 256, message = "guest name must be 3-256 characters"))]
    pub guest_name: String,
    #[validate(range(min = 1, message = "total person must be at least 1"))]
    pub total_person: i32,
    #[validate(range(min = 0, message = "total price must not be negative"))]
    pub total_price: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "at least one room is required"))]
    pub room_ids: Vec<i32>,
}

impl ReservationInput {
    /// Required-field validation, reported per field.
    pub fn check(&self) -> DomainResult<()> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        if !self.stay().is_ordered() {
            errors.add("to_date", "to date must be on or after from date");
        }
        errors.into_result()
    }

    pub fn stay(&self) -> StayRange {
        StayRange::new(self.from_date, self.to_date)
    }

    /// Requested rooms, sorted, duplicates collapsed
    pub fn distinct_room_ids(&self) -> Vec<i32> {
        let mut ids = self.room_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Reservation row about to be inserted
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: String,
    pub guest_name: String,
    pub total_person: i32,
    pub total_price: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
}

impl NewReservation {
    pub fn from_input(input: &ReservationInput, user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            guest_name: input.guest_name.clone(),
            total_person: input.total_person,
            total_price: input.total_price,
            from_date: input.from_date,
            to_date: input.to_date,
            checkin_time: input.checkin_time,
            checkout_time: input.checkout_time,
            status: ReservationStatus::from_stay(input.checkin_time, input.checkout_time),
        }
    }

    pub fn stay(&self) -> StayRange {
        StayRange::new(self.from_date, self.to_date)
    }
}

/// A reservation with its resolved rooms
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationWithRooms {
    pub reservation: Reservation,
    pub rooms: Vec<Room>,
}

impl ReservationWithRooms {
    pub fn room_ids(&self) -> Vec<i32> {
        self.rooms.iter().map(|r| r.id).collect()
    }

    pub fn room_numbers(&self) -> Vec<String> {
        self.rooms.iter().map(|r| r.number.clone()).collect()
    }
}

/// Index filter: keep reservations whose stay overlaps the given bounds.
/// A missing bound is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::errors::DomainError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_input() -> ReservationInput {
        ReservationInput {
            guest_name: "Jane Doe".into(),
            total_person: 2,
            total_price: 50_000,
            from_date: date(2024, 6, 1),
            to_date: date(2024, 6, 5),
            checkin_time: None,
            checkout_time: None,
            room_ids: vec![1],
        }
    }

    fn sample_reservation() -> Reservation {
        let now = Utc::now();
        Reservation {
            id: 1,
            user_id: "u-1".into(),
            guest_name: "Jane Doe".into(),
            total_person: 2,
            total_price: 50_000,
            from_date: date(2024, 6, 1),
            to_date: date(2024, 6, 5),
            checkin_time: None,
            checkout_time: None,
            status: ReservationStatus::Reserved,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn overlapping_ranges_share_a_day() {
        let a = StayRange::new(date(2024, 6, 1), date(2024, 6, 5));
        let b = StayRange::new(date(2024, 6, 4), date(2024, 6, 8));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let a = StayRange::new(date(2024, 6, 1), date(2024, 6, 5));
        let b = StayRange::new(date(2024, 6, 6), date(2024, 6, 10));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn shared_boundary_day_overlaps() {
        let a = StayRange::new(date(2024, 6, 1), date(2024, 6, 5));
        let b = StayRange::new(date(2024, 6, 5), date(2024, 6, 5));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn containing_range_overlaps() {
        let outer = StayRange::new(date(2024, 5, 20), date(2024, 6, 30));
        let inner = StayRange::new(date(2024, 6, 1), date(2024, 6, 5));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn valid_input_passes() {
        assert!(sample_input().check().is_ok());
    }

    #[test]
    fn invalid_input_reports_each_field() {
        let input = ReservationInput {
            guest_name: "Jo".into(),
            total_person: 0,
            from_date: date(2024, 6, 5),
            to_date: date(2024, 6, 1),
            room_ids: vec![],
            ..sample_input()
        };

        let Err(DomainError::Validation(errors)) = input.check() else {
            panic!("expected validation error");
        };
        assert!(errors.get("guest_name").is_some());
        assert!(errors.get("total_person").is_some());
        assert!(errors.get("to_date").is_some());
        assert!(errors.get("room_ids").is_some());
        assert!(errors.get("total_price").is_none());
    }

    #[test]
    fn guest_name_length_bounds() {
        let long = ReservationInput {
            guest_name: "x".repeat(257),
            ..sample_input()
        };
        assert!(long.check().is_err());

        let max = ReservationInput {
            guest_name: "x".repeat(256),
            ..sample_input()
        };
        assert!(max.check().is_ok());
    }

    #[test]
    fn distinct_room_ids_collapses_duplicates() {
        let input = ReservationInput {
            room_ids: vec![3, 1, 3, 2, 1],
            ..sample_input()
        };
        assert_eq!(input.distinct_room_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn apply_keeps_checkin_when_omitted() {
        let checkin = Utc::now();
        let mut r = Reservation {
            checkin_time: Some(checkin),
            status: ReservationStatus::CheckedIn,
            ..sample_reservation()
        };

        let input = ReservationInput {
            guest_name: "John Roe".into(),
            total_person: 3,
            ..sample_input()
        };
        r.apply(&input);

        assert_eq!(r.guest_name, "John Roe");
        assert_eq!(r.total_person, 3);
        assert_eq!(r.checkin_time, Some(checkin));
        assert_eq!(r.status, ReservationStatus::CheckedIn);
    }

    #[test]
    fn apply_overwrites_supplied_checkout() {
        let mut r = sample_reservation();
        let checkout = Utc::now();
        r.apply(&ReservationInput {
            checkout_time: Some(checkout),
            ..sample_input()
        });
        assert_eq!(r.checkout_time, Some(checkout));
        assert_eq!(r.status, ReservationStatus::CheckedOut);
    }

    #[test]
    fn status_roundtrip() {
        for status in [
            ReservationStatus::Reserved,
            ReservationStatus::CheckedIn,
            ReservationStatus::CheckedOut,
        ] {
            assert_eq!(ReservationStatus::from_str(status.as_str()), status);
        }
        assert_eq!(ReservationStatus::from_str("bogus"), ReservationStatus::Reserved);
    }
}
