//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationFilter, ReservationWithRooms, StayRange};
use crate::domain::DomainResult;
use crate::support::PaginatedResult;

/// Persistence for reservations and their room associations.
///
/// `create`, `update` and `delete` each run as one atomic unit: the
/// reservation row and its association rows are either all written or none
/// are. `create` and `update` repeat the overlap check inside that unit and
/// fail with `RoomUnavailable` if a concurrent write claimed a room first.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID together with its rooms
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ReservationWithRooms>>;

    /// Reservations on `room_id` whose stay overlaps `stay`, optionally
    /// ignoring one reservation (the one being updated)
    async fn find_overlapping(
        &self,
        room_id: i32,
        stay: StayRange,
        exclude: Option<i32>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Insert a reservation and one association row per room
    async fn create(
        &self,
        reservation: NewReservation,
        room_ids: &[i32],
    ) -> DomainResult<ReservationWithRooms>;

    /// Overwrite a reservation row and replace all of its associations
    async fn update(
        &self,
        reservation: Reservation,
        room_ids: &[i32],
    ) -> DomainResult<ReservationWithRooms>;

    /// Delete the association rows, then the reservation row
    async fn delete(&self, id: i32) -> DomainResult<()>;

    /// Newest first; `page` is 1-based
    async fn paginate(
        &self,
        filter: ReservationFilter,
        page: u32,
        page_size: u32,
    ) -> DomainResult<PaginatedResult<ReservationWithRooms>>;
}
