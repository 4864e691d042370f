//! Reservation service: booking lifecycle and double-booking prevention
//!
//! Every operation authorizes the actor first. Writes follow the order
//! validation → overlap check → transactional write → notification; the
//! repository repeats the overlap check inside its transaction so that two
//! concurrent requests cannot both claim a room.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::NotificationGateway;
use crate::domain::{
    AccessPolicy, Actor, DomainError, DomainResult, FieldErrors, NewReservation, Operation,
    ReservationFilter, ReservationInput, ReservationRepository, ReservationWithRooms, Room,
    RoomRepository, StayRange,
};
use crate::support::PaginatedResult;

/// Reservations shown per index page
pub const PAGE_SIZE: u32 = 5;

/// A reservation plus every room, for the edit form's options
#[derive(Debug, Clone)]
pub struct EditForm {
    pub booking: ReservationWithRooms,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Copy)]
enum BookingNotice {
    Created,
    Updated,
}

impl BookingNotice {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

pub struct ReservationService {
    rooms: Arc<dyn RoomRepository>,
    reservations: Arc<dyn ReservationRepository>,
    notifier: Arc<dyn NotificationGateway>,
    policy: Arc<dyn AccessPolicy>,
}

impl ReservationService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        reservations: Arc<dyn ReservationRepository>,
        notifier: Arc<dyn NotificationGateway>,
        policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            rooms,
            reservations,
            notifier,
            policy,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_rooms(&self, actor: &Actor) -> DomainResult<Vec<Room>> {
        self.policy.authorize(actor, Operation::List)?;
        self.rooms.list().await
    }

    /// One page of reservations overlapping `filter`, newest first.
    pub async fn index(
        &self,
        actor: &Actor,
        filter: ReservationFilter,
        page: u32,
    ) -> DomainResult<PaginatedResult<ReservationWithRooms>> {
        self.policy.authorize(actor, Operation::List)?;
        self.reservations.paginate(filter, page.max(1), PAGE_SIZE).await
    }

    pub async fn show(&self, actor: &Actor, id: i32) -> DomainResult<ReservationWithRooms> {
        self.policy.authorize(actor, Operation::Show)?;
        self.load_for(actor, Operation::Show, id).await
    }

    pub async fn edit(&self, actor: &Actor, id: i32) -> DomainResult<EditForm> {
        self.policy.authorize(actor, Operation::Edit)?;
        let booking = self.load_for(actor, Operation::Edit, id).await?;
        let rooms = self.rooms.list().await?;
        Ok(EditForm { booking, rooms })
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(
        &self,
        actor: &Actor,
        input: ReservationInput,
    ) -> DomainResult<ReservationWithRooms> {
        self.policy.authorize(actor, Operation::Create)?;
        input.check()?;

        let room_ids = input.distinct_room_ids();
        let rooms = self.resolve_rooms(&room_ids).await?;
        self.ensure_available(&rooms, input.stay(), None).await?;

        let new = NewReservation::from_input(&input, &actor.user_id);
        let booking = self
            .reservations
            .create(new, &room_ids)
            .await
            .inspect_err(|e| record_write_failure("create", e))?;

        info!(
            reservation_id = booking.reservation.id,
            rooms = ?booking.room_numbers(),
            user_id = %actor.user_id,
            "Reservation created"
        );
        metrics::counter!("reservations_written_total", "operation" => "create").increment(1);

        self.notify(BookingNotice::Created, &booking, &actor.email).await;
        Ok(booking)
    }

    /// Replace every field and room of reservation `id`.
    ///
    /// Omitted check-in/check-out timestamps keep their stored values. Only
    /// customer-initiated updates send a notification.
    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        input: ReservationInput,
    ) -> DomainResult<ReservationWithRooms> {
        self.policy.authorize(actor, Operation::Update)?;
        input.check()?;

        let current = self.load_for(actor, Operation::Update, id).await?;
        let room_ids = input.distinct_room_ids();
        let rooms = self.resolve_rooms(&room_ids).await?;
        self.ensure_available(&rooms, input.stay(), Some(id)).await?;

        let mut reservation = current.reservation;
        reservation.apply(&input);
        let booking = self
            .reservations
            .update(reservation, &room_ids)
            .await
            .inspect_err(|e| record_write_failure("update", e))?;

        info!(
            reservation_id = id,
            rooms = ?booking.room_numbers(),
            status = %booking.reservation.status,
            "Reservation updated"
        );
        metrics::counter!("reservations_written_total", "operation" => "update").increment(1);

        if actor.is_customer() {
            self.notify(BookingNotice::Updated, &booking, &actor.email).await;
        }
        Ok(booking)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> DomainResult<()> {
        self.policy.authorize(actor, Operation::Delete)?;
        self.reservations
            .delete(id)
            .await
            .inspect_err(|e| record_write_failure("delete", e))?;

        info!(reservation_id = id, user_id = %actor.user_id, "Reservation deleted");
        metrics::counter!("reservations_written_total", "operation" => "delete").increment(1);
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn load(&self, id: i32) -> DomainResult<ReservationWithRooms> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))
    }

    async fn load_for(
        &self,
        actor: &Actor,
        operation: Operation,
        id: i32,
    ) -> DomainResult<ReservationWithRooms> {
        let booking = self.load(id).await?;
        self.policy
            .authorize_owned(actor, operation, &booking.reservation.user_id)?;
        Ok(booking)
    }

    /// Every id must name an existing room.
    async fn resolve_rooms(&self, room_ids: &[i32]) -> DomainResult<Vec<Room>> {
        let rooms = self.rooms.find_by_ids(room_ids).await?;
        if rooms.len() == room_ids.len() {
            return Ok(rooms);
        }

        let missing: Vec<String> = room_ids
            .iter()
            .filter(|id| !rooms.iter().any(|r| r.id == **id))
            .map(|id| id.to_string())
            .collect();
        Err(DomainError::Validation(FieldErrors::single(
            "room_ids",
            format!("unknown room(s): {}", missing.join(", ")),
        )))
    }

    async fn ensure_available(
        &self,
        rooms: &[Room],
        stay: StayRange,
        exclude: Option<i32>,
    ) -> DomainResult<()> {
        let mut taken = Vec::new();
        for room in rooms {
            let clashes = self
                .reservations
                .find_overlapping(room.id, stay, exclude)
                .await?;
            if !clashes.is_empty() {
                taken.push(room.number.clone());
            }
        }

        if taken.is_empty() {
            return Ok(());
        }
        info!(rooms = ?taken, from = %stay.from, to = %stay.to, "Rooms unavailable");
        metrics::counter!("reservation_conflicts_total").increment(1);
        Err(DomainError::RoomUnavailable { rooms: taken })
    }

    async fn notify(
        &self,
        notice: BookingNotice,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) {
        let result = match notice {
            BookingNotice::Created => {
                self.notifier.send_booking_created(booking, recipient).await
            }
            BookingNotice::Updated => {
                self.notifier.send_booking_updated(booking, recipient).await
            }
        };

        if let Err(e) = result {
            warn!(
                reservation_id = booking.reservation.id,
                recipient,
                notice = notice.as_str(),
                "Booking notification failed: {}",
                e
            );
            metrics::counter!("booking_notifications_failed_total", "notice" => notice.as_str())
                .increment(1);
        }
    }
}

fn record_write_failure(operation: &'static str, e: &DomainError) {
    if let DomainError::Persistence(detail) = e {
        tracing::error!(operation, "Reservation write failed: {}", detail);
    }
}

// ── Tests ──────────────────────────────────────────────────────
