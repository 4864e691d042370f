//! Log-only notification gateway for development and tests

use async_trait::async_trait;
use tracing::info;

use super::templates::{render, EmailKind};
use crate::application::ports::{NotificationError, NotificationGateway};
use crate::domain::ReservationWithRooms;

/// Writes the rendered booking email to the log instead of sending it.
#[derive(Clone, Debug, Default)]
pub struct LogNotificationGateway;

impl LogNotificationGateway {
    pub const fn new() -> Self {
        Self
    }

    fn emit(&self, kind: EmailKind, booking: &ReservationWithRooms, to: &str) {
        let email = render(kind, booking);
        info!(
            to = %to,
            reservation_id = booking.reservation.id,
            subject = %email.subject,
            body = %email.body,
            "📧 Booking email (mail disabled)"
        );
    }
}

#[async_trait]
impl NotificationGateway for LogNotificationGateway {
    async fn send_booking_created(
        &self,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        self.emit(EmailKind::BookingCreated, booking, recipient);
        Ok(())
    }

    async fn send_booking_updated(
        &self,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        self.emit(EmailKind::BookingUpdated, booking, recipient);
        Ok(())
    }
}
