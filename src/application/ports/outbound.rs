//! Outbound ports: booking notifications
//!
//! [`NotificationGateway`] decouples the reservation service from the mail
//! transport. Production implementations live in
//! [`infrastructure::mail`](crate::infrastructure::mail).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ReservationWithRooms;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Dispatches booking emails.
///
/// Callers treat every error as non-fatal: the reservation is already
/// committed by the time a notification is sent.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_booking_created(
        &self,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) -> Result<(), NotificationError>;

    async fn send_booking_updated(
        &self,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) -> Result<(), NotificationError>;
}
