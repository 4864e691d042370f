//! SMTP notification gateway using Lettre

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use super::templates::{render, EmailKind};
use crate::application::ports::{NotificationError, NotificationGateway};
use crate::config::MailConfig;
use crate::domain::ReservationWithRooms;

/// Sends booking emails through the configured SMTP relay.
///
/// A new transport is built per message; the blocking send runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct SmtpNotificationGateway {
    config: MailConfig,
}

impl SmtpNotificationGateway {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn build_transport(&self) -> Result<SmtpTransport, NotificationError> {
        let mut builder = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| NotificationError::Delivery(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_username, &self.config.smtp_password)
        {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(builder.build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.config.from_name, self.config.from_address)
    }

    fn build_message(
        &self,
        kind: EmailKind,
        booking: &ReservationWithRooms,
        to: &str,
    ) -> Result<Message, NotificationError> {
        let email = render(kind, booking);

        Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| NotificationError::Address(format!("from: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| NotificationError::Address(format!("{to}: {e}")))?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| NotificationError::Build(e.to_string()))
    }

    async fn send(
        &self,
        kind: EmailKind,
        booking: &ReservationWithRooms,
        to: &str,
    ) -> Result<(), NotificationError> {
        let message = self.build_message(kind, booking, to)?;
        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| NotificationError::Delivery(format!("Email task failed: {e}")))?
            .map_err(|e| NotificationError::Delivery(e.to_string()))?;

        debug!(to, reservation_id = booking.reservation.id, "Booking email sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for SmtpNotificationGateway {
    async fn send_booking_created(
        &self,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        self.send(EmailKind::BookingCreated, booking, recipient).await
    }

    async fn send_booking_updated(
        &self,
        booking: &ReservationWithRooms,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        self.send(EmailKind::BookingUpdated, booking, recipient).await
    }
}
