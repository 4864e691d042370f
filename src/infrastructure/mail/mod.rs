//! Booking email delivery
//!
//! `SmtpNotificationGateway` sends over SMTP; `LogNotificationGateway`
//! writes the rendered message to the log when mail is disabled.

pub mod log;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use crate::application::ports::NotificationGateway;
use crate::config::MailConfig;

pub use self::log::LogNotificationGateway;
pub use self::smtp::SmtpNotificationGateway;
pub use self::templates::{render, BookingEmail, EmailKind};

/// Pick the gateway selected by `mail.enabled`.
pub fn gateway_from_config(mail: &MailConfig) -> Arc<dyn NotificationGateway> {
    if mail.enabled {
        Arc::new(SmtpNotificationGateway::new(mail.clone()))
    } else {
        Arc::new(LogNotificationGateway::new())
    }
}
