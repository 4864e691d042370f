//! Application layer: use-case orchestration over the domain

pub mod identity;
pub mod ports;
pub mod reservations;

pub use identity::{AuthResult, UserService};
pub use ports::{NotificationError, NotificationGateway};
pub use reservations::{EditForm, ReservationService, PAGE_SIZE};
