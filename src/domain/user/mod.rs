//! User aggregate
//!
//! Reservations are owned by users; the actor's email is the booking
//! notification recipient.

pub mod model;
pub mod repository;

pub use model::{NewUser, User};
pub use repository::UserRepository;
