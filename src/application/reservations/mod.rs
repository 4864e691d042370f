//! Reservation use-cases

pub mod service;

pub use service::{EditForm, ReservationService, PAGE_SIZE};
