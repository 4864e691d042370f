//! Reservation aggregate
//!
//! Contains the Reservation entity, its input/validation rules, the stay
//! range overlap test and the repository interface.

pub mod model;
pub mod repository;

pub use model::{
    NewReservation, Reservation, ReservationFilter, ReservationInput, ReservationStatus,
    ReservationWithRooms, StayRange,
};
pub use repository::ReservationRepository;
