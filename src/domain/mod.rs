//! Domain layer: entities, invariants and repository interfaces

pub mod actor;
pub mod policy;
pub mod reservation;
pub mod room;
pub mod user;

pub use actor::{Actor, Role};
pub use policy::{AccessPolicy, Operation, RolePolicy};
pub use reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationInput, ReservationRepository,
    ReservationStatus, ReservationWithRooms, StayRange,
};
pub use room::{Room, RoomRepository};
pub use user::{NewUser, User, UserRepository};

pub use crate::support::errors::{DomainError, DomainResult, FieldErrors};
