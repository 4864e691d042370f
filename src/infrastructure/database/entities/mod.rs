//! Database entities module

pub mod reservation;
pub mod reservation_room;
pub mod room;
pub mod user;

pub use reservation::Entity as Reservation;
pub use reservation_room::Entity as ReservationRoom;
pub use room::Entity as Room;
pub use user::Entity as User;
