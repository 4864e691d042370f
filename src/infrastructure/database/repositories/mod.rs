//! Database repository implementations
//!
//! One SeaORM repository per aggregate.

pub mod reservation_repository;
pub mod room_repository;
pub mod user_repository;

pub use reservation_repository::SeaOrmReservationRepository;
pub use room_repository::SeaOrmRoomRepository;
pub use user_repository::SeaOrmUserRepository;
