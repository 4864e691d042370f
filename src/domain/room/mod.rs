//! Room aggregate (read-only for this service)

pub mod model;
pub mod repository;

pub use model::Room;
pub use repository::RoomRepository;
