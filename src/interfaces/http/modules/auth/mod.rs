//! Authentication module: login and profile

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
