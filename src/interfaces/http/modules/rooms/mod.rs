//! Room listing

pub mod handlers;

pub use handlers::*;
