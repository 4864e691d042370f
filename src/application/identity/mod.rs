//! Identity module: login and the current-user lookup

pub mod service;

pub use service::{AuthResult, UserService};
