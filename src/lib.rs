//! # Hotel Reservations
//!
//! Room reservation service with double-booking prevention and booking
//! emails.
//!
//! ## Architecture
//!
//! - **domain**: entities, invariants, repository and policy traits
//! - **application**: reservation and identity services
//! - **infrastructure**: SeaORM persistence, JWT/bcrypt, SMTP mail
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: process lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::create_api_router;
