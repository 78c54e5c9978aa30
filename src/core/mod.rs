//! Core infrastructure: errors and configuration

pub mod config;
pub mod errors;

pub use config::Settings;
pub use errors::{ObjectError, ObjectResult};
