//! # fw-common
//!
//! Configuration and error types shared by the firmware rewrite server.

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
