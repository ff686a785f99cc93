//! # finboard-core
//!
//! Shared foundations for the Finboard notification client:
//!
//! - Unified [`error::AppError`] type used across all crates
//! - [`result::AppResult`] alias
//! - Configuration schemas loaded from TOML + environment variables

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
