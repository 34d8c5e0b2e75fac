//! Shared types for the chit admin workspace
//!
//! Domain models, form validation, message templates, formatting helpers and
//! the unified error/response types used by chit-server and its clients.

pub mod error;
pub mod models;
pub mod template;
pub mod util;
pub mod validation;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
