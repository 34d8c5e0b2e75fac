//! Data models
//!
//! Shared between chit-server and its API clients.
//! All IDs are fixture strings (e.g. `g1`, `m12`).

pub mod dashboard;
pub mod group;
pub mod member;
pub mod reminder;

// Re-exports
pub use dashboard::*;
pub use group::*;
pub use member::*;
pub use reminder::*;
