//! # chit-sms
//!
//! SMS transport library - low-level sending capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to send:
//! - The [`SmsGateway`] seam every carrier adapter implements
//! - GSM-7 / UCS-2 detection and segment counting
//! - A simulated gateway for development and tests
//!
//! Business logic (WHAT to send, to WHICH number) stays in application code:
//! - Reminder rendering and primary/alternate fallback → chit-server
//!
//! ## Example
//!
//! ```ignore
//! use chit_sms::{SimulatedGateway, SmsGateway, SmsMessage};
//!
//! let gateway = SimulatedGateway::new().with_unreachable(["9000000000"]);
//! let receipt = gateway
//!     .send(&SmsMessage::new("9876543210", "CHITFD", "Dear Ravi, ..."))
//!     .await?;
//! ```

mod encoding;
mod error;
mod gateway;

// Re-exports
pub use encoding::{SmsEncoding, detect_encoding, segment_count};
pub use error::{SmsError, SmsResult};
pub use gateway::{DeliveryReceipt, SimulatedGateway, SmsGateway, SmsMessage};
