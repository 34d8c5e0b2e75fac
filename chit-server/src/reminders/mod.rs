//! Reminder workflow
//!
//! - [`selection`] - who gets the reminder
//! - [`delivery`] - message rendering and primary/alternate fallback
//! - [`dispatch`] - the sequential, cancellable send run
//! - [`session`] - per-admin Send Reminder state

pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod selection;
pub mod session;

pub use delivery::{DeliveryJob, render_message, template_vars};
pub use dispatch::{DeliveryStatus, DispatchRun, Dispatcher, RecipientState};
pub use error::ReminderError;
pub use selection::{SelectionState, apply_search, members_in_group, recipients};
pub use session::{DispatchOutcome, ReminderSession, ReminderView};
