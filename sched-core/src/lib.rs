//! Core types for the sched interview calendar.
//!
//! This crate holds everything that does not touch the network or the terminal:
//! - `event` and `record` for the interview event model and the backend payload
//! - `view` for month/week/day navigation and visible ranges
//! - `form` and `detail` for the new-event form and the event detail projection
//! - `attachments` for resume/Aadhaar selections and scoped download handles
//! - `state` for the single view-state record tying them together

pub mod attachments;
pub mod config;
pub mod detail;
pub mod error;
pub mod event;
pub mod form;
pub mod load_state;
pub mod record;
pub mod state;
pub mod view;

pub use error::{ScheduleError, ScheduleResult};
pub use event::{EventId, InterviewEvent};
