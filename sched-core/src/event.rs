//! Interview event model.
//!
//! Events come from two places: the backend (see `record`) and the
//! new-event form (see `form`). Both land in the same list with the same
//! shape; only server events carry an id.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Opaque event identifier as sent by the backend (string or number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{}", n),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

/// A scheduled interview, in local wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewEvent {
    /// None for events created locally through the form
    pub id: Option<EventId>,
    pub title: String,
    pub start: NaiveDateTime,
    /// Not checked against `start`
    pub end: NaiveDateTime,
    pub description: String,
    pub position: String,
    pub created_by: String,
    pub meeting_link: Option<String>,
    /// Stored as received, never interpreted
    pub attachments: Vec<serde_json::Value>,
}

impl InterviewEvent {
    /// Event with only the required fields set.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        InterviewEvent {
            id: None,
            title: title.into(),
            start,
            end,
            description: String::new(),
            position: String::new(),
            created_by: String::new(),
            meeting_link: None,
            attachments: Vec::new(),
        }
    }

    /// True for events that only exist in this session.
    pub fn is_local(&self) -> bool {
        self.id.is_none()
    }

    /// The meeting link, if there is one worth showing.
    /// Blank or whitespace-only links count as absent.
    pub fn join_link(&self) -> Option<&str> {
        self.meeting_link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
    }

    /// End of the occupied span. An end before the start collapses to the start.
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end.max(self.start)
    }

    /// Whether the event touches the half-open interval `[from, to)`.
    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        let end = self.effective_end();
        if end == self.start {
            return self.start >= from && self.start < to;
        }
        self.start < to && end > from
    }
}

impl fmt::Display for InterviewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
