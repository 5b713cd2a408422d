//! Outcome of the start-up event fetch.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded {
        count: usize,
    },
    Failed {
        reason: String,
    },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loading => f.write_str("Loading events"),
            LoadState::Loaded { count: 1 } => f.write_str("Loaded 1 event"),
            LoadState::Loaded { count } => write!(f, "Loaded {} events", count),
            LoadState::Failed { reason } => write!(f, "Could not load events: {}", reason),
        }
    }
}
