pub mod config;
pub mod event;
pub mod session;
pub mod show;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use sched_core::config::SchedConfig;
use sched_core::state::SchedulerState;
use sched_core::view::{Navigate, ViewMode};

use crate::client::{EventSource, Loader};
use crate::utils::tui::create_spinner;

/// Common context for every command: config, today's date and the loaded state.
pub struct SessionContext {
    pub config: SchedConfig,
    pub today: NaiveDate,
    pub state: SchedulerState,
}

impl SessionContext {
    /// Load config, then fetch events once. A failed fetch is recorded in the
    /// state rather than returned.
    pub async fn load(
        file: Option<PathBuf>,
        view: Option<ViewMode>,
        date: Option<NaiveDate>,
    ) -> Result<Self> {
        let config = SchedConfig::load()?;
        let today = Local::now().date_naive();

        let mut state = SchedulerState::new(view.unwrap_or(config.default_view), today);
        if let Some(date) = date {
            state.navigate(Navigate::Date(date), today);
        }

        let source = EventSource::from_config(&config, file)?;
        let loader = Loader::new(source, Duration::from_secs(config.timeout_secs))?;

        let spinner = create_spinner(format!("Loading events from {}", loader.source().describe()));
        loader.load_into(&mut state).await;
        spinner.finish_and_clear();

        Ok(SessionContext {
            config,
            today,
            state,
        })
    }
}

/// Resolve the N-th visible event (1-based, as numbered on screen) to its list position.
pub fn visible_event_index(state: &SchedulerState, number: usize) -> Result<usize> {
    let visible = state.view().visible_events(state.events());

    number
        .checked_sub(1)
        .and_then(|i| visible.get(i))
        .map(|v| v.index)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No event #{} in this view ({} visible)",
                number,
                visible.len()
            )
        })
}

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
