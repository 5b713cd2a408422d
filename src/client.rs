//! Fetch adapter for the interview events endpoint.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use sched_core::config::SchedConfig;
use sched_core::record::parse_records;
use sched_core::state::SchedulerState;
use sched_core::InterviewEvent;
use url::Url;

/// Fixed path of the events feed, relative to the configured base URL.
pub const EVENTS_PATH: &str = "/calendarfromtoenddate.json";

/// Where the event list comes from.
#[derive(Debug, Clone)]
pub enum EventSource {
    Http(Url),
    /// A saved copy of the endpoint's JSON
    File(PathBuf),
}

impl EventSource {
    pub fn from_config(config: &SchedConfig, file: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = file {
            return Ok(EventSource::File(path));
        }

        let raw = format!("{}{}", config.base_url.trim_end_matches('/'), EVENTS_PATH);
        let url = Url::parse(&raw).with_context(|| format!("Invalid base_url '{}'", config.base_url))?;
        Ok(EventSource::Http(url))
    }

    pub fn describe(&self) -> String {
        match self {
            EventSource::Http(url) => url.to_string(),
            EventSource::File(path) => path.display().to_string(),
        }
    }
}

pub struct Loader {
    http: reqwest::Client,
    source: EventSource,
}

impl Loader {
    pub fn new(source: EventSource, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, source })
    }

    pub fn source(&self) -> &EventSource {
        &self.source
    }

    /// GET the events feed and map every record.
    pub async fn fetch(&self) -> Result<Vec<InterviewEvent>> {
        let body = match &self.source {
            EventSource::Http(url) => {
                tracing::debug!(%url, "fetching events");
                let resp = self
                    .http
                    .get(url.clone())
                    .send()
                    .await
                    .context("Failed to connect to events endpoint")?;

                if !resp.status().is_success() {
                    anyhow::bail!("Events endpoint returned {}", resp.status());
                }

                resp.text().await.context("Failed to read events response")?
            }
            EventSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        };

        let events = parse_records(&body)?;
        tracing::info!(count = events.len(), source = %self.source.describe(), "loaded events");
        Ok(events)
    }

    /// Fetch once and record the outcome in `state`. Failures end up in the
    /// load state and the log, never in the caller.
    pub async fn load_into(&self, state: &mut SchedulerState) {
        let result = self.fetch().await.map_err(|e| format!("{:#}", e));
        state.finish_load(result);
    }
}
