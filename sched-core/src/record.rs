//! Backend payload types and their mapping into `InterviewEvent`.
//!
//! The backend returns a JSON array of records shaped like:
//!
//! ```json
//! {
//!   "id": 1,
//!   "summary": "1st Round",
//!   "start": "2024-08-29T18:00:00+05:30",
//!   "end": "2024-08-29T18:40:00+05:30",
//!   "user_det": { "handled_by": { "firstName": "Vinodhini", "lastName": "HR" } },
//!   "job_id": { "jobRequest_Title": "django developer" },
//!   "created_by": null,
//!   "link": "https://meet.google.com/..."
//! }
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{EventId, InterviewEvent};

/// Shown when a record has no creator.
pub const CREATED_BY_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerRecord {
    #[serde(default)]
    pub id: Option<EventId>,
    #[serde(default)]
    pub summary: String,
    pub start: String,
    pub end: String,
    pub user_det: UserDetails,
    pub job_id: JobDetails,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDetails {
    pub handled_by: Interviewer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interviewer {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobDetails {
    #[serde(rename = "jobRequest_Title")]
    pub job_request_title: String,
}

impl ServerRecord {
    /// Map into the local event shape.
    pub fn into_event(self) -> ScheduleResult<InterviewEvent> {
        let start = parse_server_timestamp(&self.start)?;
        let end = parse_server_timestamp(&self.end)?;
        let interviewer = &self.user_det.handled_by;

        Ok(InterviewEvent {
            id: self.id,
            title: self.summary,
            start,
            end,
            description: format!(
                "Interviewer: {} {}",
                interviewer.first_name, interviewer.last_name
            ),
            position: self.job_id.job_request_title,
            created_by: self
                .created_by
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| CREATED_BY_PLACEHOLDER.to_string()),
            meeting_link: Some(self.link.unwrap_or_default()),
            attachments: self.attachments.unwrap_or_default(),
        })
    }
}

/// Parse a backend JSON array into events.
/// A single bad record fails the whole batch.
pub fn parse_records(json: &str) -> ScheduleResult<Vec<InterviewEvent>> {
    let records: Vec<ServerRecord> =
        serde_json::from_str(json).map_err(|e| ScheduleError::Payload(e.to_string()))?;

    records.into_iter().map(ServerRecord::into_event).collect()
}

/// Parse a backend timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (converted to local time), naive ISO date-times
/// (read as local) and bare dates (local midnight).
pub fn parse_server_timestamp(value: &str) -> ScheduleResult<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ScheduleError::InvalidTimestamp {
            value: value.to_string(),
            expected: "an ISO 8601 date or date-time",
        })
}
