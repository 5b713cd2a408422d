//! Read-only projection of a selected event for the detail view.

use chrono::NaiveDateTime;

use crate::event::InterviewEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetail {
    pub heading: String,
    pub title: String,
    pub position: String,
    pub created_by: String,
    /// e.g. "01 Jan 2024"
    pub date: String,
    /// e.g. "10:00 am - 11:00 am"
    pub time_range: String,
    pub join_link: Option<String>,
}

impl EventDetail {
    pub fn from_event(event: &InterviewEvent) -> Self {
        EventDetail {
            heading: format!("Interview With: {}", event.description),
            title: event.title.clone(),
            position: event.position.clone(),
            created_by: event.created_by.clone(),
            date: format_date(event.start),
            time_range: format!("{} - {}", format_time(event.start), format_time(event.end)),
            join_link: event.join_link().map(str::to_string),
        }
    }
}

pub fn format_date(dt: NaiveDateTime) -> String {
    dt.format("%d %b %Y").to_string()
}

/// 12-hour clock, zero-padded, lowercase meridiem.
pub fn format_time(dt: NaiveDateTime) -> String {
    dt.format("%I:%M %P").to_string()
}
