//! Controlled form for creating a local event.

use chrono::NaiveDateTime;

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::InterviewEvent;

/// Formats accepted for `start`/`end`, the shape of a datetime-local input.
const DATETIME_LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Start,
    End,
    Description,
    Position,
    CreatedBy,
    MeetingLink,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Start => "Start",
            FormField::End => "End",
            FormField::Description => "Description",
            FormField::Position => "Position",
            FormField::CreatedBy => "Created by",
            FormField::MeetingLink => "Meeting link",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, FormField::Title | FormField::Start | FormField::End)
    }
}

/// Raw input values, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEventForm {
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub position: String,
    pub created_by: String,
    pub meeting_link: String,
}

impl NewEventForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Start => self.start = value,
            FormField::End => self.end = value,
            FormField::Description => self.description = value,
            FormField::Position => self.position = value,
            FormField::CreatedBy => self.created_by = value,
            FormField::MeetingLink => self.meeting_link = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Start => &self.start,
            FormField::End => &self.end,
            FormField::Description => &self.description,
            FormField::Position => &self.position,
            FormField::CreatedBy => &self.created_by,
            FormField::MeetingLink => &self.meeting_link,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == NewEventForm::default()
    }

    /// Build the event described by the current inputs.
    ///
    /// Only presence of the required fields and the datetime format are
    /// checked. An end before the start is accepted.
    pub fn build(&self) -> ScheduleResult<InterviewEvent> {
        for field in [FormField::Title, FormField::Start, FormField::End] {
            if self.get(field).trim().is_empty() {
                return Err(ScheduleError::MissingField(field.label()));
            }
        }

        let start = parse_datetime_local(&self.start)?;
        let end = parse_datetime_local(&self.end)?;

        let mut event = InterviewEvent::new(self.title.clone(), start, end);
        event.description = self.description.clone();
        event.position = self.position.clone();
        event.created_by = self.created_by.clone();
        event.meeting_link = Some(self.meeting_link.clone());
        Ok(event)
    }

    /// Build the event and clear every input.
    /// On error the inputs are left untouched.
    pub fn submit(&mut self) -> ScheduleResult<InterviewEvent> {
        let event = self.build()?;
        *self = NewEventForm::default();
        Ok(event)
    }
}

/// Parse a `YYYY-MM-DDTHH:MM` value (seconds optional).
pub fn parse_datetime_local(value: &str) -> ScheduleResult<NaiveDateTime> {
    let value = value.trim();
    DATETIME_LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| ScheduleError::InvalidTimestamp {
            value: value.to_string(),
            expected: "YYYY-MM-DDTHH:MM",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn filled() -> NewEventForm {
        let mut form = NewEventForm::default();
        form.set(FormField::Title, "Sync");
        form.set(FormField::Start, "2024-01-01T10:00");
        form.set(FormField::End, "2024-01-01T11:00");
        form
    }

    #[test]
    fn submit_builds_event_and_clears_inputs() {
        let mut form = filled();
        form.set(FormField::Position, "Backend Engineer");

        let event = form.submit().unwrap();

        assert_eq!(event.title, "Sync");
        assert_eq!(
            event.start,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(
            event.end,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap()
        );
        assert_eq!(event.position, "Backend Engineer");
        assert!(event.is_local());
        assert_eq!(event.join_link(), None);
        assert!(form.is_empty());
    }

    #[test]
    fn missing_required_field_keeps_inputs() {
        let mut form = filled();
        form.set(FormField::End, "  ");

        let err = form.submit().unwrap_err();
        assert!(matches!(err, ScheduleError::MissingField("End")));
        assert_eq!(form.title, "Sync");
    }

    #[test]
    fn unparseable_datetime_is_rejected() {
        let mut form = filled();
        form.set(FormField::Start, "tomorrow at ten");
        assert!(matches!(
            form.submit(),
            Err(ScheduleError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn end_before_start_is_accepted() {
        let mut form = filled();
        form.set(FormField::End, "2024-01-01T09:00");
        let event = form.submit().unwrap();
        assert!(event.end < event.start);
    }

    #[test]
    fn seconds_are_optional() {
        assert!(parse_datetime_local("2024-01-01T10:00:30").is_ok());
        assert!(parse_datetime_local("2024-01-01 10:00").is_err());
    }
}
