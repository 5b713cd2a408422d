//! Calendar view mode, navigation and visible ranges.
//!
//! Weeks start on Sunday. Month view covers whole weeks, so it may include
//! trailing days of the previous month and leading days of the next one.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::event::InterviewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Month, ViewMode::Week, ViewMode::Day];
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
        })
    }
}

impl FromStr for ViewMode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            other => Err(ScheduleError::Config(format!(
                "Unknown view '{}'. Expected month, week or day",
                other
            ))),
        }
    }
}

/// Navigation requests coming from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    Prev,
    Next,
    Today,
    Date(NaiveDate),
}

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take_while(|d| *d <= self.last)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }

    /// Half-open instant bounds `[first 00:00, last+1 00:00)`.
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (start_of(self.first), start_of(self.last + Duration::days(1)))
    }
}

/// An event that falls in the visible range, with its position in the event list.
#[derive(Debug, Clone, Copy)]
pub struct VisibleEvent<'a> {
    pub index: usize,
    pub event: &'a InterviewEvent,
}

/// One day of the visible range.
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for the padding days of month view
    pub in_period: bool,
    pub events: Vec<VisibleEvent<'a>>,
}

/// Current view mode plus the date the view is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub mode: ViewMode,
    pub date: NaiveDate,
}

impl CalendarView {
    pub fn new(mode: ViewMode, date: NaiveDate) -> Self {
        CalendarView { mode, date }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn navigate(&mut self, nav: Navigate, today: NaiveDate) {
        self.date = match nav {
            Navigate::Today => today,
            Navigate::Date(date) => date,
            Navigate::Prev => self.step(false),
            Navigate::Next => self.step(true),
        };
    }

    fn step(&self, forward: bool) -> NaiveDate {
        let moved = match (self.mode, forward) {
            (ViewMode::Month, true) => self.date.checked_add_months(Months::new(1)),
            (ViewMode::Month, false) => self.date.checked_sub_months(Months::new(1)),
            (ViewMode::Week, true) => self.date.checked_add_signed(Duration::days(7)),
            (ViewMode::Week, false) => self.date.checked_sub_signed(Duration::days(7)),
            (ViewMode::Day, true) => self.date.succ_opt(),
            (ViewMode::Day, false) => self.date.pred_opt(),
        };
        moved.unwrap_or(self.date)
    }

    /// The period the view is about (calendar month, week, or day).
    pub fn period(&self) -> DateRange {
        match self.mode {
            ViewMode::Month => {
                let first = self.date.with_day(1).unwrap_or(self.date);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(first);
                DateRange { first, last }
            }
            ViewMode::Week => {
                let first = week_start(self.date);
                DateRange {
                    first,
                    last: first + Duration::days(6),
                }
            }
            ViewMode::Day => DateRange {
                first: self.date,
                last: self.date,
            },
        }
    }

    /// The days actually drawn. Month view is padded out to whole weeks.
    pub fn visible_range(&self) -> DateRange {
        let period = self.period();
        match self.mode {
            ViewMode::Month => DateRange {
                first: week_start(period.first),
                last: week_start(period.last) + Duration::days(6),
            },
            _ => period,
        }
    }

    /// Events overlapping the visible range, ordered by start then list position.
    pub fn visible_events<'a>(&self, events: &'a [InterviewEvent]) -> Vec<VisibleEvent<'a>> {
        let (from, to) = self.visible_range().bounds();
        let mut visible: Vec<_> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.overlaps(from, to))
            .map(|(index, event)| VisibleEvent { index, event })
            .collect();
        visible.sort_by_key(|v| (v.event.start, v.index));
        visible
    }

    /// Visible range split into days, each with its events.
    pub fn day_cells<'a>(&self, events: &'a [InterviewEvent]) -> Vec<DayCell<'a>> {
        let period = self.period();
        let visible = self.visible_events(events);

        self.visible_range()
            .days()
            .map(|date| {
                let (from, to) = (start_of(date), start_of(date + Duration::days(1)));
                DayCell {
                    date,
                    in_period: period.contains(date),
                    events: visible
                        .iter()
                        .filter(|v| v.event.overlaps(from, to))
                        .copied()
                        .collect(),
                }
            })
            .collect()
    }

    /// Toolbar label, e.g. "January 2024", "Dec 31 – Jan 06", "Monday Jan 01".
    pub fn label(&self) -> String {
        match self.mode {
            ViewMode::Month => self.date.format("%B %Y").to_string(),
            ViewMode::Week => {
                let range = self.period();
                format!(
                    "{} – {}",
                    range.first.format("%b %d"),
                    range.last.format("%b %d")
                )
            }
            ViewMode::Day => self.date.format("%A %b %d").to_string(),
        }
    }
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
