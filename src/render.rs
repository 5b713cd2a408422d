//! Terminal rendering for sched types.
//!
//! Extension traits and helpers that turn sched-core state into colored
//! text using owo_colors.

use std::collections::HashMap;

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use sched_core::detail::{format_time, EventDetail};
use sched_core::load_state::LoadState;
use sched_core::state::{OpenDetail, SchedulerState};
use sched_core::view::{CalendarView, DayCell, ViewMode, VisibleEvent};

use crate::utils::tui::{pad, truncate};

/// Width of one month-grid column.
const CELL_WIDTH: usize = 14;

/// Event lines per month-grid cell before collapsing into "+N more".
const EVENTS_PER_CELL: usize = 2;

/// Extension trait for colored terminal output of sched-core types.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for LoadState {
    fn render(&self) -> String {
        match self {
            LoadState::Loading | LoadState::Loaded { .. } => self.to_string().dimmed().to_string(),
            LoadState::Failed { .. } => self.to_string().red().to_string(),
        }
    }
}

impl Render for EventDetail {
    fn render(&self) -> String {
        let mut lines = vec![self.heading.bold().to_string()];

        lines.push(format!("  {} {}", "Title:".dimmed(), self.title));
        lines.push(format!("  {} {}", "Position:".dimmed(), self.position));
        lines.push(format!("  {} {}", "Created By:".dimmed(), self.created_by));
        lines.push(format!("  {} {}", "Interview Date:".dimmed(), self.date));
        lines.push(format!("  {} {}", "Interview Time:".dimmed(), self.time_range));

        if let Some(link) = &self.join_link {
            lines.push(format!("  {} {}", "JOIN MEETING".green().bold(), link.underline()));
        }

        lines.join("\n")
    }
}

impl Render for OpenDetail {
    fn render(&self) -> String {
        let mut out = self.detail().render();

        let downloads: Vec<String> = self
            .downloads()
            .map(|link| {
                let href = link
                    .href()
                    .map(|url| url.to_string())
                    .unwrap_or_else(|| link.staged_path().display().to_string());
                format!(
                    "  {} {}  {} {}",
                    format!("{}:", capitalize(link.kind.label())).dimmed(),
                    link.file_name,
                    "⬇ Download".cyan(),
                    href.dimmed()
                )
            })
            .collect();

        if !downloads.is_empty() {
            out.push('\n');
            out.push_str(&downloads.join("\n"));
        }

        out
    }
}

/// Render the calendar screen: toolbar, load status, and the current view.
///
/// Visible events are numbered from 1 in start order; those numbers are what
/// `sched event <N>` and the session's event picker refer to.
pub fn render_calendar(state: &SchedulerState, today: NaiveDate) -> String {
    let view = state.view();
    let mut lines = vec![format!(
        "{}  {}",
        view.label().bold(),
        format!("({} view)", view.mode).dimmed()
    )];

    if !matches!(state.load_state(), LoadState::Loaded { .. }) {
        lines.push(state.load_state().render());
    }
    lines.push(String::new());

    let events = state.events();
    let numbers = numbering(&view.visible_events(events));
    let cells = view.day_cells(events);

    match view.mode {
        ViewMode::Month => {
            lines.extend(render_month_grid(&cells, &numbers, today));
            lines.push(String::new());
            lines.extend(render_event_list(view, events, &numbers));
        }
        ViewMode::Week | ViewMode::Day => {
            lines.extend(render_agenda(&cells, &numbers, today));
        }
    }

    lines.join("\n")
}

/// Map event list positions to their 1-based display numbers.
fn numbering(visible: &[VisibleEvent<'_>]) -> HashMap<usize, usize> {
    visible
        .iter()
        .enumerate()
        .map(|(n, v)| (v.index, n + 1))
        .collect()
}

fn render_month_grid(
    cells: &[DayCell<'_>],
    numbers: &HashMap<usize, usize>,
    today: NaiveDate,
) -> Vec<String> {
    let mut lines = Vec::new();

    let header: String = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        .iter()
        .map(|d| pad(d, CELL_WIDTH))
        .collect();
    lines.push(header.trim_end().dimmed().to_string());

    for week in cells.chunks(7) {
        let day_row: String = week
            .iter()
            .map(|cell| {
                let text = pad(&cell.date.format("%e").to_string(), CELL_WIDTH);
                if cell.date == today {
                    text.bold().underline().to_string()
                } else if !cell.in_period {
                    text.dimmed().to_string()
                } else {
                    text
                }
            })
            .collect();
        lines.push(day_row.trim_end().to_string());

        let busiest = week.iter().map(|c| c.events.len()).max().unwrap_or(0);
        for slot in 0..busiest.min(EVENTS_PER_CELL) {
            let row: String = week
                .iter()
                .map(|cell| pad(&cell_line(cell, slot, numbers), CELL_WIDTH))
                .collect();
            lines.push(row.trim_end().to_string());
        }
    }

    lines
}

/// Text for one event slot of a month cell.
fn cell_line(cell: &DayCell<'_>, slot: usize, numbers: &HashMap<usize, usize>) -> String {
    let overflow = cell.events.len() > EVENTS_PER_CELL;
    if overflow && slot == EVENTS_PER_CELL - 1 {
        return format!("+{} more", cell.events.len() - slot);
    }

    match cell.events.get(slot) {
        Some(v) => {
            let number = numbers.get(&v.index).copied().unwrap_or_default();
            truncate(&format!("{} {}", number, v.event.title), CELL_WIDTH - 1)
        }
        None => String::new(),
    }
}

fn render_event_list(
    view: &CalendarView,
    events: &[sched_core::InterviewEvent],
    numbers: &HashMap<usize, usize>,
) -> Vec<String> {
    let visible = view.visible_events(events);
    if visible.is_empty() {
        return vec!["No events".dimmed().to_string()];
    }

    visible
        .iter()
        .map(|v| {
            let number = numbers.get(&v.index).copied().unwrap_or_default();
            format!(
                "{} {} {}  {}",
                format!("{:>3}", number).cyan(),
                v.event.start.format("%d %b").to_string().dimmed(),
                format!("{:>8}", format_time(v.event.start)),
                event_line(v)
            )
        })
        .collect()
}

fn render_agenda(
    cells: &[DayCell<'_>],
    numbers: &HashMap<usize, usize>,
    today: NaiveDate,
) -> Vec<String> {
    let busy: Vec<_> = cells.iter().filter(|c| !c.events.is_empty()).collect();
    if busy.is_empty() {
        return vec!["No events".dimmed().to_string()];
    }

    let mut lines = Vec::new();
    for (i, cell) in busy.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_date_label(cell.date, today).bold().to_string());

        for v in &cell.events {
            let number = numbers.get(&v.index).copied().unwrap_or_default();
            let times = format!("{} - {}", format_time(v.event.start), format_time(v.event.end));
            lines.push(format!(
                "{} {}  {}",
                format!("{:>3}", number).cyan(),
                times,
                event_line(v)
            ));
        }
    }
    lines
}

fn event_line(v: &VisibleEvent<'_>) -> String {
    let mut line = v.event.title.clone();
    if !v.event.position.is_empty() {
        line.push_str(&format!(" {}", format!("[{}]", v.event.position).dimmed()));
    }
    if v.event.is_local() {
        line.push_str(&format!(" {}", "(local)".yellow()));
    }
    line
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
