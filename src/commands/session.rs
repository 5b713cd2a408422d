use std::path::PathBuf;

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;
use sched_core::attachments::AttachmentKind;
use sched_core::form::FormField;
use sched_core::state::Panel;
use sched_core::view::{Navigate, ViewMode};

use super::{parse_date, visible_event_index, SessionContext};
use crate::render::{render_calendar, Render};

const FORM_FIELDS: [FormField; 7] = [
    FormField::Title,
    FormField::Start,
    FormField::End,
    FormField::Description,
    FormField::Position,
    FormField::CreatedBy,
    FormField::MeetingLink,
];

enum CalendarAction {
    Prev,
    Next,
    Today,
    GoTo,
    SwitchView,
    NewSchedule,
    OpenEvent,
    Quit,
}

impl CalendarAction {
    const ALL: [CalendarAction; 8] = [
        CalendarAction::OpenEvent,
        CalendarAction::NewSchedule,
        CalendarAction::Prev,
        CalendarAction::Next,
        CalendarAction::Today,
        CalendarAction::GoTo,
        CalendarAction::SwitchView,
        CalendarAction::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            CalendarAction::Prev => "Back",
            CalendarAction::Next => "Next",
            CalendarAction::Today => "Today",
            CalendarAction::GoTo => "Go to date",
            CalendarAction::SwitchView => "Switch view",
            CalendarAction::NewSchedule => "+ New Schedule",
            CalendarAction::OpenEvent => "Open event",
            CalendarAction::Quit => "Quit",
        }
    }
}

enum DetailAction {
    JoinMeeting,
    Attach(AttachmentKind),
    SaveDownloads,
    Close,
}

impl DetailAction {
    fn label(&self) -> String {
        match self {
            DetailAction::JoinMeeting => "Join meeting".to_string(),
            DetailAction::Attach(AttachmentKind::Resume) => "Upload resume".to_string(),
            DetailAction::Attach(AttachmentKind::Aadhaar) => "Upload Aadhaar".to_string(),
            DetailAction::SaveDownloads => "Download files".to_string(),
            DetailAction::Close => "Close".to_string(),
        }
    }
}

pub async fn run(file: Option<PathBuf>, view: Option<ViewMode>) -> Result<()> {
    let mut ctx = SessionContext::load(file, view, None).await?;

    loop {
        let keep_going = match ctx.state.panel() {
            Panel::Calendar => calendar_step(&mut ctx)?,
            Panel::Form(_) => {
                form_step(&mut ctx)?;
                true
            }
            Panel::Detail(_) => {
                detail_step(&mut ctx)?;
                true
            }
        };

        if !keep_going {
            return Ok(());
        }
    }
}

/// One round on the calendar screen. Returns false when the user quits.
fn calendar_step(ctx: &mut SessionContext) -> Result<bool> {
    println!();
    println!("{}", render_calendar(&ctx.state, ctx.today));
    println!();

    let labels: Vec<&str> = CalendarAction::ALL.iter().map(|a| a.label()).collect();
    let choice = Select::new().items(&labels).default(0).interact()?;

    match CalendarAction::ALL[choice] {
        CalendarAction::Prev => ctx.state.navigate(Navigate::Prev, ctx.today),
        CalendarAction::Next => ctx.state.navigate(Navigate::Next, ctx.today),
        CalendarAction::Today => ctx.state.navigate(Navigate::Today, ctx.today),
        CalendarAction::GoTo => {
            let input: String = Input::new()
                .with_prompt("  Date (YYYY-MM-DD)")
                .validate_with(|s: &String| parse_date(s).map(|_| ()))
                .interact_text()?;
            let date = parse_date(&input).map_err(|e| anyhow::anyhow!(e))?;
            ctx.state.navigate(Navigate::Date(date), ctx.today);
        }
        CalendarAction::SwitchView => {
            let labels: Vec<String> = ViewMode::ALL.iter().map(|m| m.to_string()).collect();
            let current = ViewMode::ALL
                .iter()
                .position(|m| *m == ctx.state.view().mode)
                .unwrap_or(0);
            let choice = Select::new()
                .with_prompt("  View")
                .items(&labels)
                .default(current)
                .interact()?;
            ctx.state.set_view(ViewMode::ALL[choice]);
        }
        CalendarAction::NewSchedule => {
            ctx.state.open_form();
        }
        CalendarAction::OpenEvent => {
            let visible = ctx.state.view().visible_events(ctx.state.events()).len();
            if visible == 0 {
                println!("{}", "  No events in this view".dimmed());
                return Ok(true);
            }
            let number: usize = Input::new()
                .with_prompt(format!("  Event number (1-{})", visible))
                .validate_with(move |n: &usize| {
                    if (1..=visible).contains(n) {
                        Ok(())
                    } else {
                        Err(format!("Pick a number between 1 and {}", visible))
                    }
                })
                .interact_text()?;
            let index = visible_event_index(&ctx.state, number)?;
            if let Err(e) = ctx.state.open_event(index) {
                eprintln!("  {}", e.to_string().red());
            }
        }
        CalendarAction::Quit => return Ok(false),
    }

    Ok(true)
}

/// Fill in the open form and submit it. Invalid input is reported and the
/// user can edit again or cancel.
fn form_step(ctx: &mut SessionContext) -> Result<()> {
    println!();
    println!("{}", "New schedule".bold());

    let Some(form) = ctx.state.form_mut() else {
        return Ok(());
    };

    for field in FORM_FIELDS {
        let prompt = if field.is_required() {
            format!("  {}", field.label())
        } else {
            format!("  {} (skip)", field.label())
        };
        let hint = match field {
            FormField::Start | FormField::End => " [YYYY-MM-DDTHH:MM]",
            _ => "",
        };
        let value: String = Input::new()
            .with_prompt(format!("{}{}", prompt, hint))
            .with_initial_text(form.get(field).to_string())
            .allow_empty(!field.is_required())
            .interact_text()?;
        form.set(field, value);
    }

    match ctx.state.submit_form() {
        Ok(index) => {
            let title = &ctx.state.events()[index].title;
            println!("{}", format!("  Created: {}", title).green());
        }
        Err(e) => {
            eprintln!("  {}", e.to_string().red());
            let again = Confirm::new()
                .with_prompt("  Edit again?")
                .default(true)
                .interact()?;
            if !again {
                ctx.state.cancel_form();
            }
        }
    }

    Ok(())
}

/// One round on the event detail.
fn detail_step(ctx: &mut SessionContext) -> Result<()> {
    let Some(open) = ctx.state.detail() else {
        return Ok(());
    };

    println!();
    println!("{}", open.render());
    println!();

    let mut actions = Vec::new();
    if open.detail().join_link.is_some() {
        actions.push(DetailAction::JoinMeeting);
    }
    actions.push(DetailAction::Attach(AttachmentKind::Resume));
    actions.push(DetailAction::Attach(AttachmentKind::Aadhaar));
    if open.downloads().next().is_some() {
        actions.push(DetailAction::SaveDownloads);
    }
    actions.push(DetailAction::Close);

    let labels: Vec<String> = actions.iter().map(DetailAction::label).collect();
    let choice = Select::new().items(&labels).default(0).interact()?;

    match &actions[choice] {
        DetailAction::JoinMeeting => {
            if let Some(link) = &open.detail().join_link {
                if let Err(e) = open::that(link) {
                    eprintln!("  {}", format!("Could not open {}: {}", link, e).red());
                }
            }
        }
        DetailAction::SaveDownloads => {
            let dir = ctx.config.download_path();
            for link in open.downloads() {
                match link.save_to(&dir) {
                    Ok(target) => println!("{}", format!("  Saved: {}", target.display()).green()),
                    Err(e) => eprintln!("  {}", e.to_string().red()),
                }
            }
        }
        DetailAction::Attach(kind) => {
            let kind = *kind;
            let prompt = format!(
                "  {} file ({})",
                kind.label(),
                kind.accepted_extensions().join(", ")
            );
            let input: String = Input::new().with_prompt(prompt).interact_text()?;
            let path = PathBuf::from(shellexpand::tilde(input.trim()).into_owned());
            if let Err(e) = ctx.state.select_file(kind, &path) {
                eprintln!("  {}", e.to_string().red());
            }
        }
        DetailAction::Close => ctx.state.close_detail(),
    }

    Ok(())
}
