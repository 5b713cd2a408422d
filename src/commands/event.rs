use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use sched_core::attachments::AttachmentKind;
use sched_core::view::ViewMode;

use super::{visible_event_index, SessionContext};
use crate::render::Render;

/// Options for `sched event`.
pub struct EventArgs {
    pub number: usize,
    pub view: Option<ViewMode>,
    pub date: Option<NaiveDate>,
    pub file: Option<PathBuf>,
    pub resume: Option<PathBuf>,
    pub aadhaar: Option<PathBuf>,
    pub save: bool,
    pub save_to: Option<PathBuf>,
    pub join: bool,
}

pub async fn run(args: EventArgs) -> Result<()> {
    let mut ctx = SessionContext::load(args.file, args.view, args.date).await?;

    if let Some(reason) = ctx.state.load_state().failure() {
        eprintln!("{}", format!("Could not load events: {}", reason).red());
    }

    let index = visible_event_index(&ctx.state, args.number)?;
    ctx.state.open_event(index)?;

    for (kind, path) in [
        (AttachmentKind::Resume, args.resume),
        (AttachmentKind::Aadhaar, args.aadhaar),
    ] {
        if let Some(path) = path {
            ctx.state
                .select_file(kind, &path)
                .with_context(|| format!("Could not attach {}", path.display()))?;
        }
    }

    let Some(open) = ctx.state.detail() else {
        anyhow::bail!("Event detail closed unexpectedly");
    };
    println!("{}", open.render());

    if args.save || args.save_to.is_some() {
        let dir = args.save_to.unwrap_or_else(|| ctx.config.download_path());
        let mut saved_any = false;
        for link in open.downloads() {
            let target = link.save_to(&dir)?;
            println!("{}", format!("  Saved: {}", target.display()).green());
            saved_any = true;
        }
        if !saved_any {
            println!("{}", "  Nothing to save: no files attached".dimmed());
        }
    }

    if args.join {
        match &open.detail().join_link {
            Some(link) => open::that(link).with_context(|| format!("Could not open {}", link))?,
            None => println!("{}", "  This interview has no meeting link".dimmed()),
        }
    }

    Ok(())
}
