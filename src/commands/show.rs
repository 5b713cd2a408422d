use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use sched_core::view::ViewMode;

use super::SessionContext;
use crate::render::render_calendar;

pub async fn run(
    view: Option<ViewMode>,
    date: Option<NaiveDate>,
    file: Option<PathBuf>,
) -> Result<()> {
    let ctx = SessionContext::load(file, view, date).await?;

    println!("{}", render_calendar(&ctx.state, ctx.today));

    Ok(())
}
