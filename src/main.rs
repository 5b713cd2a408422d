mod client;
mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sched_core::view::ViewMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sched")]
#[command(about = "Browse interview schedules, create new ones and handle candidate files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calendar
    Show {
        /// Calendar view: month, week or day
        #[arg(short, long)]
        view: Option<ViewMode>,

        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = commands::parse_date)]
        date: Option<NaiveDate>,

        /// Read events from a saved JSON file instead of the server
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show the details of one interview
    Event {
        /// Event number as listed by `sched show`
        number: usize,

        #[arg(short, long)]
        view: Option<ViewMode>,

        #[arg(short, long, value_parser = commands::parse_date)]
        date: Option<NaiveDate>,

        #[arg(long)]
        file: Option<PathBuf>,

        /// Attach a resume (pdf, doc, docx)
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Attach an Aadhaar card (pdf, jpg, png)
        #[arg(long)]
        aadhaar: Option<PathBuf>,

        /// Save attached files to the download directory
        #[arg(long)]
        save: bool,

        /// Save attached files to this directory instead
        #[arg(long)]
        save_to: Option<PathBuf>,

        /// Open the meeting link in the browser
        #[arg(long)]
        join: bool,
    },
    /// Interactive calendar session
    Session {
        #[arg(short, long)]
        view: Option<ViewMode>,

        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show config path and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { view, date, file } => commands::show::run(view, date, file).await,
        Commands::Event {
            number,
            view,
            date,
            file,
            resume,
            aadhaar,
            save,
            save_to,
            join,
        } => {
            commands::event::run(commands::event::EventArgs {
                number,
                view,
                date,
                file,
                resume,
                aadhaar,
                save,
                save_to,
                join,
            })
            .await
        }
        Commands::Session { view, file } => commands::session::run(file, view).await,
        Commands::Config => commands::config::run(),
    }
}

/// Log to stderr so rendered output on stdout stays clean. `RUST_LOG` overrides.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
