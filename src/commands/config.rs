use anyhow::Result;
use owo_colors::OwoColorize;
use sched_core::config::SchedConfig;

use crate::client::EventSource;

pub fn run() -> Result<()> {
    let config_path = SchedConfig::config_path()?;
    let config = SchedConfig::load()?;
    let source = EventSource::from_config(&config, None)?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Downloads:  {}", config.download_path().display());
    println!("  Events:     {}", source.describe());
    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
