use std::time::Duration;

use tracing::debug;

use crate::cli::{ProjectArgs, WatchArgs};
use crate::config::Config;
use crate::error::{MonitorError, Result};
use crate::monitor::{self, Settings};
use crate::output;
use crate::source::BuildSource;

fn resolve(config: &Config, args: ProjectArgs) -> Result<Settings> {
    let settings = config.settings(args.projects)?;
    if settings.projects.is_empty() {
        return Err(MonitorError::NoProjects);
    }
    Ok(settings)
}

pub async fn show(source: &dyn BuildSource, config: &Config, args: ProjectArgs) -> Result<()> {
    let settings = resolve(config, args)?;

    let statuses = monitor::get_latest(source, &settings).await;

    output::print_statuses(&statuses)
}

/// Poll until the process is stopped. Each tick runs one full poll; a slow
/// poll delays the next tick rather than overlapping it.
pub async fn watch(source: &dyn BuildSource, config: &Config, args: WatchArgs) -> Result<()> {
    let settings = resolve(config, args.projects)?;
    let secs = args.interval.unwrap_or_else(|| config.interval_secs()).max(1);

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        debug!(projects = settings.projects.len(), "polling");

        let statuses = monitor::get_latest(source, &settings).await;

        output::print_refresh_header();
        output::print_statuses(&statuses)?;
    }
}
