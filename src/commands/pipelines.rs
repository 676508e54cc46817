use crate::config::Config;
use crate::error::Result;
use crate::monitor;
use crate::output;
use crate::source::BuildSource;

pub async fn list(source: &dyn BuildSource, config: &Config) -> Result<()> {
    let settings = config.settings(Vec::new())?;

    let entries = monitor::get_all(source, &settings).await?;

    output::print_entries(&entries)
}
