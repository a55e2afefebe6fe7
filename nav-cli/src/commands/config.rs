//! Print the effective configuration.

use anyhow::{Context, Result};
use hashnav::HistoryConfig;

/// Run the config command.
pub fn run(config: &HistoryConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
