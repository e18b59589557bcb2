//! Configuration commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show where the global configuration file lives
    Path,
}

pub fn run(cmd: ConfigCommands, output: &Output, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output, config),
        ConfigCommands::Path => path(output),
    }
}

fn show(output: &Output, config: &Config) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "source": config.source.as_ref().map(|p| p.display().to_string()),
            "settings": config.settings,
        }))?;
        return Ok(());
    }

    match &config.source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# Defaults (no configuration file found)"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

fn path(output: &Output) -> Result<()> {
    let path = Config::global_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.is_file(),
        }))?;
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
