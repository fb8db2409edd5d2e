//! Config command - manage configuration

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use quotebox_cli::config::{Config, CONFIG_KEYS};
use quotebox_cli::storage::db::default_db_path;

#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox config                          Show configuration\n    \
    quotebox config get remote               Print one value\n    \
    quotebox config set remote http          Use the HTTP remote\n    \
    quotebox config set sync_interval_secs 60")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(),
        Some(ConfigCommand::Get { key }) => get_config(&key),
        Some(ConfigCommand::Set { key, value }) => set_config(&key, &value),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Quotebox Configuration".bold());
    println!();
    println!("  {}  {}", "Config:".dimmed(), Config::config_path()?.display());
    println!("  {}  {}", "Database:".dimmed(), default_db_path()?.display());
    println!();

    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("  {:<22} {}", key.cyan(), value);
        }
    }

    Ok(())
}

fn get_config(key: &str) -> Result<()> {
    let config = Config::load()?;
    match config.get(key) {
        Some(value) => println!("{value}"),
        None => anyhow::bail!(
            "Unknown config key '{key}'. Valid keys: {}",
            CONFIG_KEYS.join(", ")
        ),
    }
    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    println!("{} {} = {}", "Set".green(), key.cyan(), value);
    Ok(())
}
