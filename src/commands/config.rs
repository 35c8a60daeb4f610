//! Config command - print the effective settings and where they come from

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use qabase::config::DEFAULT_CONFIG_FILE;
use qabase::Settings;

pub fn run(settings: &Settings, config_path: Option<&Path>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    println!("{}", "qabase Configuration".bold());
    println!();
    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: {}", "Found".green());
    } else {
        println!("Status: {}", "Not found (using defaults)".dimmed());
    }
    println!();

    let unset = || "(not set)".dimmed().to_string();

    println!("Current settings:");
    println!("  db_path: {}", settings.db_path.display());
    println!("  exact_match: {}", settings.exact_match);
    println!("  not_found_message: {}", settings.not_found_message);
    println!("  api_url: {}", settings.api_url);
    println!(
        "  username: {}",
        settings.username.clone().unwrap_or_else(unset)
    );
    println!(
        "  space_id: {}",
        settings.space_id.clone().unwrap_or_else(unset)
    );
    println!("  log_level: {}", settings.log_level);

    println!();
    println!("Environment variables:");
    for var in [
        "QABASE_DB_PATH",
        "QABASE_EXACT_MATCH",
        "QABASE_NOT_FOUND_MESSAGE",
        "QABASE_API_URL",
        "QABASE_USERNAME",
        "QABASE_SPACE_ID (or SPACE_ID)",
        "QABASE_LOG_LEVEL",
    ] {
        println!("  {}", var);
    }

    Ok(())
}
