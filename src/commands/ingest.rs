//! Ingest command - load records into the corpus store

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use qabase::core::import::load_records;
use qabase::Settings;

use super::open_store;

pub fn run(settings: &Settings, path: &Path, rebuild: bool, json: bool) -> Result<()> {
    let db_path = &settings.db_path;

    let records = load_records(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if rebuild && db_path.exists() {
        std::fs::remove_file(db_path)?;
        if !json {
            println!("{} Removed existing corpus", "→".dimmed());
        }
    }

    let store = open_store(settings)?;

    if !json {
        println!(
            "{} Ingesting {} records from {}...",
            "→".dimmed(),
            records.len(),
            path.display()
        );
    }

    let stats = store.ingest(&records)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ingested": stats.ingested,
                "skipped": stats.skipped,
                "failed": stats.failed,
                "duration_ms": stats.duration_ms,
                "db_path": db_path.display().to_string(),
            })
        );
    } else {
        println!();
        println!(
            "{} Ingested {} records in {:.2}s",
            "✓".green().bold(),
            stats.ingested.to_string().cyan(),
            stats.duration_ms as f64 / 1000.0
        );
        if stats.skipped > 0 {
            println!("  {} {} records skipped (empty)", "→".dimmed(), stats.skipped);
        }
        if stats.failed > 0 {
            println!("  {} {} records failed", "✗".red(), stats.failed);
        }
        println!("  {} Corpus saved to: {}", "→".dimmed(), db_path.display());
    }

    Ok(())
}
