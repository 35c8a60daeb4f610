//! Status command - corpus and index statistics

use anyhow::Result;
use colored::Colorize;

use qabase::Settings;

use super::build_context;

pub fn run(settings: &Settings, json: bool) -> Result<()> {
    let db_path = &settings.db_path;

    if !db_path.exists() {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "exists": false,
                    "error": "Corpus not found"
                })
            );
        } else {
            println!(
                "{} Corpus not found. Run {} first.",
                "!".yellow().bold(),
                "qabase ingest <path>".cyan()
            );
        }
        return Ok(());
    }

    let ctx = build_context(settings)?;
    let stats = ctx.store().stats()?;
    let file_size = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "exists": true,
                "record_count": stats.record_count,
                "embedding_count": stats.embedding_count,
                "question_count": ctx.index().len(),
                "last_ingested": stats.last_ingested,
                "exact_match": settings.exact_match,
                "file_size_bytes": file_size,
            })
        );
        return Ok(());
    }

    println!("{}", "Corpus Status".bold());
    println!();
    println!(
        "  {} {} records",
        "→".dimmed(),
        stats.record_count.to_string().cyan()
    );
    println!(
        "  {} {} embeddings",
        "→".dimmed(),
        stats.embedding_count.to_string().cyan()
    );
    println!(
        "  {} {} distinct questions indexed",
        "→".dimmed(),
        ctx.index().len().to_string().cyan()
    );
    println!(
        "  {} Exact match: {}",
        "→".dimmed(),
        if settings.exact_match { "on".green() } else { "off".dimmed() }
    );
    println!("  {} Size: {:.2} KB", "→".dimmed(), file_size as f64 / 1024.0);
    if let Some(ts) = stats.last_ingested {
        let dt = chrono::DateTime::from_timestamp(ts, 0)
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        println!("  {} Last ingested: {}", "→".dimmed(), dt);
    }

    Ok(())
}
