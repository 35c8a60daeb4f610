pub mod ask;
pub mod config;
pub mod evaluate;
pub mod ingest;
pub mod status;

use anyhow::{bail, Context, Result};

use qabase::{AgentContext, Settings, SqliteCorpusStore};

/// Open the corpus database, creating its directory if needed
pub fn open_store(settings: &Settings) -> Result<SqliteCorpusStore> {
    if let Some(parent) = settings.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteCorpusStore::open(&settings.db_path)
        .with_context(|| format!("Failed to open corpus at {}", settings.db_path.display()))
}

/// Open an already ingested corpus and build the answer index from it.
/// A missing database is an error rather than a fresh empty corpus.
pub fn build_context(settings: &Settings) -> Result<AgentContext<SqliteCorpusStore>> {
    if !settings.db_path.exists() {
        bail!(
            "Corpus not found at {}. Run `qabase ingest <path>` first.",
            settings.db_path.display()
        );
    }
    let store = open_store(settings)?;
    AgentContext::build(store, settings.resolver_settings()).context("Failed to build answer index")
}
