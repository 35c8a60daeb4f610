//! Corpus store - combines embedding model and vector database

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::embedding::{Embedder, HarmonicEmbedder};
use super::vectordb::{StoreStats, VectorDB};
use crate::core::record::{Record, ScoredRecord};
use crate::error::{QaError, Result};

/// Storage of question/answer records with nearest-neighbor lookup.
///
/// The resolver only talks to the corpus through this trait.
pub trait CorpusStore {
    /// Every record, in the order it was ingested
    fn fetch_all_records(&self) -> Result<Vec<Record>>;

    /// Up to `top_k` records, most similar first
    fn similarity_search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredRecord>>;
}

/// Ingest statistics
#[derive(Debug, Default)]
pub struct IngestStats {
    pub ingested: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration_ms: u128,
}

/// SQLite-backed corpus store using HTP embeddings
pub struct SqliteCorpusStore<E = HarmonicEmbedder> {
    db: VectorDB,
    embedder: E,
}

impl SqliteCorpusStore<HarmonicEmbedder> {
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::with_embedder(VectorDB::open(db_path)?, HarmonicEmbedder::new())
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_embedder(VectorDB::open_in_memory()?, HarmonicEmbedder::new())
    }
}

impl<E: Embedder> SqliteCorpusStore<E> {
    /// Fails if the database was ingested with a different embedding dimension
    pub fn with_embedder(db: VectorDB, embedder: E) -> Result<Self> {
        if let Some(stored) = db.get_meta("embedding_dim")? {
            let expected = embedder.dimension();
            if stored.parse::<usize>().ok() != Some(expected) {
                return Err(QaError::Embedding(format!(
                    "corpus was ingested with embedding dimension {}, embedder produces {}; re-ingest with --rebuild",
                    stored, expected
                )));
            }
        }
        Ok(Self { db, embedder })
    }

    /// Embed and store a single record
    pub fn add_record(&self, record: &Record) -> Result<i64> {
        let embedding = self.embedder.embed(&record.content)?;
        self.db.upsert_record(record, &embedding)
    }

    /// Store a batch of records; a record that fails is counted and skipped
    pub fn ingest(&self, records: &[Record]) -> Result<IngestStats> {
        let start = Instant::now();
        let mut stats = IngestStats::default();

        for record in records {
            if record.content.trim().is_empty() {
                stats.skipped += 1;
                continue;
            }
            match self.add_record(record) {
                Ok(id) => {
                    debug!(id, source = ?record.source, "record stored");
                    stats.ingested += 1;
                }
                Err(e) => {
                    warn!(error = %e, source = ?record.source, "failed to store record");
                    stats.failed += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis();

        self.db.set_meta("embedding_dim", &self.embedder.dimension().to_string())?;
        self.db
            .set_meta("last_ingest", &chrono::Utc::now().timestamp().to_string())?;

        info!(
            ingested = stats.ingested,
            skipped = stats.skipped,
            failed = stats.failed,
            duration_ms = stats.duration_ms as u64,
            "ingest finished"
        );

        Ok(stats)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.db.get_stats()
    }
}

impl<E: Embedder> CorpusStore for SqliteCorpusStore<E> {
    fn fetch_all_records(&self) -> Result<Vec<Record>> {
        self.db.all_records()
    }

    fn similarity_search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredRecord>> {
        let query_embedding = self.embedder.embed(query)?;
        let results = self.db.search(&query_embedding, top_k)?;
        Ok(results.into_iter().map(ScoredRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Record> {
        vec![
            Record::new("Question: What is the capital of France?\nAnswer: Paris"),
            Record::new("Question: How many legs does a spider have?\nAnswer: 8"),
            Record::new("   "),
        ]
    }

    #[test]
    fn test_ingest_and_fetch() -> Result<()> {
        let store = SqliteCorpusStore::open_in_memory()?;
        let stats = store.ingest(&corpus())?;

        assert_eq!(stats.ingested, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 0);

        let records = store.fetch_all_records()?;
        assert_eq!(records.len(), 2);
        assert!(records[0].content.contains("France"));
        assert_eq!(store.stats()?.embedding_count, 2);
        Ok(())
    }

    #[test]
    fn test_similarity_search_top1() -> Result<()> {
        let store = SqliteCorpusStore::open_in_memory()?;
        store.ingest(&corpus())?;

        let hits = store.similarity_search("spider legs", 1)?;
        assert_eq!(hits.len(), 1);
        assert!(hits[0].record.content.contains("spider"));
        Ok(())
    }

    #[test]
    fn test_open_file_roundtrip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("corpus.db");

        {
            let store = SqliteCorpusStore::open(&path)?;
            store.ingest(&corpus())?;
        }

        let reopened = SqliteCorpusStore::open(&path)?;
        assert_eq!(reopened.fetch_all_records()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_open_rejects_dimension_mismatch() -> Result<()> {
        let db = VectorDB::open_in_memory()?;
        db.set_meta("embedding_dim", "999")?;

        let err = SqliteCorpusStore::with_embedder(db, HarmonicEmbedder::new())
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(err.contains("999"), "unexpected error: {err}");
        Ok(())
    }

    #[test]
    fn test_open_accepts_matching_dimension() -> Result<()> {
        let db = VectorDB::open_in_memory()?;
        db.set_meta("embedding_dim", &HarmonicEmbedder::new().dimension().to_string())?;
        assert!(SqliteCorpusStore::with_embedder(db, HarmonicEmbedder::new()).is_ok());
        Ok(())
    }
}
