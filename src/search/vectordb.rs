//! SQLite storage for corpus records and their embeddings
//!
//! Embeddings are stored as little-endian f32 BLOBs and similarity is
//! computed in Rust.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::embedding::cosine_similarity;
use crate::core::record::Record;
use crate::error::Result;

pub struct VectorDB {
    conn: Connection,
}

/// Index statistics
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub record_count: usize,
    pub embedding_count: usize,
    pub last_ingested: Option<i64>,
}

impl VectorDB {
    /// Open or create database at path
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL UNIQUE,
                source TEXT,
                ingested_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS embeddings (
                record_id INTEGER PRIMARY KEY,
                embedding BLOB NOT NULL,
                FOREIGN KEY (record_id) REFERENCES records(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS store_meta (
                key TEXT PRIMARY KEY,
                value TEXT
            );
            "#,
        )?;

        Ok(())
    }

    /// Insert a record with its embedding.
    ///
    /// Re-inserting identical content updates source and embedding in place,
    /// so the record keeps its original position in corpus order.
    pub fn upsert_record(&self, record: &Record, embedding: &[f32]) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();

        let id: i64 = self.conn.query_row(
            r#"
            INSERT INTO records (content, source, ingested_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(content) DO UPDATE SET
                source = excluded.source,
                ingested_at = excluded.ingested_at
            RETURNING id
            "#,
            params![record.content, record.source, now],
            |row| row.get(0),
        )?;

        self.conn.execute(
            r#"
            INSERT INTO embeddings (record_id, embedding)
            VALUES (?1, ?2)
            ON CONFLICT(record_id) DO UPDATE SET embedding = excluded.embedding
            "#,
            params![id, embedding_to_blob(embedding)],
        )?;

        Ok(id)
    }

    /// All records in insertion order
    pub fn all_records(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare("SELECT content, source FROM records ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Record {
                content: row.get(0)?,
                source: row.get(1)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Records ranked by cosine similarity to the query embedding, best first.
    ///
    /// Full scan; fine for corpora of a few thousand records.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<(Record, f32)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.content, r.source, e.embedding
            FROM records r
            JOIN embeddings e ON r.id = e.record_id
            ORDER BY r.id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let blob: Vec<u8> = row.get(2)?;
            Ok((
                Record {
                    content: row.get(0)?,
                    source: row.get(1)?,
                },
                blob,
            ))
        })?;

        let mut results: Vec<(Record, f32)> = Vec::new();
        for row in rows {
            let (record, blob) = row?;
            let similarity = cosine_similarity(query_embedding, &blob_to_embedding(&blob));
            results.push((record, similarity));
        }

        // stable sort keeps corpus order among equal scores
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    pub fn get_stats(&self) -> Result<StoreStats> {
        let record_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;

        let embedding_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))?;

        let last_ingested: Option<i64> = self
            .conn
            .query_row("SELECT MAX(ingested_at) FROM records", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(StoreStats {
            record_count: record_count as usize,
            embedding_count: embedding_count as usize,
            last_ingested,
        })
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO store_meta (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_conversion() {
        let embedding = vec![1.0, 2.0, 3.0, -0.5];
        assert_eq!(blob_to_embedding(&embedding_to_blob(&embedding)), embedding);
    }

    #[test]
    fn test_upsert_keeps_position() -> Result<()> {
        let db = VectorDB::open_in_memory()?;

        let first = db.upsert_record(&Record::new("Question: a? Answer: 1"), &[1.0, 0.0])?;
        db.upsert_record(&Record::new("Question: b? Answer: 2"), &[0.0, 1.0])?;
        let again = db.upsert_record(
            &Record::new("Question: a? Answer: 1").with_source("second.json"),
            &[0.5, 0.5],
        )?;
        assert_eq!(first, again);

        let records = db.all_records()?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "Question: a? Answer: 1");
        assert_eq!(records[0].source.as_deref(), Some("second.json"));

        let stats = db.get_stats()?;
        assert_eq!(stats.record_count, 2);
        assert_eq!(stats.embedding_count, 2);
        assert!(stats.last_ingested.is_some());
        Ok(())
    }

    #[test]
    fn test_search_ranks_by_similarity() -> Result<()> {
        let db = VectorDB::open_in_memory()?;
        db.upsert_record(&Record::new("x"), &[1.0, 0.0])?;
        db.upsert_record(&Record::new("y"), &[0.0, 1.0])?;
        db.upsert_record(&Record::new("z"), &[0.7, 0.7])?;

        let results = db.search(&[0.0, 1.0], 2)?;
        let contents: Vec<_> = results.iter().map(|(r, _)| r.content.as_str()).collect();
        assert_eq!(contents, vec!["y", "z"]);
        assert!((results[0].1 - 1.0).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_search_empty_store() -> Result<()> {
        let db = VectorDB::open_in_memory()?;
        assert!(db.search(&[1.0, 0.0], 1)?.is_empty());
        assert_eq!(db.get_stats()?.last_ingested, None);
        Ok(())
    }

    #[test]
    fn test_meta() -> Result<()> {
        let db = VectorDB::open_in_memory()?;
        assert_eq!(db.get_meta("embedder")?, None);
        db.set_meta("embedder", "htp-384")?;
        db.set_meta("embedder", "htp-384-v2")?;
        assert_eq!(db.get_meta("embedder")?.as_deref(), Some("htp-384-v2"));
        Ok(())
    }
}
