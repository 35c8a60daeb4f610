//! Corpus storage and semantic search
//!
//! HTP embeddings over a SQLite record store, exposed through [`CorpusStore`].

pub mod embedding;
pub mod store;
pub mod vectordb;

pub use embedding::{cosine_similarity, Embedder, HarmonicEmbedder, EMBEDDING_DIM};
pub use store::{CorpusStore, IngestStats, SqliteCorpusStore};
pub use vectordb::{StoreStats, VectorDB};
