//! qabase library
//!
//! Answers questions from a question/answer corpus: exact lookup, then
//! nearest-neighbor search with answer extraction.
//!
//! # Modules
//!
//! - `core`: Corpus records, parsing heuristics, exact-match index
//! - `search`: Embeddings and the SQLite corpus store
//! - `agent`: Resolver and single-turn conversation adapter
//! - `harness`: Scoring service client and batch runner

pub mod agent;
pub mod config;
pub mod core;
pub mod error;
pub mod harness;
pub mod logging;
pub mod search;

// Re-exports for convenience
pub use agent::{AgentContext, ConversationAdapter, Message, Resolution, Resolver, ResolverSettings, Role};
pub use config::Settings;
pub use crate::core::entry::QaEntry;
pub use crate::core::extract::extract_answer;
pub use crate::core::index::AnswerIndex;
pub use crate::core::record::{Record, ScoredRecord};
pub use error::{QaError, Result};
pub use search::{CorpusStore, SqliteCorpusStore};
