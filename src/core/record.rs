use serde::{Deserialize, Serialize};

/// A single corpus entry as stored in the corpus store.
///
/// The embedding lives next to it inside the store and never leaves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Record {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A record returned by similarity search, with its cosine similarity
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: Record,
    pub score: f32,
}

impl From<(Record, f32)> for ScoredRecord {
    fn from((record, score): (Record, f32)) -> Self {
        Self { record, score }
    }
}
