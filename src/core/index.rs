use std::collections::HashMap;

use super::entry::QaEntry;
use super::record::Record;

/// Exact-match lookup from normalized question text to answer text.
///
/// Built once from the full corpus and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnswerIndex {
    entries: HashMap<String, String>,
}

impl AnswerIndex {
    /// Build from records in corpus order. Later duplicates overwrite earlier ones.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut entries = HashMap::new();
        for record in records {
            let QaEntry { question, answer } = QaEntry::parse(&record.content);
            entries.insert(question, answer);
        }
        Self { entries }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
