use tracing::info;

use crate::core::index::AnswerIndex;
use crate::error::Result;
use crate::search::store::CorpusStore;

pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Sorry, I couldn't find that question in my database.";

/// Knobs for answer resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Consult the exact-match index before similarity search
    pub exact_match: bool,
    /// Returned when similarity search yields nothing
    pub not_found_message: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            exact_match: false,
            not_found_message: DEFAULT_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

/// Everything resolution needs, built once at startup.
///
/// The index is a snapshot of the store taken in [`AgentContext::build`];
/// records ingested later are visible to similarity search but not to
/// exact-match lookup until the context is rebuilt.
pub struct AgentContext<S> {
    index: AnswerIndex,
    store: S,
    settings: ResolverSettings,
}

impl<S: CorpusStore> AgentContext<S> {
    pub fn build(store: S, settings: ResolverSettings) -> Result<Self> {
        let records = store.fetch_all_records()?;
        let index = AnswerIndex::build(&records);

        info!(
            records = records.len(),
            questions = index.len(),
            exact_match = settings.exact_match,
            "answer index built"
        );

        Ok(Self {
            index,
            store,
            settings,
        })
    }

    pub fn index(&self) -> &AnswerIndex {
        &self.index
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }
}
