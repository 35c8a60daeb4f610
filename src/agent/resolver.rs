//! Query resolution: exact lookup, then top-1 similarity search

use tracing::debug;

use super::context::AgentContext;
use crate::core::extract::extract_answer;
use crate::error::Result;
use crate::search::store::CorpusStore;

/// How an answer was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Query matched an indexed question verbatim
    Exact(String),
    /// Extracted from the nearest record
    Nearest { answer: String, score: f32 },
    /// Search returned no records; carries the configured message
    NotFound(String),
}

impl Resolution {
    pub fn answer(&self) -> &str {
        match self {
            Self::Exact(answer) | Self::Nearest { answer, .. } | Self::NotFound(answer) => answer,
        }
    }

    pub fn into_answer(self) -> String {
        match self {
            Self::Exact(answer) | Self::Nearest { answer, .. } | Self::NotFound(answer) => answer,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

/// Resolves questions against a shared [`AgentContext`]
pub struct Resolver<'a, S> {
    ctx: &'a AgentContext<S>,
}

impl<'a, S: CorpusStore> Resolver<'a, S> {
    pub fn new(ctx: &'a AgentContext<S>) -> Self {
        Self { ctx }
    }

    /// Answer text for `query`; store failures propagate
    pub fn resolve(&self, query: &str) -> Result<String> {
        Ok(self.resolve_detailed(query)?.into_answer())
    }

    pub fn resolve_detailed(&self, query: &str) -> Result<Resolution> {
        let settings = self.ctx.settings();

        if settings.exact_match {
            if let Some(answer) = self.ctx.index().get(query) {
                debug!(query, "exact match");
                return Ok(Resolution::Exact(answer.to_string()));
            }
        }

        let mut hits = self.ctx.store().similarity_search(query, 1)?;
        if hits.is_empty() {
            debug!(query, "no neighbor found");
            return Ok(Resolution::NotFound(settings.not_found_message.clone()));
        }

        let top = hits.swap_remove(0);
        debug!(query, score = top.score, "nearest neighbor");

        Ok(Resolution::Nearest {
            answer: extract_answer(&top.record.content),
            score: top.score,
        })
    }
}
