//! Single-turn conversation adapter
//!
//! One transition per call: the last user message goes in, one assistant
//! message comes out appended to the caller's history. Nothing is kept
//! between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolver::Resolver;
use crate::error::{QaError, Result};
use crate::search::store::CorpusStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Something that turns a question into an answer
pub trait Answerer {
    fn answer(&self, question: &str) -> Result<String>;
}

impl<S: CorpusStore> Answerer for Resolver<'_, S> {
    fn answer(&self, question: &str) -> Result<String> {
        self.resolve(question)
    }
}

impl<F> Answerer for F
where
    F: Fn(&str) -> Result<String>,
{
    fn answer(&self, question: &str) -> Result<String> {
        self(question)
    }
}

pub struct ConversationAdapter<A> {
    answerer: A,
}

impl<A: Answerer> ConversationAdapter<A> {
    pub fn new(answerer: A) -> Self {
        Self { answerer }
    }

    /// Answer the most recent message and return the history extended by the reply
    pub fn invoke(&self, mut messages: Vec<Message>) -> Result<Vec<Message>> {
        let last = messages
            .last()
            .ok_or_else(|| QaError::InvalidConversation("no messages".to_string()))?;

        if last.role != Role::User {
            return Err(QaError::InvalidConversation(format!(
                "last message must come from the user, got {:?}",
                last.role
            )));
        }

        debug!(history = messages.len(), "conversation turn");
        let answer = self.answerer.answer(&last.content)?;
        messages.push(Message::assistant(answer));

        Ok(messages)
    }

    /// Run a fresh one-message conversation and return the reply text
    pub fn ask(&self, question: &str) -> Result<String> {
        let mut messages = self.invoke(vec![Message::user(question)])?;
        // invoke always appends exactly one message
        Ok(messages.pop().map(|m| m.content).unwrap_or_default())
    }
}
