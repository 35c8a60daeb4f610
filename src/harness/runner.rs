//! Batch run of the agent over a question set

use serde::Serialize;
use tracing::{info, warn};

use super::client::{AnswerItem, QuestionItem};
use crate::agent::conversation::{Answerer, ConversationAdapter};

/// One row of the results log, including failed questions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub task_id: String,
    pub question: String,
    pub submitted_answer: String,
    pub failed: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Answers to submit; failed questions are left out
    pub answers: Vec<AnswerItem>,
    pub log: Vec<ResultRow>,
    pub skipped: usize,
}

impl BatchOutcome {
    pub fn failed(&self) -> usize {
        self.log.iter().filter(|row| row.failed).count()
    }
}

/// Ask every question in turn. A failing question is logged and the run goes on.
pub fn run_batch<A: Answerer>(agent: &ConversationAdapter<A>, items: &[QuestionItem]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    info!(count = items.len(), "running agent on questions");

    for item in items {
        let (task_id, question) = match (item.task_id(), item.question()) {
            (Some(task_id), Some(question)) => (task_id, question),
            _ => {
                warn!(?item, "skipping item with missing task_id or question");
                outcome.skipped += 1;
                continue;
            }
        };

        match agent.ask(question) {
            Ok(answer) => {
                outcome.answers.push(AnswerItem {
                    task_id: task_id.clone(),
                    submitted_answer: answer.clone(),
                });
                outcome.log.push(ResultRow {
                    task_id: task_id.clone(),
                    question: question.to_string(),
                    submitted_answer: answer,
                    failed: false,
                });
            }
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "agent failed");
                outcome.log.push(ResultRow {
                    task_id: task_id.clone(),
                    question: question.to_string(),
                    submitted_answer: format!("AGENT ERROR: {}", e),
                    failed: true,
                });
            }
        }
    }

    outcome
}
