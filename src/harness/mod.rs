//! Evaluation harness: fetch the question set, answer it, submit for scoring

pub mod client;
pub mod runner;

pub use client::{AnswerItem, QuestionItem, ScoringClient, Submission, SubmissionResult};
pub use runner::{run_batch, BatchOutcome, ResultRow};
