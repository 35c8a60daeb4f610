//! Scoring service HTTP client

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{QaError, Result};

const QUESTIONS_TIMEOUT: Duration = Duration::from_secs(15);
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(60);

/// One item of the question set.
///
/// Fields are kept as raw JSON so one malformed item cannot fail the whole
/// feed; the runner skips items whose fields are unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    #[serde(default)]
    pub task_id: Option<serde_json::Value>,
    #[serde(default)]
    pub question: Option<serde_json::Value>,
}

impl QuestionItem {
    /// Task id as text; numeric ids are accepted. Empty ids count as missing.
    pub fn task_id(&self) -> Option<String> {
        match self.task_id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_ref()?.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerItem {
    pub task_id: String,
    pub submitted_answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub username: String,
    pub agent_code: String,
    pub answers: Vec<AnswerItem>,
}

/// Grading response; fields are optional because the service omits some on partial failures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub correct_count: Option<u64>,
    #[serde(default)]
    pub total_attempted: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmissionResult {
    pub fn summary(&self) -> String {
        let or_unknown = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
        format!(
            "Submission Successful!\nUser: {}\nOverall Score: {}% ({}/{} correct)\nMessage: {}",
            self.username.as_deref().unwrap_or("?"),
            self.score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            or_unknown(self.correct_count),
            or_unknown(self.total_attempted),
            self.message.as_deref().unwrap_or("No message received."),
        )
    }
}

pub struct ScoringClient {
    http: Client,
    api_url: String,
}

impl ScoringClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn questions_url(&self) -> String {
        format!("{}/questions", self.api_url)
    }

    pub fn submit_url(&self) -> String {
        format!("{}/submit", self.api_url)
    }

    pub fn fetch_questions(&self) -> Result<Vec<QuestionItem>> {
        let url = self.questions_url();
        info!(%url, "fetching questions");

        let response = self.http.get(&url).timeout(QUESTIONS_TIMEOUT).send()?;
        let items: Vec<QuestionItem> = check_status(response)?.json()?;

        if items.is_empty() {
            return Err(QaError::Scoring("Fetched questions list is empty".to_string()));
        }

        info!(count = items.len(), "fetched questions");
        Ok(items)
    }

    pub fn submit(&self, submission: &Submission) -> Result<SubmissionResult> {
        let url = self.submit_url();
        info!(%url, answers = submission.answers.len(), "submitting answers");

        let response = self
            .http
            .post(&url)
            .timeout(SUBMIT_TIMEOUT)
            .json(submission)
            .send()?;

        Ok(check_status(response)?.json()?)
    }
}

/// Turn non-2xx responses into an error carrying the server's `detail` when present
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(QaError::Scoring(http_error_detail(status.as_u16(), &body)))
}

fn http_error_detail(status: u16, body: &str) -> String {
    let mut detail = format!("Server responded with status {}.", status);

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => {
            let text = json
                .get("detail")
                .map(|d| match d.as_str() {
                    Some(s) => s.to_string(),
                    None => d.to_string(),
                })
                .unwrap_or_else(|| body.to_string());
            detail.push_str(&format!(" Detail: {}", text));
        }
        Err(_) => {
            let preview: String = body.chars().take(500).collect();
            detail.push_str(&format!(" Response: {}", preview));
        }
    }

    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_trim_trailing_slash() -> Result<()> {
        let client = ScoringClient::new("https://scoring.example/")?;
        assert_eq!(client.questions_url(), "https://scoring.example/questions");
        assert_eq!(client.submit_url(), "https://scoring.example/submit");
        Ok(())
    }

    #[test]
    fn test_question_items_tolerate_missing_fields() -> anyhow::Result<()> {
        let items: Vec<QuestionItem> = serde_json::from_str(
            r#"[{"task_id": "t1", "question": "q1", "Level": "1"}, {"question": "q2"}]"#,
        )?;
        assert_eq!(items[0].task_id().as_deref(), Some("t1"));
        assert_eq!(items[0].question(), Some("q1"));
        assert_eq!(items[1].task_id(), None);
        Ok(())
    }

    #[test]
    fn test_question_items_tolerate_wrong_types() -> anyhow::Result<()> {
        let items: Vec<QuestionItem> = serde_json::from_str(
            r#"[
                {"task_id": 7, "question": "q1"},
                {"task_id": "t2", "question": "q2"},
                {"task_id": ["x"], "question": 3},
                {"task_id": "", "question": null}
            ]"#,
        )?;
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].task_id().as_deref(), Some("7"));
        assert_eq!(items[1].task_id().as_deref(), Some("t2"));
        assert_eq!(items[2].task_id(), None);
        assert_eq!(items[2].question(), None);
        assert_eq!(items[3].task_id(), None);
        assert_eq!(items[3].question(), None);
        Ok(())
    }

    #[test]
    fn test_submission_shape() -> anyhow::Result<()> {
        let submission = Submission {
            username: "alice".to_string(),
            agent_code: "https://huggingface.co/spaces/alice/agent/tree/main".to_string(),
            answers: vec![AnswerItem {
                task_id: "t1".to_string(),
                submitted_answer: "Paris".to_string(),
            }],
        };
        let json = serde_json::to_value(&submission)?;
        assert_eq!(json["answers"][0]["submitted_answer"], "Paris");
        assert_eq!(json["username"], "alice");
        Ok(())
    }

    #[test]
    fn test_summary() -> anyhow::Result<()> {
        let result: SubmissionResult = serde_json::from_str(
            r#"{"username": "alice", "score": 40.0, "correct_count": 8, "total_attempted": 20}"#,
        )?;
        let summary = result.summary();
        assert!(summary.contains("User: alice"));
        assert!(summary.contains("Overall Score: 40% (8/20 correct)"));
        assert!(summary.contains("No message received."));
        Ok(())
    }

    #[test]
    fn test_http_error_detail() {
        assert_eq!(
            http_error_detail(422, r#"{"detail": "bad username"}"#),
            "Server responded with status 422. Detail: bad username"
        );
        assert_eq!(
            http_error_detail(500, "oops"),
            "Server responded with status 500. Response: oops"
        );
    }
}
