//! Evaluate command - answer the scoring service's questions and submit them

use anyhow::{bail, Context, Result};
use colored::Colorize;
use unicode_width::UnicodeWidthChar;

use qabase::harness::{run_batch, BatchOutcome, ScoringClient, Submission};
use qabase::{ConversationAdapter, Resolver, Settings};

use super::build_context;

const TASK_WIDTH: usize = 12;
const QUESTION_WIDTH: usize = 48;
const ANSWER_WIDTH: usize = 32;

pub fn run(settings: &Settings, dry_run: bool, json: bool) -> Result<()> {
    let identity = if dry_run {
        None
    } else {
        Some(submission_identity(settings)?)
    };

    let ctx = build_context(settings)?;
    let agent = ConversationAdapter::new(Resolver::new(&ctx));

    let client = ScoringClient::new(&settings.api_url)?;
    let questions = client
        .fetch_questions()
        .context("Error fetching questions")?;

    if !json {
        println!(
            "{} Running agent on {} questions...",
            "→".dimmed(),
            questions.len()
        );
    }

    let outcome = run_batch(&agent, &questions);

    let Some((username, agent_code)) = identity else {
        return report(&outcome, None, json);
    };

    if outcome.answers.is_empty() {
        report(&outcome, None, json)?;
        bail!("Agent did not produce any answers to submit.");
    }

    if !json {
        println!(
            "{} Agent finished. Submitting {} answers for user '{}'...",
            "→".dimmed(),
            outcome.answers.len(),
            username
        );
    }

    let submission = Submission {
        username,
        agent_code,
        answers: outcome.answers.clone(),
    };

    match client.submit(&submission) {
        Ok(result) => report(&outcome, Some(result.summary()), json),
        Err(e) => {
            report(&outcome, None, json)?;
            Err(e).context("Submission Failed")
        }
    }
}

/// Username and agent code to submit under; both must be set and non-blank
fn submission_identity(settings: &Settings) -> Result<(String, String)> {
    let Some(username) = settings
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    else {
        bail!("No username configured. Pass --username or set QABASE_USERNAME.");
    };
    let Some(agent_code) = settings.agent_code() else {
        bail!("No space id configured. Set SPACE_ID or space_id in qabase.toml.");
    };
    Ok((username.to_string(), agent_code))
}

fn report(outcome: &BatchOutcome, status: Option<String>, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": status,
                "submitted": status.is_some(),
                "skipped": outcome.skipped,
                "failed": outcome.failed(),
                "results": outcome.log,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "{} {} {} {}",
        fit("Task ID", TASK_WIDTH).bold(),
        fit("Question", QUESTION_WIDTH).bold(),
        "│".dimmed(),
        "Submitted Answer".bold()
    );
    for row in &outcome.log {
        let answer = fit(&row.submitted_answer, ANSWER_WIDTH);
        println!(
            "{} {} {} {}",
            fit(&row.task_id, TASK_WIDTH).dimmed(),
            fit(&row.question, QUESTION_WIDTH),
            "│".dimmed(),
            if row.failed { answer.red() } else { answer.green() }
        );
    }
    println!();

    if outcome.skipped > 0 {
        println!(
            "  {} {} items skipped (missing task_id or question)",
            "!".yellow(),
            outcome.skipped
        );
    }
    if outcome.failed() > 0 {
        println!("  {} {} questions failed", "✗".red(), outcome.failed());
    }

    match status {
        Some(status) => println!("{}", status.green()),
        None => println!("{} Answers not submitted", "→".dimmed()),
    }

    Ok(())
}

/// Single line of exactly `width` display columns: newlines flattened,
/// overflow cut with an ellipsis, short text padded.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .collect();
    let total: usize = flat.chars().map(|c| c.width().unwrap_or(0)).sum();

    if total <= width {
        out.push_str(&flat);
        used = total;
    } else {
        for c in flat.chars() {
            let w = c.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }

    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    fn settings(username: Option<&str>) -> Settings {
        Settings {
            username: username.map(String::from),
            space_id: Some("alice/agent".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_submission_identity_rejects_blank_username() {
        assert!(submission_identity(&settings(None)).is_err());
        assert!(submission_identity(&settings(Some(""))).is_err());
        assert!(submission_identity(&settings(Some("   "))).is_err());
    }

    #[test]
    fn test_submission_identity_trims_username() -> Result<()> {
        let (username, agent_code) = submission_identity(&settings(Some("  alice ")))?;
        assert_eq!(username, "alice");
        assert!(agent_code.contains("alice/agent"));
        Ok(())
    }

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit("abc", 6), "abc   ");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        let out = fit("abcdefghij", 6);
        assert_eq!(out, "abcde…");
        assert_eq!(out.width(), 6);
    }

    #[test]
    fn test_fit_wide_chars() {
        let out = fit("수도는 서울입니다", 8);
        assert_eq!(out.width(), 8);
        assert!(out.contains('…'));
    }

    #[test]
    fn test_fit_flattens_newlines() {
        assert_eq!(fit("a\nb", 4), "a b ");
    }
}
