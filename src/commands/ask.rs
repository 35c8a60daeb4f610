//! Ask command - answer one question through the conversation adapter

use anyhow::Result;
use colored::Colorize;

use qabase::{ConversationAdapter, Resolution, Resolver, Settings};

use super::build_context;

pub fn run(settings: &Settings, question: &str, json: bool) -> Result<()> {
    let ctx = build_context(settings)?;
    let resolver = Resolver::new(&ctx);

    if json {
        let resolution = resolver.resolve_detailed(question)?;
        let (kind, score) = match &resolution {
            Resolution::Exact(_) => ("exact", None),
            Resolution::Nearest { score, .. } => ("nearest", Some(*score)),
            Resolution::NotFound(_) => ("not_found", None),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "question": question,
                "answer": resolution.answer(),
                "resolution": kind,
                "score": score,
            }))?
        );
        return Ok(());
    }

    let agent = ConversationAdapter::new(resolver);
    let answer = agent.ask(question)?;

    if answer.is_empty() {
        println!("{} (empty answer)", "→".dimmed());
    } else {
        println!("{}", answer);
    }

    Ok(())
}
