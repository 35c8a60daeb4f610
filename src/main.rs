mod commands;
#[cfg(feature = "mcp")]
mod mcp;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use qabase::logging::init_logging;
use qabase::Settings;

#[derive(Parser)]
#[command(name = "qabase")]
#[command(about = "Question/answer corpus lookup with semantic-search fallback", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Config file (default: ./qabase.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Corpus database path")]
    db: Option<PathBuf>,

    #[arg(long, global = true, help = "Try exact question match before similarity search")]
    exact_match: bool,

    #[arg(short, long, global = true, help = "Debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import question/answer records into the corpus
    Ingest {
        /// File (.json, .jsonl, .yaml, .txt, .md) or directory
        path: PathBuf,
        #[arg(long, help = "Delete the existing corpus first")]
        rebuild: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show corpus status
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Answer a single question
    Ask {
        question: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Answer the scoring service's question set and submit the answers
    Evaluate {
        #[arg(long, help = "Account name for the submission")]
        username: Option<String>,
        #[arg(long, help = "Scoring service base URL")]
        api_url: Option<String>,
        #[arg(long, help = "Answer the questions without submitting")]
        dry_run: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show the effective configuration
    Config,

    // ===== MCP Server =====
    /// Start MCP server exposing the answer lookup as a tool
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show client configuration instructions")]
        install: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }
    if cli.exact_match {
        settings.exact_match = true;
    }

    let level = if cli.verbose { "debug" } else { settings.log_level.as_str() };
    init_logging(level);

    match cli.command {
        Commands::Ingest {
            path,
            rebuild,
            json,
        } => commands::ingest::run(&settings, &path, rebuild, json),
        Commands::Status { json } => commands::status::run(&settings, json),
        Commands::Ask { question, json } => commands::ask::run(&settings, &question, json),
        Commands::Evaluate {
            username,
            api_url,
            dry_run,
            json,
        } => {
            if let Some(username) = username {
                settings.username = Some(username);
            }
            if let Some(api_url) = api_url {
                settings.api_url = api_url;
            }
            commands::evaluate::run(&settings, dry_run, json)
        }
        Commands::Config => commands::config::run(&settings, cli.config.as_deref()),

        #[cfg(feature = "mcp")]
        Commands::Mcp { install } => {
            if install {
                print_mcp_install_instructions();
                Ok(())
            } else {
                run_mcp_server(settings)
            }
        }
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server(settings: Settings) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(settings))
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions() {
    use colored::Colorize;

    let cwd = std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "/path/to/your/corpus".to_string());

    let binary_path = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "qabase".to_string());

    println!("{}", "MCP Server Installation Guide".bold().cyan());
    println!();
    println!("Add the following to your MCP client configuration:");
    println!();
    println!(r#"{{
  "mcpServers": {{
    "qabase": {{
      "command": "{}",
      "args": ["mcp"],
      "cwd": "{}"
    }}
  }}
}}"#, binary_path, cwd);
    println!();
    println!("{}", "Available tools:".bold());
    println!("  • {} - Answer a question from the corpus", "find_answer".green());
    println!("  • {} - Corpus and index statistics", "corpus_status".green());
}
