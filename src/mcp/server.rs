//! qabase MCP server implementation

use std::sync::{Arc, Mutex};

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use qabase::{AgentContext, ConversationAdapter, Resolver, Settings, SqliteCorpusStore};

use crate::commands::build_context;

/// Parameters for find_answer tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindAnswerParams {
    /// Natural language question (e.g., "What is the capital of France?")
    #[schemars(description = "The question to answer")]
    pub query: String,
}

#[derive(Debug, Serialize)]
struct CorpusStatusJson {
    record_count: usize,
    embedding_count: usize,
    question_count: usize,
    last_ingested: Option<i64>,
    exact_match: bool,
}

/// Answer lookup service; the context is built once and shared by all calls
#[derive(Clone)]
pub struct QaService {
    ctx: Arc<Mutex<AgentContext<SqliteCorpusStore>>>,
    tool_router: ToolRouter<Self>,
}

impl QaService {
    pub fn new(ctx: AgentContext<SqliteCorpusStore>) -> Self {
        Self {
            ctx: Arc::new(Mutex::new(ctx)),
            tool_router: Self::tool_router(),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, AgentContext<SqliteCorpusStore>>, McpError> {
        self.ctx
            .lock()
            .map_err(|_| McpError::internal_error("Answer context poisoned".to_string(), None))
    }

    fn answer(&self, query: &str) -> Result<String, McpError> {
        let ctx = self.lock()?;
        let agent = ConversationAdapter::new(Resolver::new(&*ctx));

        agent
            .ask(query)
            .map_err(|e| McpError::internal_error(format!("Lookup failed: {}", e), None))
    }

    fn status(&self) -> Result<CorpusStatusJson, McpError> {
        let ctx = self.lock()?;
        let stats = ctx.store().stats().map_err(|e| {
            McpError::internal_error(format!("Failed to read corpus stats: {}", e), None)
        })?;

        Ok(CorpusStatusJson {
            record_count: stats.record_count,
            embedding_count: stats.embedding_count,
            question_count: ctx.index().len(),
            last_ingested: stats.last_ingested,
            exact_match: ctx.settings().exact_match,
        })
    }
}

#[tool_router]
impl QaService {
    /// Answer a question from the corpus
    #[tool(description = "Answer a question from the question/answer corpus. Uses an exact question match when enabled, otherwise the closest stored question, and returns only the stored answer text.")]
    async fn find_answer(
        &self,
        params: Parameters<FindAnswerParams>,
    ) -> Result<CallToolResult, McpError> {
        let answer = self.answer(&params.0.query)?;

        Ok(CallToolResult::success(vec![Content::text(answer)]))
    }

    /// Corpus and index statistics
    #[tool(description = "Get corpus statistics: stored records, embeddings, distinct indexed questions.")]
    async fn corpus_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status()?;

        let output = serde_json::to_string_pretty(&status).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }
}

#[tool_handler]
impl ServerHandler for QaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Question/answer corpus server. Call find_answer with a question to get the stored answer.".to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Run the MCP server on stdio
pub async fn run_mcp_server(settings: Settings) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let ctx = build_context(&settings)?;
    info!(questions = ctx.index().len(), "starting MCP server");

    let service = QaService::new(ctx);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
