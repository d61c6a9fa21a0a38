//! Interactive chat session
//!
//! Each accepted line is ingested first and only then sent to the chat
//! backend, so the event log never depends on the backend being up.

use std::sync::Arc;

use leadlog_core::Event;
use leadlog_llm::{Conversation, LlmBackend};

use crate::ingestion::IngestionPipeline;
use crate::AgentError;

const EXIT_COMMANDS: [&str; 3] = ["/exit", "exit", "quit"];

/// Prefix of the reply used when the chat backend fails
pub const OFFLINE_REPLY_PREFIX: &str = "(offline) Error talking to the chat backend:";

/// True for `/exit`, `exit` or `quit`, ignoring case and surrounding whitespace
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_COMMANDS.iter().any(|cmd| cmd.eq_ignore_ascii_case(line))
}

/// Result of handling one input line
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank line; nothing recorded
    Skipped,
    /// The user asked to leave
    Exit,
    Reply {
        event: Event,
        reply: String,
        /// False when `reply` is the offline fallback
        backend_ok: bool,
    },
}

pub struct ChatSession {
    pipeline: IngestionPipeline,
    backend: Arc<dyn LlmBackend>,
    conversation: Conversation,
}

impl ChatSession {
    pub fn new(
        pipeline: IngestionPipeline,
        backend: Arc<dyn LlmBackend>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            backend,
            conversation: Conversation::new(system_prompt),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn backend(&self) -> &Arc<dyn LlmBackend> {
        &self.backend
    }

    /// Process one line of user input.
    ///
    /// Only a store failure is an error; backend failures become the reply.
    pub async fn handle_line(&mut self, line: &str) -> Result<TurnOutcome, AgentError> {
        let text = line.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Skipped);
        }
        if is_exit_command(text) {
            return Ok(TurnOutcome::Exit);
        }

        let event = match self.pipeline.ingest_now(text).await {
            Ok(event) => event,
            Err(AgentError::EmptyInput) => return Ok(TurnOutcome::Skipped),
            Err(e) => return Err(e),
        };

        self.conversation.push_user(text);
        let (reply, backend_ok) = match self.backend.generate(self.conversation.messages()).await {
            Ok(result) => (result.text, true),
            Err(e) => {
                tracing::warn!(error = %e, model = self.backend.model_name(), "Chat backend failed");
                metrics::counter!("leadlog_chat_failures_total").increment(1);
                (format!("{} {}", OFFLINE_REPLY_PREFIX, e), false)
            },
        };
        self.conversation.push_assistant(reply.clone());

        Ok(TurnOutcome::Reply { event, reply, backend_ok })
    }
}
