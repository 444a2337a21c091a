//! The agent loop: model calls, tool execution, and conversation upkeep
//!
//! A turn starts with one user message and runs model round-trips until the
//! model answers without requesting a tool. Tool results always go back to
//! the model as user-role tool_result blocks, even when a tool failed.

use crate::client::{AnthropicClient, ClientError, ContentBlock, MessageRequest};
use crate::conversation::{Conversation, Message};
use crate::tools::{all_tools, Tool, ToolExecutor, ToolUse};
use cinder_core::config::AgentConfig;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Character budget for conversation history before old messages are dropped
const HISTORY_CHAR_BUDGET: usize = 200_000;

/// Default system prompt for the coding agent
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful code agent. You can scan files, read code, execute commands, \
and compile/run code.

WORKFLOW:
1. Scan the directory or read files to understand the context.
2. When asked to write code, first generate the code internally.
3. Call `generate_diff` to show the changes to the user.
4. ASK the user for confirmation.
5. ONLY if the user says \"yes\" or \"confirm\", call `write_file` to save the changes.
6. You can use `run_command` to run system commands.
7. You can use `execute_code` to compile and run code in Python, C++, C, Go, or \
JavaScript. This is useful for debugging or verifying code.
8. You can use `fetch_url` to read documentation pages from the web.";

/// Errors that can occur while driving the agent loop
#[derive(Error, Debug)]
pub enum AgentError {
    /// Client error during API calls
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// The model kept requesting tools past the turn limit
    #[error("Turn limit of {0} reached without a final answer")]
    TurnLimitReached(u32),
}

/// Incremental events emitted while a turn runs, for the UI to render
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Text produced by the model
    Text(String),
    /// The model requested a tool invocation
    ToolCall {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// A tool invocation finished
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
    /// Old messages were dropped to stay within the history budget
    HistoryTruncated { removed: usize },
}

/// A conversational coding agent bound to one API client and one workspace
pub struct Agent {
    client: AnthropicClient,
    executor: ToolExecutor,
    config: AgentConfig,
    conversation: Conversation,
    tools: Vec<Tool>,
}

impl Agent {
    /// Create an agent with the default system prompt and full tool set
    pub fn new(client: AnthropicClient, executor: ToolExecutor, config: AgentConfig) -> Self {
        Self {
            client,
            executor,
            config,
            conversation: Conversation::with_system_prompt(DEFAULT_SYSTEM_PROMPT),
            tools: all_tools(),
        }
    }

    /// Replace the system prompt (clears nothing else)
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.conversation.system_prompt = Some(prompt.into());
        self
    }

    /// Number of messages currently in the conversation
    pub fn message_count(&self) -> usize {
        self.conversation.message_count()
    }

    /// Drop all history, keeping the system prompt. Backs the `new` command.
    pub fn reset(&mut self) {
        self.conversation.clear();
        tracing::info!("conversation reset");
    }

    /// Run one user turn to completion.
    ///
    /// Emits [`AgentEvent`]s on `events` as they happen and returns the final
    /// text answer. Send failures are ignored: a dropped receiver means the
    /// UI stopped listening, not that the turn should fail.
    pub async fn run_turn(
        &mut self,
        user_input: impl Into<String>,
        events: &UnboundedSender<AgentEvent>,
    ) -> Result<String, AgentError> {
        self.conversation.add_user_message(user_input);

        let removed = self.conversation.truncate_to_limit(HISTORY_CHAR_BUDGET);
        if removed > 0 {
            tracing::info!(removed, "history truncated");
            let _ = events.send(AgentEvent::HistoryTruncated { removed });
        }

        let mut final_response = String::new();

        for turn in 1..=self.config.max_turns {
            tracing::debug!(turn, max_turns = self.config.max_turns, "agent turn");

            let request =
                MessageRequest::from_conversation(&self.conversation, &self.config.model)
                    .with_max_tokens(self.config.max_tokens)
                    .with_tools(self.tools.clone());

            let response = self.client.send_message(request).await?;

            let mut has_tool_use = false;
            let mut tool_results = Vec::new();

            for block in &response.content {
                match block {
                    ContentBlock::Text { text } => {
                        final_response = text.clone();
                        let _ = events.send(AgentEvent::Text(text.clone()));
                    }
                    ContentBlock::ToolUse { id, name, input } => {
                        has_tool_use = true;
                        let _ = events.send(AgentEvent::ToolCall {
                            id: id.clone(),
                            name: name.clone(),
                            input: input.clone(),
                        });

                        let tool_use = ToolUse {
                            id: id.clone(),
                            name: name.clone(),
                            input: input.clone(),
                        };
                        let result = self.executor.execute(&tool_use).await;

                        let _ = events.send(AgentEvent::ToolResult {
                            tool_use_id: result.tool_use_id.clone(),
                            content: result.content.clone(),
                            is_error: result.is_error.unwrap_or(false),
                        });

                        tool_results.push(result);
                    }
                    ContentBlock::ToolResult { .. } => {
                        tracing::warn!("unexpected tool_result block in assistant response");
                    }
                }
            }

            if !has_tool_use {
                self.conversation
                    .add_message(Message::assistant(final_response.clone()));
                return Ok(final_response);
            }

            // Keep the assistant's tool_use blocks and our tool_result blocks
            // paired in history so the API sees a well-formed exchange.
            self.conversation
                .add_message(Message::assistant_with_blocks(response.content));

            let result_blocks: Vec<ContentBlock> = tool_results
                .iter()
                .map(ContentBlock::from_tool_result)
                .collect();
            self.conversation
                .add_message(Message::user_with_blocks(result_blocks));
        }

        tracing::warn!(max_turns = self.config.max_turns, "turn limit reached");
        Err(AgentError::TurnLimitReached(self.config.max_turns))
    }
}
