//! Anthropic API client for Claude
//!
//! This module provides a client for the Anthropic Messages API, including
//! tool-use content blocks. The orchestration decisions (which tool to call,
//! when to stop) live on the far side of this wire; the client only moves
//! requests and responses.

use crate::conversation::{Conversation, Message, MessageContent, Role};
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during API client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// API error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid API key
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Anthropic API client
pub struct AnthropicClient {
    /// API key for authentication
    api_key: String,
    /// HTTP client
    client: reqwest::Client,
    /// API base URL
    base_url: String,
}

/// Content block in a message or response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// A tool invocation requested by the model
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// The result of a tool invocation, sent back as user content
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

impl ContentBlock {
    /// Build a tool_result block from an executed tool result
    pub fn from_tool_result(result: &crate::tools::ToolResult) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: result.tool_use_id.clone(),
            content: result.content.clone(),
            is_error: result.is_error,
        }
    }
}

/// Request to send to Claude
#[derive(Debug, Serialize)]
pub struct MessageRequest {
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Messages in the conversation
    pub messages: Vec<ApiMessage>,
    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Tool definitions the model may invoke (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// A message on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Role of the message sender
    pub role: String,
    /// Content of the message (plain text or content blocks)
    pub content: MessageContent,
}

/// Response from Claude
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    /// Generated content
    pub content: Vec<ContentBlock>,
    /// Model used
    pub model: String,
    /// Stop reason
    pub stop_reason: Option<String>,
}

impl MessageRequest {
    /// Create a new message request with default settings
    pub fn new(model: impl Into<String>, messages: Vec<ApiMessage>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 4096,
            messages,
            system: None,
            tools: None,
        }
    }

    /// Create a request from a Conversation
    pub fn from_conversation(conversation: &Conversation, model: impl Into<String>) -> Self {
        let messages = conversation.messages().iter().map(ApiMessage::from_message).collect();

        Self {
            model: model.into(),
            max_tokens: 4096,
            messages,
            system: conversation.system_prompt.clone(),
            tools: None,
        }
    }

    /// Set the max tokens to generate
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Attach tool definitions
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }
}

impl ApiMessage {
    /// Create an ApiMessage from a conversation Message
    pub fn from_message(message: &Message) -> Self {
        Self {
            role: match message.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: message.content.clone(),
        }
    }
}

impl AnthropicClient {
    /// Create a new Anthropic API client
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.anthropic.com/v1".to_string())
    }

    /// Create a client against a custom base URL (used by tests)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Send a message to Claude and get a response
    pub async fn send_message(
        &self,
        request: MessageRequest,
    ) -> Result<MessageResponse, ClientError> {
        let url = format!("{}/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => ClientError::InvalidApiKey,
                429 => ClientError::RateLimitExceeded,
                _ => ClientError::ApiError(format!("{}: {}", status, error_text)),
            });
        }

        let message_response: MessageResponse = response.json().await?;
        Ok(message_response)
    }
}
