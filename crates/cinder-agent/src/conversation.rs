//! Conversation management for the AI agent

use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant (AI) message
    Assistant,
}

/// Content of a message - either simple text or structured content blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Structured content blocks (for tool use/results)
    Blocks(Vec<crate::client::ContentBlock>),
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<Vec<crate::client::ContentBlock>> for MessageContent {
    fn from(blocks: Vec<crate::client::ContentBlock>) -> Self {
        MessageContent::Blocks(blocks)
    }
}

impl PartialEq<&str> for MessageContent {
    fn eq(&self, other: &&str) -> bool {
        match self {
            MessageContent::Text(text) => text == other,
            MessageContent::Blocks(_) => false,
        }
    }
}

impl MessageContent {
    /// Get text content if this is a text message, None otherwise
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(_) => None,
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the sender
    pub role: Role,
    /// Content of the message
    pub content: MessageContent,
}

impl Message {
    /// Create a new user message with text content
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new assistant message with text content
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new user message with content blocks
    pub fn user_with_blocks(blocks: Vec<crate::client::ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create a new assistant message with content blocks
    pub fn assistant_with_blocks(blocks: Vec<crate::client::ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Get the text content if this is a text message
    pub fn as_text(&self) -> Option<&str> {
        self.content.as_text()
    }

    /// Get the character count of this message
    pub fn char_count(&self) -> usize {
        match &self.content {
            MessageContent::Text(text) => text.len(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .map(|b| match b {
                    crate::client::ContentBlock::Text { text } => text.len(),
                    crate::client::ContentBlock::ToolUse { .. } => 50, // Rough estimate
                    crate::client::ContentBlock::ToolResult { content, .. } => content.len(),
                })
                .sum(),
        }
    }
}

/// A conversation with the AI agent
///
/// The message list is append-only for the lifetime of a session except for
/// `clear`, which the `new` REPL command uses to reset history.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// System prompt
    pub system_prompt: Option<String>,
    /// Messages in the conversation
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create a new empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation with a system prompt
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(system_prompt.into()),
            messages: Vec::new(),
        }
    }

    /// Add a message to the conversation
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Add a user message
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::user(content));
    }

    /// Add an assistant message
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::assistant(content));
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Clear all messages (keeps system prompt)
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Get the total number of characters in the conversation
    pub fn total_chars(&self) -> usize {
        self.system_prompt.as_ref().map(|s| s.len()).unwrap_or(0)
            + self.messages.iter().map(|m| m.char_count()).sum::<usize>()
    }

    /// Get the number of messages in the conversation
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Truncate conversation to stay within a character limit, removing
    /// oldest messages while preserving recent context.
    ///
    /// A `tool_result` is only valid directly after the assistant message
    /// carrying its `tool_use`, so once the budget loop drops the assistant
    /// half of an exchange the surviving result at the head goes too.
    ///
    /// Returns the number of messages removed.
    pub fn truncate_to_limit(&mut self, max_chars: usize) -> usize {
        let system_chars = self.system_prompt.as_ref().map(|s| s.len()).unwrap_or(0);
        let mut current_chars: usize = self.messages.iter().map(|m| m.char_count()).sum();

        if current_chars + system_chars <= max_chars {
            return 0;
        }

        let mut removed_count = 0;
        let target_chars = max_chars.saturating_sub(system_chars);

        while current_chars > target_chars && !self.messages.is_empty() {
            if let Some(msg) = self.messages.first() {
                current_chars = current_chars.saturating_sub(msg.char_count());
            }
            self.messages.remove(0);
            removed_count += 1;
        }

        while self.head_is_orphaned_tool_result() {
            self.messages.remove(0);
            removed_count += 1;
        }

        removed_count
    }

    fn head_is_orphaned_tool_result(&self) -> bool {
        match self.messages.first() {
            Some(Message {
                role: Role::User,
                content: MessageContent::Blocks(blocks),
            }) => blocks
                .iter()
                .any(|b| matches!(b, crate::client::ContentBlock::ToolResult { .. })),
            _ => false,
        }
    }

    /// Ensure conversation stays within a token budget by truncating if
    /// needed. Uses a rough approximation of 4 characters per token.
    pub fn truncate_to_tokens(&mut self, max_tokens: usize) -> usize {
        let max_chars = max_tokens * 4;
        self.truncate_to_limit(max_chars)
    }
}
