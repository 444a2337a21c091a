//! Cinder Agent - the model-facing half of the Cinder coding assistant
//!
//! This crate provides:
//! - An Anthropic Messages API client with tool-use support
//! - Conversation management (rolling history, reset, truncation)
//! - The tool surface the model can call (scan, read, write, diff, shell,
//!   compile-and-run, URL fetch)
//! - The agent loop that drives tool dispatch and emits render events

pub mod agent;
pub mod client;
pub mod conversation;
pub mod tools;

pub use agent::{Agent, AgentError, AgentEvent};
pub use client::{AnthropicClient, ClientError, ContentBlock};
pub use conversation::{Conversation, Message, MessageContent, Role};
pub use tools::{all_tools, Tool, ToolExecutor, ToolResult, ToolUse};

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, anyhow::Error>;
