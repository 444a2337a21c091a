//! Tool execution engine
//!
//! This module implements the execution logic for the tool surface. Internal
//! methods return structured errors; `ToolExecutor::execute` is the single
//! boundary where every failure is flattened into the text channel the model
//! consumes.

use super::{runner, ToolResult, ToolUse};
use cinder_core::config::FetchConfig;
use cinder_core::{diff, file_io};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Errors that can occur during tool execution
#[derive(Error, Debug)]
pub enum ToolError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File I/O error with a typed cause
    #[error("{0}")]
    FileIo(#[from] cinder_core::FileIoError),

    /// Invalid tool input
    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    /// Tool not found
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Source file to execute does not exist
    #[error("Error: File {} not found.", .0.display())]
    FileNotFound(PathBuf),

    /// Extension not covered by the language mapping
    #[error("Unsupported file extension {0}. Please specify language.")]
    UnsupportedExtension(String),

    /// Explicit language tag not recognized
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// URL fetch failure (status, timeout, transport)
    #[error("{0}")]
    Fetch(String),
}

/// Tool executor that can execute tool requests
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    /// Working directory relative paths resolve against
    working_directory: PathBuf,
    /// URL fetcher settings
    fetch: FetchConfig,
}

impl ToolExecutor {
    /// Create a new tool executor rooted at the current directory
    pub fn new() -> Self {
        Self {
            working_directory: std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from(".")),
            fetch: FetchConfig::default(),
        }
    }

    /// Create a tool executor with a specific working directory
    pub fn with_working_directory(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            fetch: FetchConfig::default(),
        }
    }

    /// Override the URL fetcher settings
    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// The working directory for this executor
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Execute a tool use request
    ///
    /// This is the tool boundary: every failure becomes a descriptive text
    /// result so the model can react to it in a follow-up turn.
    pub async fn execute(&self, tool_use: &ToolUse) -> ToolResult {
        let result = match tool_use.name.as_str() {
            "scan_directory" => self.execute_scan_directory(&tool_use.input).await,
            "read_file" => self.execute_read_file(&tool_use.input).await,
            "write_file" => self.execute_write_file(&tool_use.input).await,
            "generate_diff" => self.execute_generate_diff(&tool_use.input).await,
            "run_command" => self.execute_run_command(&tool_use.input).await,
            "execute_code" => self.execute_code(&tool_use.input).await,
            "fetch_url" => self.execute_fetch_url(&tool_use.input).await,
            unknown => Err(ToolError::ToolNotFound(unknown.to_string())),
        };

        match result {
            Ok(content) => ToolResult::success(tool_use.id.clone(), content),
            Err(e) => ToolResult::error(tool_use.id.clone(), e.to_string()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_directory.join(path)
        }
    }

    fn require_str<'a>(
        input: &'a serde_json::Value,
        field: &str,
    ) -> Result<&'a str, ToolError> {
        input[field]
            .as_str()
            .ok_or_else(|| ToolError::InvalidInput(format!("Missing {}", field)))
    }

    /// Recursively list every file under a directory
    async fn execute_scan_directory(
        &self,
        input: &serde_json::Value,
    ) -> Result<String, ToolError> {
        let path = Self::require_str(input, "path")?;
        let root = self.resolve(path);

        let files = file_io::list_files_recursive(&root)?;
        Ok(files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Read the full text content of a file
    async fn execute_read_file(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        let path = Self::require_str(input, "path")?;
        let contents = file_io::read_file(self.resolve(path))?;
        Ok(contents)
    }

    /// Overwrite a file with new content
    async fn execute_write_file(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        let path = Self::require_str(input, "path")?;
        let content = Self::require_str(input, "content")?;

        file_io::write_file(self.resolve(path), content)?;
        Ok(format!("Successfully wrote to {}", path))
    }

    /// Unified diff of a proposed change, for user review before write_file
    async fn execute_generate_diff(
        &self,
        input: &serde_json::Value,
    ) -> Result<String, ToolError> {
        let path = Self::require_str(input, "path")?;
        let new_content = Self::require_str(input, "new_content")?;

        let diff = diff::diff_against_file(self.resolve(path), new_content)?;
        Ok(diff)
    }

    /// Execute a command via the host shell, capturing both streams
    ///
    /// A non-zero exit is part of the payload, not a failure of the tool.
    async fn execute_run_command(
        &self,
        input: &serde_json::Value,
    ) -> Result<String, ToolError> {
        let command = Self::require_str(input, "command")?;

        let output = shell_output(command, &self.working_directory).await?;
        Ok(format!(
            "STDOUT:\n{}\nSTDERR:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ))
    }

    /// Compile (if needed) and run a source file
    async fn execute_code(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        let file_path = Self::require_str(input, "file_path")?;
        let language = input["language"].as_str();

        runner::execute_code(&self.resolve(file_path), language, &self.working_directory).await
    }

    /// Fetch a URL and return its visible text
    async fn execute_fetch_url(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        let url = Self::require_str(input, "url")?;

        let client = reqwest::Client::builder()
            .user_agent("Cinder/0.1 (coding assistant)")
            .timeout(std::time::Duration::from_secs(self.fetch.timeout_secs))
            .build()
            .map_err(|e| ToolError::Fetch(format!("Error fetching URL {}: {}", url, e)))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Fetch(format!("Error fetching URL {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Fetch(format!(
                "Error fetching URL {}: HTTP status {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::Fetch(format!("Error fetching URL {}: {}", url, e)))?;

        let mut text = extract_text(&body);
        if text.len() > self.fetch.max_chars {
            let cut = floor_char_boundary(&text, self.fetch.max_chars);
            text.truncate(cut);
            text.push_str("...(truncated)");
        }
        Ok(text)
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a command string through the host shell and capture its output
pub(crate) async fn shell_output(
    command: &str,
    cwd: &Path,
) -> std::io::Result<std::process::Output> {
    #[cfg(target_os = "windows")]
    let (shell, shell_arg) = ("cmd", "/C");

    #[cfg(not(target_os = "windows"))]
    let (shell, shell_arg) = ("sh", "-c");

    tokio::process::Command::new(shell)
        .arg(shell_arg)
        .arg(command)
        .current_dir(cwd)
        .output()
        .await
}

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>").expect("valid regex")
});

/// Best-effort HTML-to-text extraction
///
/// Strips script/style blocks and all tags, trims each line, splits
/// doubled-space runs into separate fragments, drops empties, and joins the
/// rest with newlines. No guarantee of preserving document structure beyond
/// depth-first text order.
pub(crate) fn extract_text(html: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(html, "");

    // Strip remaining tags, replacing each with a newline so adjacent
    // elements don't run together on one line.
    let mut stripped = String::with_capacity(without_blocks.len());
    let mut in_tag = false;
    for ch in without_blocks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                stripped.push('\n');
            }
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    let mut fragments = Vec::new();
    for line in stripped.lines() {
        for fragment in line.trim().split("  ") {
            let fragment = fragment.trim();
            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }
    }
    fragments.join("\n")
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut cut = index;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}
