//! Tool definitions and execution for the agent loop
//!
//! This module defines the tools the model can invoke, their JSON argument
//! schemas, and the dispatch layer. Every tool returns a single text value
//! on both success and failure paths; the boundary never raises a
//! structured error outward.

mod executor;
pub mod runner;

pub use executor::{ToolError, ToolExecutor};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A tool the model can use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Name of the tool
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: JsonValue,
}

/// Tool use request from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUse {
    /// Unique ID for this tool use
    pub id: String,
    /// Name of the tool to use
    pub name: String,
    /// Input parameters for the tool
    pub input: JsonValue,
}

/// Result of executing a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool use this is responding to
    pub tool_use_id: String,
    /// Content of the result
    pub content: String,
    /// Whether the tool execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(tool_use_id: String, content: String) -> Self {
        Self {
            tool_use_id,
            content,
            is_error: None,
        }
    }

    /// Create an error tool result
    pub fn error(tool_use_id: String, error_message: String) -> Self {
        Self {
            tool_use_id,
            content: error_message,
            is_error: Some(true),
        }
    }
}

/// Create the scan_directory tool definition
pub fn scan_directory_tool() -> Tool {
    Tool {
        name: "scan_directory".to_string(),
        description: "Scan a directory recursively and list all files under it.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory to scan"
                }
            },
            "required": ["path"]
        }),
    }
}

/// Create the read_file tool definition
pub fn read_file_tool() -> Tool {
    Tool {
        name: "read_file".to_string(),
        description: "Read the full text content of a file.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file to read"
                }
            },
            "required": ["path"]
        }),
    }
}

/// Create the write_file tool definition
pub fn write_file_tool() -> Tool {
    Tool {
        name: "write_file".to_string(),
        description: "Write content to a file, creating it if absent or overwriting it. \
                      Use this ONLY after the user has confirmed the diff."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "The full content to write to the file"
                }
            },
            "required": ["path", "content"]
        }),
    }
}

/// Create the generate_diff tool definition
pub fn generate_diff_tool() -> Tool {
    Tool {
        name: "generate_diff".to_string(),
        description: "Generate a unified diff between the current contents of a file and a \
                      proposed new content string, for the user to review before writing."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path of the file the change targets"
                },
                "new_content": {
                    "type": "string",
                    "description": "The proposed new file content"
                }
            },
            "required": ["path", "new_content"]
        }),
    }
}

/// Create the run_command tool definition
pub fn run_command_tool() -> Tool {
    Tool {
        name: "run_command".to_string(),
        description: "Execute a system command via the host shell and return its stdout and \
                      stderr."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The command to execute"
                }
            },
            "required": ["command"]
        }),
    }
}

/// Create the execute_code tool definition
pub fn execute_code_tool() -> Tool {
    Tool {
        name: "execute_code".to_string(),
        description: "Compile and execute a source file based on its extension or an explicit \
                      language. Supported languages: python, cpp, c, go, javascript. Useful \
                      for debugging or verifying code."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the source file to run"
                },
                "language": {
                    "type": "string",
                    "description": "Optional explicit language, overriding extension inference"
                }
            },
            "required": ["file_path"]
        }),
    }
}

/// Create the fetch_url tool definition
pub fn fetch_url_tool() -> Tool {
    Tool {
        name: "fetch_url".to_string(),
        description: "Fetch a URL and return its visible text with markup stripped.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to fetch"
                }
            },
            "required": ["url"]
        }),
    }
}

/// Get all available tools
pub fn all_tools() -> Vec<Tool> {
    vec![
        scan_directory_tool(),
        read_file_tool(),
        write_file_tool(),
        generate_diff_tool(),
        run_command_tool(),
        execute_code_tool(),
        fetch_url_tool(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_serialization() {
        let tool = read_file_tool();
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("read_file"));
        assert!(json.contains("path"));
    }

    #[test]
    fn test_tool_use_serialization() {
        let tool_use = ToolUse {
            id: "toolu_123".to_string(),
            name: "read_file".to_string(),
            input: serde_json::json!({"path": "/tmp/test.txt"}),
        };

        let json = serde_json::to_string(&tool_use).unwrap();
        assert!(json.contains("toolu_123"));
        assert!(json.contains("/tmp/test.txt"));
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("toolu_123".to_string(), "File contents".to_string());

        assert_eq!(result.tool_use_id, "toolu_123");
        assert_eq!(result.content, "File contents");
        assert_eq!(result.is_error, None);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("toolu_123".to_string(), "File not found".to_string());

        assert_eq!(result.tool_use_id, "toolu_123");
        assert_eq!(result.content, "File not found");
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_all_tools() {
        let tools = all_tools();
        assert_eq!(tools.len(), 7);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert!(tool_names.contains(&"scan_directory"));
        assert!(tool_names.contains(&"read_file"));
        assert!(tool_names.contains(&"write_file"));
        assert!(tool_names.contains(&"generate_diff"));
        assert!(tool_names.contains(&"run_command"));
        assert!(tool_names.contains(&"execute_code"));
        assert!(tool_names.contains(&"fetch_url"));
    }

    #[test]
    fn test_execute_code_schema() {
        let tool = execute_code_tool();
        let schema = tool.input_schema;
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["file_path"].is_object());
        assert!(schema["properties"]["language"].is_object());
        // language is optional
        assert_eq!(schema["required"].as_array().unwrap().len(), 1);
        assert_eq!(schema["required"][0], "file_path");
    }

    #[test]
    fn test_write_file_schema() {
        let tool = write_file_tool();
        assert!(tool.description.contains("confirmed the diff"));

        let schema = tool.input_schema;
        assert!(schema["properties"]["path"].is_object());
        assert!(schema["properties"]["content"].is_object());
        assert_eq!(schema["required"].as_array().unwrap().len(), 2);
    }
}
