//! Terminal rendering for agent events

use cinder_agent::AgentEvent;

/// Longest tool result shown in full before display truncation kicks in
const DISPLAY_LIMIT: usize = 200;

/// Format one agent event for the terminal.
///
/// Tool results are truncated for display only; the model always sees the
/// full content.
pub fn render_event(event: &AgentEvent) -> String {
    match event {
        AgentEvent::Text(text) => format!("{}\n", text),
        AgentEvent::ToolCall { name, input, .. } => {
            format!("\n[Tool: {} {}]\n", name, compact_input(input))
        }
        AgentEvent::ToolResult {
            content, is_error, ..
        } => {
            let prefix = if *is_error { "✗ Error" } else { "✓ Result" };
            format!("[{}: {}]\n", prefix, clip(content, DISPLAY_LIMIT))
        }
        AgentEvent::HistoryTruncated { removed } => {
            format!("[Dropped {} old messages to stay within context]\n", removed)
        }
    }
}

/// One-line rendering of a tool's JSON input
fn compact_input(input: &serde_json::Value) -> String {
    let rendered = input.to_string();
    clip(&rendered, 120)
}

/// Clip a string for display at a character boundary
fn clip(s: &str, limit: usize) -> String {
    if s.len() <= limit {
        return s.to_string();
    }
    let mut cut = limit;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... ({} chars)", &s[..cut], s.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_result_shown_in_full() {
        let event = AgentEvent::ToolResult {
            tool_use_id: "toolu_1".to_string(),
            content: "ok".to_string(),
            is_error: false,
        };
        let rendered = render_event(&event);
        assert_eq!(rendered, "[✓ Result: ok]\n");
    }

    #[test]
    fn test_long_result_is_clipped_with_length() {
        let event = AgentEvent::ToolResult {
            tool_use_id: "toolu_1".to_string(),
            content: "x".repeat(500),
            is_error: false,
        };
        let rendered = render_event(&event);
        assert!(rendered.contains("... (500 chars)"));
        assert!(rendered.len() < 300);
    }

    #[test]
    fn test_error_result_prefix() {
        let event = AgentEvent::ToolResult {
            tool_use_id: "toolu_1".to_string(),
            content: "Error: File a.txt not found.".to_string(),
            is_error: true,
        };
        assert!(render_event(&event).starts_with("[✗ Error:"));
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        let s = "é".repeat(300);
        let clipped = clip(&s, 201); // lands mid-codepoint for 2-byte chars
        assert!(clipped.contains("... (300 chars)"));
    }

    #[test]
    fn test_clip_reports_characters_not_bytes() {
        // 300 two-byte characters: 600 bytes, 300 chars
        let s = "é".repeat(300);
        let clipped = clip(&s, 200);
        assert!(clipped.ends_with("(300 chars)"));
        assert!(!clipped.contains("600"));
    }

    #[test]
    fn test_tool_call_shows_name_and_input() {
        let event = AgentEvent::ToolCall {
            id: "toolu_1".to_string(),
            name: "read_file".to_string(),
            input: serde_json::json!({"path": "src/main.rs"}),
        };
        let rendered = render_event(&event);
        assert!(rendered.contains("read_file"));
        assert!(rendered.contains("src/main.rs"));
    }
}
