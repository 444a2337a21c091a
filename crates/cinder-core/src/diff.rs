//! Unified diff generation for Cinder
//!
//! Diffs are advisory output for human review of a proposed write; they are
//! never parsed back or applied programmatically. The actual write uses the
//! full new content.

use crate::file_io;
use std::path::Path;

/// Produce a unified diff between `old` and `new`, labeled `a/<path>` and
/// `b/<path>`. Identical inputs yield an empty string.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let diff = similar::TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}

/// Diff a proposed content string against the current contents of a file.
/// A nonexistent file is treated as empty prior content, not an error, so
/// the diff of a new file contains only additions.
pub fn diff_against_file<P: AsRef<Path>>(
    path: P,
    new_content: &str,
) -> Result<String, file_io::FileIoError> {
    let path = path.as_ref();
    let old_content = if path.exists() {
        file_io::read_file(path)?
    } else {
        String::new()
    };

    Ok(unified_diff(
        &path.display().to_string(),
        &old_content,
        new_content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_yields_empty_diff() {
        let diff = unified_diff("a.txt", "same\ncontent\n", "same\ncontent\n");
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_labels() {
        let diff = unified_diff("src/main.rs", "old\n", "new\n");
        assert!(diff.contains("a/src/main.rs"));
        assert!(diff.contains("b/src/main.rs"));
    }

    #[test]
    fn test_diff_marks_additions_and_removals() {
        let diff = unified_diff("a.txt", "keep\nold line\n", "keep\nnew line\n");
        assert!(diff.contains("-old line"));
        assert!(diff.contains("+new line"));
        assert!(diff.contains(" keep"));
    }

    #[test]
    fn test_diff_against_missing_file_is_additions_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("does_not_exist.txt");

        let diff = diff_against_file(&path, "line one\nline two\n").unwrap();
        assert!(diff.contains("+line one"));
        assert!(diff.contains("+line two"));

        // Every content line is an addition; nothing was removed
        for line in diff.lines() {
            if line.starts_with('-') && !line.starts_with("---") {
                panic!("unexpected removal in diff of new file: {}", line);
            }
        }
    }

    #[test]
    fn test_diff_against_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.txt");
        crate::file_io::write_file(&path, "Hello\nWorld").unwrap();

        let diff = diff_against_file(&path, "Hello\nWorld\nModified").unwrap();
        assert!(diff.contains("+Modified"));
    }

    #[test]
    fn test_diff_against_unchanged_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("same.txt");
        crate::file_io::write_file(&path, "stable\n").unwrap();

        let diff = diff_against_file(&path, "stable\n").unwrap();
        assert!(diff.is_empty());
    }
}
