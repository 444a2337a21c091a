//! Build-and-run engine for the execute_code tool
//!
//! Given a source file and an optional explicit language, this module
//! resolves the toolchain, compiles when required, runs the program, and
//! removes the transient binary artifact. Compile failures short-circuit:
//! the run step is never attempted.

use super::executor::{shell_output, ToolError};
use cinder_core::file_io;
use std::path::{Path, PathBuf};

/// Languages the runner knows how to build and execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    C,
    Cpp,
    Go,
    JavaScript,
}

impl Language {
    /// Parse an explicit language tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "python" => Some(Language::Python),
            "c" => Some(Language::C),
            "cpp" | "c++" => Some(Language::Cpp),
            "go" => Some(Language::Go),
            "javascript" | "js" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Infer a language from a lowercase file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Language::Python),
            "c" => Some(Language::C),
            "cpp" | "cc" | "cxx" => Some(Language::Cpp),
            "go" => Some(Language::Go),
            "js" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Whether this language needs a separate compile step
    pub fn needs_compile(&self) -> bool {
        matches!(self, Language::C | Language::Cpp)
    }

    fn compiler(&self) -> Option<&'static str> {
        match self {
            Language::C => Some("gcc"),
            Language::Cpp => Some("g++"),
            _ => None,
        }
    }
}

/// The commands a single execute_code invocation will run
///
/// The artifact path is computed here, up front and unconditionally for
/// compiled languages, so cleanup does not depend on which step failed.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Compile command, for compiled languages only
    pub compile: Option<String>,
    /// Run command (interpreter invocation or compiled artifact)
    pub run: String,
    /// Transient binary produced by the compile step
    pub artifact: Option<PathBuf>,
}

impl RunPlan {
    /// Build the command plan for a language and source path
    pub fn new(language: Language, source: &Path) -> Self {
        match language {
            Language::Python => Self::interpreted(format!("python3 {}", source.display())),
            Language::JavaScript => Self::interpreted(format!("node {}", source.display())),
            Language::Go => Self::interpreted(format!("go run {}", source.display())),
            Language::C | Language::Cpp => {
                let artifact = artifact_path(source);
                let compiler = language.compiler().unwrap_or("gcc");
                Self {
                    compile: Some(format!(
                        "{} {} -o {}",
                        compiler,
                        source.display(),
                        artifact.display()
                    )),
                    run: artifact_invocation(&artifact),
                    artifact: Some(artifact),
                }
            }
        }
    }

    fn interpreted(run: String) -> Self {
        Self {
            compile: None,
            run,
            artifact: None,
        }
    }
}

/// Derive the transient binary path: source path plus a fixed suffix
fn artifact_path(source: &Path) -> PathBuf {
    PathBuf::from(format!("{}.out", source.display()))
}

/// Shell invocation for the artifact; relative paths get a `./` prefix
fn artifact_invocation(artifact: &Path) -> String {
    if artifact.is_absolute() {
        artifact.display().to_string()
    } else {
        format!("./{}", artifact.display())
    }
}

/// Compile (if needed) and run a source file, reporting every command that
/// was actually executed followed by the run step's output.
pub async fn execute_code(
    path: &Path,
    language: Option<&str>,
    cwd: &Path,
) -> Result<String, ToolError> {
    if !path.exists() {
        return Err(ToolError::FileNotFound(path.to_path_buf()));
    }

    // An explicit tag always overrides extension inference.
    let language = match language {
        Some(tag) => {
            Language::from_tag(tag).ok_or_else(|| ToolError::UnsupportedLanguage(tag.to_string()))?
        }
        None => {
            let ext = file_io::get_extension(path)
                .ok_or_else(|| ToolError::UnsupportedExtension("(none)".to_string()))?;
            Language::from_extension(&ext)
                .ok_or_else(|| ToolError::UnsupportedExtension(format!(".{}", ext)))?
        }
    };

    let plan = RunPlan::new(language, path);
    let mut executed = Vec::new();

    if let Some(compile_cmd) = &plan.compile {
        executed.push(compile_cmd.clone());
        tracing::debug!(command = %compile_cmd, "compiling");

        let output = shell_output(compile_cmd, cwd).await?;
        if !output.status.success() {
            // The run step is never attempted after a failed compile.
            return Ok(format!(
                "Executed: {}\nCompilation Error:\n{}",
                compile_cmd,
                String::from_utf8_lossy(&output.stderr)
            ));
        }
    }

    executed.push(plan.run.clone());
    tracing::debug!(command = %plan.run, "running");
    let run_result = shell_output(&plan.run, cwd).await;

    // Delete the artifact whether or not the run step succeeded, so repeated
    // invocations on the same source never accumulate binaries. Removal is
    // idempotent: a missing artifact is not an error.
    if let Some(artifact) = &plan.artifact {
        if let Err(e) = std::fs::remove_file(artifact) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(artifact = %artifact.display(), error = %e, "artifact cleanup failed");
            }
        }
    }

    let output = run_result?;
    let command_log = executed
        .iter()
        .map(|c| format!("Executed: {}", c))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "{}\nSTDOUT:\n{}\nSTDERR:\n{}",
        command_log,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("c"), Some(Language::C));
        assert_eq!(Language::from_extension("cpp"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("cc"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("cxx"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("go"), Some(Language::Go));
        assert_eq!(Language::from_extension("js"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("rb"), None);
    }

    #[test]
    fn test_language_from_tag_case_insensitive() {
        assert_eq!(Language::from_tag("Python"), Some(Language::Python));
        assert_eq!(Language::from_tag("CPP"), Some(Language::Cpp));
        assert_eq!(Language::from_tag("brainfuck"), None);
    }

    #[test]
    fn test_run_plan_for_compiled_language() {
        let plan = RunPlan::new(Language::C, Path::new("/tmp/b.c"));
        assert_eq!(
            plan.compile.as_deref(),
            Some("gcc /tmp/b.c -o /tmp/b.c.out")
        );
        assert_eq!(plan.run, "/tmp/b.c.out");
        assert_eq!(plan.artifact, Some(PathBuf::from("/tmp/b.c.out")));
    }

    #[test]
    fn test_run_plan_relative_artifact_gets_dot_slash() {
        let plan = RunPlan::new(Language::Cpp, Path::new("b.cpp"));
        assert_eq!(plan.run, "./b.cpp.out");
    }

    #[test]
    fn test_run_plan_for_interpreted_language() {
        let plan = RunPlan::new(Language::Python, Path::new("/tmp/a.py"));
        assert!(plan.compile.is_none());
        assert!(plan.artifact.is_none());
        assert_eq!(plan.run, "python3 /tmp/a.py");
    }

    #[tokio::test]
    async fn test_python_inferred_from_extension() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.py");
        cinder_core::file_io::write_file(&source, "print(\"hi\")\n").unwrap();

        let report = execute_code(&source, None, dir.path()).await.unwrap();
        assert!(report.contains("hi"));
        assert!(report.contains("Executed: python3"));
        // No compile step for interpreted languages
        assert!(!report.contains("gcc"));
        assert!(!report.contains("g++"));
    }

    #[tokio::test]
    async fn test_missing_file_is_terminal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("ghost.py");

        let err = execute_code(&missing, None, dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.rb");
        cinder_core::file_io::write_file(&source, "puts 'hi'\n").unwrap();

        let err = execute_code(&source, None, dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[tokio::test]
    async fn test_explicit_language_overrides_extension() {
        let dir = TempDir::new().unwrap();
        // A .txt file the extension map knows nothing about
        let source = dir.path().join("script.txt");
        cinder_core::file_io::write_file(&source, "print(\"override\")\n").unwrap();

        let report = execute_code(&source, Some("python"), dir.path())
            .await
            .unwrap();
        assert!(report.contains("override"));
    }

    #[tokio::test]
    async fn test_unsupported_language_tag() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.py");
        cinder_core::file_io::write_file(&source, "print(1)\n").unwrap();

        let err = execute_code(&source, Some("fortran"), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported language"));
    }

    #[tokio::test]
    async fn test_c_compile_error_skips_run_and_reports_diagnostics() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("b.c");
        // Missing semicolon
        cinder_core::file_io::write_file(
            &source,
            "#include <stdio.h>\nint main(void) { printf(\"hi\\n\")\nreturn 0; }\n",
        )
        .unwrap();

        let report = execute_code(&source, None, dir.path()).await.unwrap();
        assert!(report.contains("Compilation Error"));
        assert!(report.contains("Executed: gcc"));
        // The run command never appears in the report
        assert!(!report.contains("b.c.out\nSTDOUT"));
        assert!(!report.contains("STDOUT:"));

        // No artifact left behind
        let listing = cinder_core::file_io::list_files_recursive(dir.path()).unwrap();
        assert!(listing.iter().all(|p| !p.to_string_lossy().contains("b.c.out")));
    }

    #[tokio::test]
    async fn test_c_success_leaves_no_artifact() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("ok.c");
        cinder_core::file_io::write_file(
            &source,
            "#include <stdio.h>\nint main(void) { printf(\"built\\n\"); return 0; }\n",
        )
        .unwrap();

        let report = execute_code(&source, None, dir.path()).await.unwrap();
        assert!(report.contains("Executed: gcc"));
        assert!(report.contains("built"));

        assert!(!source.with_extension("c.out").exists());
        let listing = cinder_core::file_io::list_files_recursive(dir.path()).unwrap();
        assert_eq!(listing.len(), 1, "only the source should remain: {:?}", listing);
    }

    #[tokio::test]
    async fn test_c_nonzero_exit_still_cleans_artifact() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("fail.c");
        cinder_core::file_io::write_file(
            &source,
            "int main(void) { return 7; }\n",
        )
        .unwrap();

        let report = execute_code(&source, None, dir.path()).await.unwrap();
        // A non-zero program exit is payload, not a tool failure
        assert!(report.contains("STDOUT:"));

        let listing = cinder_core::file_io::list_files_recursive(dir.path()).unwrap();
        assert_eq!(listing.len(), 1);
    }
}
