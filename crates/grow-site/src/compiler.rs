//! External markdown compiler boundary.
//!
//! The [`Compiler`] trait is the seam between the page pipeline and whatever
//! turns markdown into markup. [`CommandCompiler`] runs an external program as
//! `<program> [args...] <relative-path>` from the content root and reports its
//! exit status and captured output without interpreting them.
//!
//! The external compiler is trusted: there is no timeout, no output limit and
//! no sandboxing. A hanging compiler blocks the calling thread.

use std::path::PathBuf;
use std::process::Command;

use crate::node::PathNode;

/// Outcome of one compiler run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileResult {
    /// Process exit status. `-1` when the process ended without one (signal).
    pub status: i32,
    /// Standard output, decoded as UTF-8 (lossy).
    pub stdout: String,
    /// Standard error, decoded as UTF-8 (lossy).
    pub stderr: String,
}

impl CompileResult {
    /// Whether the compiler exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Compiler invocation error.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler process could not be started.
    #[error("Failed to run markdown compiler `{program}`: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Compiles a markdown file node.
pub trait Compiler: Send + Sync {
    /// Compile `file`, which must be a [`NodeKind::File`](crate::NodeKind::File) node.
    ///
    /// A nonzero exit is reported through [`CompileResult::status`], not as an error.
    fn compile(&self, file: &PathNode) -> Result<CompileResult, CompileError>;
}

/// Runs an external program for each compile.
#[derive(Clone, Debug)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
}

impl CommandCompiler {
    /// Create a compiler running `program` from `work_dir`.
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: work_dir.into(),
        }
    }

    /// Fixed arguments placed before the file path.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Compiler for CommandCompiler {
    fn compile(&self, file: &PathNode) -> Result<CompileResult, CompileError> {
        debug_assert!(file.is_file(), "compile called with directory node {file}");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file.to_relative_path())
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| CompileError::Unavailable {
                program: self.program.clone(),
                source,
            })?;

        let result = CompileResult {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            program = %self.program,
            file = %file,
            status = result.status,
            stdout_len = result.stdout.len(),
            "Compiler finished"
        );

        Ok(result)
    }
}
