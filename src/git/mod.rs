use mockall::automock;
use std::path::PathBuf;
use thiserror::Error;

/// Run git as a child process.
pub mod command;

/// A custom error describing the error cases for running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The underlying Rust command creation failed. The parameter contains the error.
    #[error("git cannot run: {0}")]
    CommandFailure(#[from] std::io::Error),
    /// The git process did not finish in the given time and it was killed.
    #[error("git did not finish in {0}, it was killed")]
    TimedOut(String),
}

/// The arguments and the working directory of one git call.
///
/// The arguments are passed directly to the process, they never go through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitInvocation {
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl GitInvocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GitInvocation {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The git subcommand (e.g. `fetch`), which is the first argument that is not a global option.
    pub fn subcommand(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|arg| !arg.starts_with('-'))
    }
}

/// The result of a finished git process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Standard output and standard error combined.
    pub output: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        CommandOutput {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The output on a single line, with the lines trimmed and joined by spaces.
    pub fn summary(&self) -> String {
        self.output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Something that can run git commands and report their output and exit code.
///
/// The deployment only talks to git through this trait, so it can be replaced in tests.
#[automock]
pub trait GitRunner {
    /// Run git with the given arguments and wait for it to finish.
    fn run(&self, invocation: &GitInvocation) -> Result<CommandOutput, GitError>;
}
