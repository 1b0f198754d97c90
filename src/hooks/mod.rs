use crate::context::Context;
use mockall::automock;
use thiserror::Error;

/// A hook running a user-defined command.
pub mod script;

/// A custom error describing the error cases for the post-deploy hooks.
#[derive(Debug, Error)]
pub enum HookError {
    /// The command cannot be split into arguments (e.g. unclosed quotes).
    #[error("the command {0:?} cannot be parsed")]
    InvalidCommand(String),
    /// The underlying Rust command creation failed. The parameter contains the error.
    #[error("the hook cannot run: {0}")]
    HookFailure(#[from] std::io::Error),
    /// The hook returned a non-zero exit code. The parameters are the exit code and the failed output.
    #[error("the hook returned non-zero exit code {0} with message: {1}")]
    NonZeroExitcode(i32, String),
    /// The hook output contains non-UTF8 characters.
    #[error("the hook returned invalid characters")]
    NonUtf8Return,
    /// The hook failed for another reason, e.g. a closure hook reporting its own error.
    #[error("{0}")]
    Failed(String),
}

/// Something to run after the repository was updated, e.g. clearing caches or
/// migrating a database.
///
/// The hook returns its output, which is written to the deploy log.
#[automock]
pub trait PostDeployHook {
    fn run(&self, context: &Context) -> Result<String, HookError>;
}

/// A hook calling a closure, for using the deployment as a library.
pub struct FnHook<F>(pub F);

impl<F> PostDeployHook for FnHook<F>
where
    F: Fn(&Context) -> Result<String, HookError>,
{
    fn run(&self, context: &Context) -> Result<String, HookError> {
        (self.0)(context)
    }
}
