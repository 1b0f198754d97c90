use super::{CommandOutput, GitError, GitInvocation, GitRunner};
use duct::{cmd, Handle};
use duration_string::DurationString;
use log::{trace, warn};
use std::{
    process::Output,
    thread::sleep,
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run git as a child process.
///
/// The arguments are passed without a shell, the standard error is merged into the
/// standard output. Git is never allowed to prompt for credentials, because there is
/// nobody to answer. If a timeout is given, the process is killed after it elapses.
pub struct GitCommand {
    binary: String,
    timeout: Option<Duration>,
}

impl GitCommand {
    /// Create a new command with the path to the git binary (e.g. "git" or "/usr/bin/git").
    pub fn new(binary: String, timeout: Option<Duration>) -> Self {
        GitCommand { binary, timeout }
    }

    fn wait<'a>(&self, handle: &'a Handle) -> Result<&'a Output, GitError> {
        let Some(timeout) = self.timeout else {
            return Ok(handle.wait()?);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(output) = handle.try_wait()? {
                return Ok(output);
            }
            if Instant::now() >= deadline {
                let timeout = DurationString::new(timeout).to_string();
                warn!("Git did not finish in {timeout}, killing it.");
                handle.kill()?;
                return Err(GitError::TimedOut(timeout));
            }
            sleep(POLL_INTERVAL);
        }
    }
}

impl GitRunner for GitCommand {
    fn run(&self, invocation: &GitInvocation) -> Result<CommandOutput, GitError> {
        trace!("Running {} {:?}.", self.binary, invocation.args);

        let mut expression = cmd(self.binary.as_str(), &invocation.args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked();
        if let Some(cwd) = &invocation.cwd {
            expression = expression.dir(cwd);
        }

        let handle = expression.start()?;
        let output = self.wait(&handle)?;

        let result = CommandOutput::new(
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout).trim_end(),
        );
        trace!("Git returned {}: {}.", result.exit_code, result.output);

        Ok(result)
    }
}
