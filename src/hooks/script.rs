use super::{HookError, PostDeployHook};
use crate::context::Context;
use duct::{cmd, Expression};
use duct_sh::sh_dangerous;
use log::{debug, trace, warn};

/// A hook running a user-defined command in the work directory.
///
/// By default the command is split into arguments and run directly. If it runs in a shell
/// (`/bin/sh` on *nix, `cmd.exe` on Windows), it can use variable expansion, pipes and
/// redirection. Both the stdout and stderr are captured. The context is passed as
/// environment variables prefixed with `DEPLOY_`.
pub struct ScriptHook {
    directory: String,
    command: String,
    runs_in_shell: bool,
}

impl ScriptHook {
    /// Creates a new hook to be started in the given directory.
    pub fn new(directory: String, command: String, runs_in_shell: bool) -> Self {
        ScriptHook {
            directory,
            command,
            runs_in_shell,
        }
    }

    fn create_command(&self) -> Result<Expression, HookError> {
        let command = &self.command;

        // We can run `sh_dangerous`, because the command comes from the user.
        if self.runs_in_shell {
            return Ok(sh_dangerous(command.as_str()));
        }

        // Test if the user might want to be in a shell (uses variables or pipes)
        let contains_variables = command
            .find('$')
            .and_then(|pos| command.chars().nth(pos + 1))
            .map(|ch| ch.is_ascii_alphabetic() || ch == '{')
            == Some(true);
        let contains_suspicious =
            command.contains(" | ") || command.contains(" && ") || command.contains(" || ");
        if contains_variables || contains_suspicious {
            warn!("The command {command:?} contains a variable or other shell-specific character: you might want to run it in a shell (-S).")
        }

        let split_args =
            shlex::split(command).ok_or_else(|| HookError::InvalidCommand(command.clone()))?;
        let (program, args) = split_args
            .split_first()
            .ok_or_else(|| HookError::InvalidCommand(command.clone()))?;

        let expression = cmd(program, args);
        trace!("Parsed {command:?} to {expression:?}.");

        Ok(expression)
    }

    fn run_inner(&self, context: &Context) -> Result<String, HookError> {
        let mut expression = self.create_command()?.env("CI", "true");
        for (key, value) in context {
            expression = expression.env(format!("DEPLOY_{key}"), value);
        }

        let output = expression
            .stderr_to_stdout()
            .stdout_capture()
            .dir(&self.directory)
            .unchecked()
            .run()?;

        let output_str =
            std::str::from_utf8(&output.stdout).map_err(|_| HookError::NonUtf8Return)?;
        let output_str = output_str.trim_end().to_string();

        if output.status.success() {
            Ok(output_str)
        } else {
            Err(HookError::NonZeroExitcode(
                output.status.code().unwrap_or(-1),
                output_str,
            ))
        }
    }
}

impl PostDeployHook for ScriptHook {
    /// Run the command and return its output. If the command fails to start, returns
    /// a non-zero error code or prints non-utf8 characters, this results in an error.
    fn run(&self, context: &Context) -> Result<String, HookError> {
        debug!(
            "Running post-deploy hook: {} in directory {}.",
            self.command, self.directory
        );

        self.run_inner(context)
    }
}
