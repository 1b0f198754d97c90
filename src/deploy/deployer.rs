use super::{DeployConfig, DeployError, DeployResult, DeploymentRunner};
use crate::{
    context::Context,
    git::command::GitCommand,
    hooks::script::ScriptHook,
    journal::{file::FileSink, Journal, LogSink},
    start::Deploy,
};
use log::warn;
use time::UtcOffset;

/// Deploys the configured repository every time it is triggered.
///
/// Every call builds a fresh [DeploymentRunner] with git, the deploy log and the
/// optional post-deploy command, runs it once and drops it.
pub struct Deployer {
    config: DeployConfig,
    post_deploy: Option<String>,
    runs_in_shell: bool,
    offset: UtcOffset,
}

impl Deployer {
    /// Create a new deployer. The offset is used for the timestamps of the deploy log.
    pub fn new(config: DeployConfig, offset: UtcOffset) -> Self {
        Deployer {
            config,
            post_deploy: None,
            runs_in_shell: false,
            offset,
        }
    }

    /// Run a command in the work directory after every successful update.
    pub fn with_post_deploy(mut self, command: String, runs_in_shell: bool) -> Self {
        self.post_deploy = Some(command);
        self.runs_in_shell = runs_in_shell;
        self
    }

    /// Check the configuration before anything is triggered.
    pub fn validate(&self) -> Result<(), DeployError> {
        self.config.resolve()?;
        Journal::new(None, &self.config.date_format, self.offset)?;
        Ok(())
    }

    fn create_journal(&self) -> Result<Journal, DeployError> {
        let sink = match &self.config.log_target {
            Some(target) => match FileSink::open(target) {
                Ok(sink) => Some(Box::new(sink) as Box<dyn LogSink>),
                Err(err) => {
                    warn!(
                        "Cannot open deploy log {}, continuing without it: {err}.",
                        target.display()
                    );
                    None
                }
            },
            None => None,
        };

        Ok(Journal::new(sink, &self.config.date_format, self.offset)?)
    }
}

impl Deploy for Deployer {
    fn deploy(&mut self, context: &Context) -> DeployResult {
        let git = GitCommand::new(self.config.git_binary_path.clone(), self.config.timeout);
        let journal = self.create_journal()?;

        let mut runner = DeploymentRunner::new(self.config.clone(), Box::new(git), journal)?
            .with_context(context.clone());
        if let Some(command) = &self.post_deploy {
            let directory = runner.work_dir().display().to_string();
            runner = runner.with_post_deploy(Box::new(ScriptHook::new(
                directory,
                command.clone(),
                self.runs_in_shell,
            )));
        }

        runner.execute()
    }
}
