use crate::{
    context::Context,
    git::{CommandOutput, GitError, GitInvocation, GitRunner},
    hooks::PostDeployHook,
    journal::{Journal, JournalError},
};
use duration_string::DurationString;
use std::{
    path::{Path, PathBuf},
    thread::sleep,
    time::{Duration, Instant},
};
use thiserror::Error;

/// The configuration of a deployment.
pub mod config;
/// The deployment started from the main loop.
pub mod deployer;
/// An exclusive lock for deploying a repository.
pub mod lock;

pub use config::{DeployConfig, DeployMode};
use lock::DeployLock;

/// The minimum time between starting the deployment and updating the submodules.
pub const SUBMODULE_DELAY: Duration = Duration::from_secs(2);

/// A custom error describing the error cases for the deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The deployment cannot start, because it has a misconfiguration (e.g. the directory doesn't exist).
    #[error("not configured correctly: {0}")]
    Misconfigured(String),
    /// Fetching from the remote returned a non-zero exit code. The parameter is the output.
    #[error("cannot fetch changes: {0}")]
    FetchFailed(String),
    /// Pulling into the work directory returned a non-zero exit code. The parameter is the output.
    #[error("cannot pull changes: {0}")]
    PullFailed(String),
    /// Checking out the branch returned a non-zero exit code. The parameter is the output.
    #[error("cannot check out changes: {0}")]
    CheckoutFailed(String),
    /// Git could not be started or did not finish in time.
    #[error("{0}")]
    CommandFailed(#[from] GitError),
    /// The deployment lock cannot be taken. The parameters are the lock file and the reason.
    #[error("cannot lock {0}: {1}")]
    LockFailed(String, std::io::Error),
}

impl From<JournalError> for DeployError {
    fn from(value: JournalError) -> Self {
        DeployError::Misconfigured(value.to_string())
    }
}

/// The outcome of one deployment.
pub type DeployResult = Result<(), DeployError>;

/// Updates the work directory from the remote repository and writes every step to the journal.
///
/// The steps are run one after the other: an optional reset, fetch, pull or checkout (depending
/// on the [DeployMode]), an optional submodule update and an optional post-deploy hook.
/// Failing to fetch, pull or check out stops the deployment. A failing reset, submodule update
/// or hook is only written to the journal, the deployment still continues.
pub struct DeploymentRunner {
    config: DeployConfig,
    git_dir: PathBuf,
    work_dir: PathBuf,
    mode: DeployMode,
    git: Box<dyn GitRunner>,
    journal: Journal,
    post_deploy: Option<Box<dyn PostDeployHook>>,
    context: Context,
}

impl DeploymentRunner {
    /// Resolve the directories and decide how to deploy. It doesn't run git yet.
    pub fn new(
        config: DeployConfig,
        git: Box<dyn GitRunner>,
        mut journal: Journal,
    ) -> Result<Self, DeployError> {
        let resolved = config.resolve()?;

        journal.info("Attempting deployment...");
        journal.info(format!("Git Directory: {}", resolved.git_dir.display()));
        journal.info(format!("Work Directory: {}", resolved.work_dir.display()));

        Ok(DeploymentRunner {
            config,
            git_dir: resolved.git_dir,
            work_dir: resolved.work_dir,
            mode: resolved.mode,
            git,
            journal,
            post_deploy: None,
            context: Context::new(),
        })
    }

    /// Run the hook after the work directory was updated.
    pub fn with_post_deploy(mut self, hook: Box<dyn PostDeployHook>) -> Self {
        self.post_deploy = Some(hook);
        self
    }

    /// Add data (e.g. from the trigger) to the context passed to the hook.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context.extend(context);
        self
    }

    pub fn mode(&self) -> DeployMode {
        self.mode
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run the deployment once. The result is also written to the journal.
    pub fn execute(&mut self) -> DeployResult {
        match self.execute_inner() {
            Ok(()) => {
                self.journal.info("Deployment successful.");
                Ok(())
            }
            Err(err) => {
                self.journal.error(err.to_string());
                Err(err)
            }
        }
    }

    fn execute_inner(&mut self) -> DeployResult {
        let _lock = DeployLock::acquire(&self.git_dir)?;
        let started_at = Instant::now();

        // Discard any changes to tracked files since our last deploy
        if self.config.reset {
            match self.git(&["reset", "--hard", "HEAD"]) {
                Ok(output) => self
                    .journal
                    .info(format!("Resetting repository... {}", output.summary())),
                Err(err) => self
                    .journal
                    .error(format!("Resetting repository failed: {err}")),
            }
        }

        let remote = self.config.remote.clone();
        let output = self.git(&["fetch", remote.as_str()])?;
        if !output.success() {
            return Err(DeployError::FetchFailed(output.summary()));
        }
        self.journal
            .info(format!("Fetching changes... {}", output.summary()));

        match self.mode {
            DeployMode::Pull => {
                let output = self.git(&["pull"])?;
                if !output.success() {
                    return Err(DeployError::PullFailed(output.summary()));
                }
                self.journal
                    .info(format!("Pulling changes to directory... {}", output.summary()));
            }
            DeployMode::CheckoutForce => {
                let branch = self.config.branch.clone();
                let output = self.git(&["checkout", "-f", branch.as_str()])?;
                if !output.success() {
                    return Err(DeployError::CheckoutFailed(output.summary()));
                }
                self.journal.info(format!(
                    "Checking out changes to work directory... {}",
                    output.summary()
                ));
            }
        }

        if self.config.sync_submodules {
            self.update_submodules(started_at);
        }

        if let Some(hook) = &self.post_deploy {
            match hook.run(&self.hook_context()) {
                Ok(output) => self
                    .journal
                    .info(format!("Running post-deploy hook... {output}")),
                Err(err) => self.journal.error(format!("Post-deploy hook failed: {err}")),
            }
        }

        Ok(())
    }

    fn update_submodules(&mut self, started_at: Instant) {
        // Give the main fetch some time before the submodules are fetched
        let elapsed = started_at.elapsed();
        if elapsed < SUBMODULE_DELAY {
            let remaining = SUBMODULE_DELAY - elapsed;
            self.journal.info(format!(
                "Waiting {} before updating submodules.",
                DurationString::new(remaining)
            ));
            sleep(remaining);
        }

        match self.git(&["submodule", "update", "--init", "--recursive", "--remote"]) {
            Ok(output) if output.success() => self
                .journal
                .info(format!("Updating submodules... {}", output.summary())),
            Ok(output) => self
                .journal
                .error(format!("Updating submodules failed: {}", output.summary())),
            Err(err) => self.journal.error(format!("Updating submodules failed: {err}")),
        }
    }

    fn hook_context(&self) -> Context {
        let mut context = self.context.clone();
        context.insert(
            "GIT_DIR".to_string(),
            self.git_dir.display().to_string(),
        );
        context.insert(
            "WORK_DIR".to_string(),
            self.work_dir.display().to_string(),
        );
        context.insert("BRANCH".to_string(), self.config.branch.clone());
        context.insert("REMOTE".to_string(), self.config.remote.clone());
        context.insert("MODE".to_string(), self.mode.to_string());
        context
    }

    /// Every git call names both directories explicitly and runs in the work directory.
    fn git(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        let mut full_args = vec![
            format!("--git-dir={}", self.git_dir.display()),
            format!("--work-tree={}", self.work_dir.display()),
        ];
        full_args.extend(args.iter().map(|arg| arg.to_string()));

        self.git
            .run(&GitInvocation::new(full_args).current_dir(&self.work_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        git::MockGitRunner,
        hooks::{HookError, MockPostDeployHook},
        journal::{MemorySink, DEFAULT_DATE_FORMAT},
    };
    use rand::distributions::{Alphanumeric, DistString};
    use std::{
        error::Error,
        fs,
        sync::{Arc, Mutex},
    };
    use time::UtcOffset;

    fn create_directory() -> Result<PathBuf, Box<dyn Error>> {
        let id = Alphanumeric.sample_string(&mut rand::thread_rng(), 16);
        let directory = PathBuf::from(format!("test_directories/{id}"));
        fs::create_dir_all(&directory)?;
        Ok(directory)
    }

    fn create_journal() -> Result<(Journal, MemorySink), Box<dyn Error>> {
        let sink = MemorySink::new();
        let journal = Journal::new(
            Some(Box::new(sink.clone())),
            DEFAULT_DATE_FORMAT,
            UtcOffset::UTC,
        )?;
        Ok((journal, sink))
    }

    /// Split the lines of the sink to levels and messages.
    fn entries(sink: &MemorySink) -> Vec<(String, String)> {
        sink.lines()
            .iter()
            .map(|line| {
                let (_, rest) = line.split_once(" --- ").unwrap();
                let (level, message) = rest.split_once(": ").unwrap();
                (level.to_string(), message.to_string())
            })
            .collect()
    }

    fn messages(sink: &MemorySink) -> Vec<String> {
        entries(sink).into_iter().map(|(_, message)| message).collect()
    }

    fn expect_step(
        git: &mut MockGitRunner,
        step: &'static str,
        times: usize,
        exit_code: i32,
        output: &'static str,
    ) {
        git.expect_run()
            .withf(move |invocation| invocation.subcommand() == Some(step))
            .times(times)
            .returning(move |_| Ok(CommandOutput::new(exit_code, output)));
    }

    #[test]
    fn it_should_pull_without_work_dir() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, _) = create_journal()?;
        let config = DeployConfig {
            directory: directory.clone(),
            work_dir: None,
            ..DeployConfig::default()
        };

        let runner = DeploymentRunner::new(config, Box::new(MockGitRunner::new()), journal)?;

        let absolute = fs::canonicalize(&directory)?;
        assert_eq!(DeployMode::Pull, runner.mode());
        assert_eq!(absolute.join(".git"), runner.git_dir());
        assert_eq!(absolute, runner.work_dir());

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_checkout_with_separate_work_dir() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let work_dir = create_directory()?;
        let (journal, _) = create_journal()?;
        let config = DeployConfig {
            directory: directory.clone(),
            work_dir: Some(work_dir.clone()),
            ..DeployConfig::default()
        };

        let runner = DeploymentRunner::new(config, Box::new(MockGitRunner::new()), journal)?;

        assert_eq!(DeployMode::CheckoutForce, runner.mode());
        assert_eq!(fs::canonicalize(&directory)?, runner.git_dir());
        assert_eq!(fs::canonicalize(&work_dir)?, runner.work_dir());

        fs::remove_dir_all(directory)?;
        fs::remove_dir_all(work_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_fail_on_missing_directory_without_running_git() -> Result<(), Box<dyn Error>> {
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        git.expect_run().times(0);
        let config = DeployConfig {
            directory: PathBuf::from("/path/to/nowhere"),
            ..DeployConfig::default()
        };

        let result = DeploymentRunner::new(config, Box::new(git), journal);

        assert!(
            matches!(result, Err(DeployError::Misconfigured(_))),
            "{:?} should be Misconfigured",
            result.err()
        );
        assert!(sink.lines().is_empty());

        Ok(())
    }

    #[test]
    fn it_should_log_the_whole_pull_deployment() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let absolute = fs::canonicalize(&directory)?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "From origin");
        expect_step(&mut git, "pull", 1, 0, "Already up to date.");
        let config = DeployConfig {
            directory: directory.clone(),
            work_dir: None,
            branch: String::from("master"),
            remote: String::from("origin"),
            reset: false,
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let result = runner.execute();

        assert!(result.is_ok(), "{result:?} should be ok");
        assert_eq!(
            vec![
                "Attempting deployment...".to_string(),
                format!("Git Directory: {}", absolute.join(".git").display()),
                format!("Work Directory: {}", absolute.display()),
                "Fetching changes... From origin".to_string(),
                "Pulling changes to directory... Already up to date.".to_string(),
                "Deployment successful.".to_string(),
            ],
            messages(&sink)
        );

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_pass_the_directories_and_remote_to_git() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let work_dir = create_directory()?;
        let git_dir = fs::canonicalize(&directory)?;
        let work_tree = fs::canonicalize(&work_dir)?;
        let (journal, _) = create_journal()?;

        let calls: Arc<Mutex<Vec<GitInvocation>>> = Arc::new(Mutex::new(vec![]));
        let recorded = calls.clone();
        let mut git = MockGitRunner::new();
        git.expect_run().times(2).returning(move |invocation| {
            recorded.lock().unwrap().push(invocation.clone());
            Ok(CommandOutput::new(0, ""))
        });
        let config = DeployConfig {
            directory: directory.clone(),
            work_dir: Some(work_dir.clone()),
            branch: String::from("production"),
            remote: String::from("upstream"),
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        runner.execute()?;

        let git_dir_arg = format!("--git-dir={}", git_dir.display());
        let work_tree_arg = format!("--work-tree={}", work_tree.display());
        let calls = calls.lock().unwrap();
        assert_eq!(
            vec![
                git_dir_arg.clone(),
                work_tree_arg.clone(),
                "fetch".to_string(),
                "upstream".to_string()
            ],
            calls[0].args
        );
        assert_eq!(Some(work_tree.clone()), calls[0].cwd);
        assert_eq!(
            vec![
                git_dir_arg,
                work_tree_arg,
                "checkout".to_string(),
                "-f".to_string(),
                "production".to_string()
            ],
            calls[1].args
        );
        assert_eq!(Some(work_tree), calls[1].cwd);

        fs::remove_dir_all(directory)?;
        fs::remove_dir_all(work_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_stop_if_the_fetch_fails() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 1, "fatal: could not read");
        expect_step(&mut git, "pull", 0, 0, "");
        let config = DeployConfig {
            directory: directory.clone(),
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let result = runner.execute();

        assert!(
            matches!(&result, Err(DeployError::FetchFailed(output)) if output == "fatal: could not read"),
            "{result:?} should be FetchFailed"
        );
        let entries = entries(&sink);
        let (level, message) = entries.last().unwrap();
        assert_eq!("ERROR", level);
        assert!(message.contains("fatal: could not read"));
        assert!(!messages(&sink).contains(&"Deployment successful.".to_string()));

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_stop_if_the_pull_fails() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(
            &mut git,
            "pull",
            1,
            128,
            "fatal: Not possible to fast-forward, aborting.",
        );
        expect_step(&mut git, "submodule", 0, 0, "");
        let config = DeployConfig {
            directory: directory.clone(),
            sync_submodules: true,
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let result = runner.execute();

        assert!(
            matches!(result, Err(DeployError::PullFailed(_))),
            "{result:?} should be PullFailed"
        );
        let entries = entries(&sink);
        assert_eq!(
            (
                "ERROR".to_string(),
                "cannot pull changes: fatal: Not possible to fast-forward, aborting.".to_string()
            ),
            *entries.last().unwrap()
        );

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_stop_if_the_checkout_fails() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let work_dir = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(
            &mut git,
            "checkout",
            1,
            1,
            "error: pathspec 'master' did not match any file(s) known to git",
        );
        let mut hook = MockPostDeployHook::new();
        hook.expect_run().times(0);
        let config = DeployConfig {
            directory: directory.clone(),
            work_dir: Some(work_dir.clone()),
            ..DeployConfig::default()
        };

        let mut runner =
            DeploymentRunner::new(config, Box::new(git), journal)?.with_post_deploy(Box::new(hook));
        let result = runner.execute();

        assert!(
            matches!(result, Err(DeployError::CheckoutFailed(_))),
            "{result:?} should be CheckoutFailed"
        );
        assert_eq!("ERROR", entries(&sink).last().unwrap().0);

        fs::remove_dir_all(directory)?;
        fs::remove_dir_all(work_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_stop_if_git_cannot_run() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        git.expect_run()
            .withf(|invocation| invocation.subcommand() == Some("fetch"))
            .times(1)
            .returning(|_| Err(GitError::TimedOut(String::from("5m"))));
        let config = DeployConfig {
            directory: directory.clone(),
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let result = runner.execute();

        assert!(
            matches!(result, Err(DeployError::CommandFailed(GitError::TimedOut(_)))),
            "{result:?} should be TimedOut"
        );
        assert_eq!("ERROR", entries(&sink).last().unwrap().0);

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_continue_if_the_reset_fails() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "reset", 1, 128, "fatal: ambiguous argument 'HEAD'");
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(&mut git, "pull", 1, 0, "");
        let config = DeployConfig {
            directory: directory.clone(),
            reset: true,
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let result = runner.execute();

        assert!(result.is_ok(), "{result:?} should be ok");
        let entries = entries(&sink);
        assert!(entries.contains(&(
            "INFO".to_string(),
            "Resetting repository... fatal: ambiguous argument 'HEAD'".to_string()
        )));
        assert_eq!(
            ("INFO".to_string(), "Deployment successful.".to_string()),
            *entries.last().unwrap()
        );

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_wait_before_updating_submodules() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let submodule_started: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
        let recorded = submodule_started.clone();
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(&mut git, "pull", 1, 0, "");
        git.expect_run()
            .withf(|invocation| invocation.subcommand() == Some("submodule"))
            .times(1)
            .returning(move |invocation| {
                assert_eq!(
                    ["submodule", "update", "--init", "--recursive", "--remote"],
                    invocation.args[2..]
                );
                *recorded.lock().unwrap() = Some(Instant::now());
                Ok(CommandOutput::new(0, ""))
            });
        let config = DeployConfig {
            directory: directory.clone(),
            sync_submodules: true,
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let start = Instant::now();
        runner.execute()?;

        let submodule_started = submodule_started.lock().unwrap().unwrap();
        let elapsed = submodule_started - start;
        assert!(elapsed >= Duration::from_millis(1990), "{elapsed:?} is too short");
        assert!(elapsed <= Duration::from_millis(2500), "{elapsed:?} is too long");
        assert!(messages(&sink)
            .iter()
            .any(|message| message.starts_with("Waiting")));

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_continue_if_the_submodule_update_fails() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(&mut git, "pull", 1, 0, "");
        expect_step(&mut git, "submodule", 1, 1, "fatal: no submodule mapping found");
        let config = DeployConfig {
            directory: directory.clone(),
            sync_submodules: true,
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?;
        let result = runner.execute();

        assert!(result.is_ok(), "{result:?} should be ok");
        let entries = entries(&sink);
        assert!(entries.contains(&(
            "ERROR".to_string(),
            "Updating submodules failed: fatal: no submodule mapping found".to_string()
        )));
        assert_eq!("Deployment successful.", entries.last().unwrap().1);

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_run_the_hook_before_the_success() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(&mut git, "pull", 1, 0, "");
        let mut hook = MockPostDeployHook::new();
        hook.expect_run()
            .withf(|context| {
                context.get("TRIGGER_NAME") == Some(&"TEST".to_string())
                    && context.get("MODE") == Some(&"pull".to_string())
                    && context.get("BRANCH") == Some(&"master".to_string())
            })
            .times(1)
            .returning(|_| Ok(String::from("cache cleared")));
        let config = DeployConfig {
            directory: directory.clone(),
            ..DeployConfig::default()
        };

        let mut runner = DeploymentRunner::new(config, Box::new(git), journal)?
            .with_post_deploy(Box::new(hook))
            .with_context(Context::from([(
                "TRIGGER_NAME".to_string(),
                "TEST".to_string(),
            )]));
        runner.execute()?;

        let messages = messages(&sink);
        assert_eq!(
            vec![
                "Running post-deploy hook... cache cleared".to_string(),
                "Deployment successful.".to_string()
            ],
            messages[messages.len() - 2..]
        );

        fs::remove_dir_all(directory)?;

        Ok(())
    }

    #[test]
    fn it_should_succeed_even_if_the_hook_fails() -> Result<(), Box<dyn Error>> {
        let directory = create_directory()?;
        let (journal, sink) = create_journal()?;
        let mut git = MockGitRunner::new();
        expect_step(&mut git, "fetch", 1, 0, "");
        expect_step(&mut git, "pull", 1, 0, "");
        let mut hook = MockPostDeployHook::new();
        hook.expect_run()
            .times(1)
            .returning(|_| Err(HookError::NonZeroExitcode(1, String::from("boom"))));
        let config = DeployConfig {
            directory: directory.clone(),
            ..DeployConfig::default()
        };

        let mut runner =
            DeploymentRunner::new(config, Box::new(git), journal)?.with_post_deploy(Box::new(hook));
        let result = runner.execute();

        assert!(result.is_ok(), "{result:?} should be ok");
        let entries = entries(&sink);
        assert_eq!("ERROR", entries[entries.len() - 2].0);
        assert_eq!("Deployment successful.", entries.last().unwrap().1);

        fs::remove_dir_all(directory)?;

        Ok(())
    }
}
