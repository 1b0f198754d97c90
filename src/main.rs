use args::{parse_args, Args};
use deploy_hook::{
    deploy::{deployer::Deployer, DeployConfig, DeployError},
    start::{start, Deploy, StartError},
    triggers::{http::HttpTrigger, once::OnceTrigger, signal::SignalTrigger, Trigger},
};
use log::debug;
use logger::init_logger;
use std::{env, path::PathBuf, process, time::Duration};
use thiserror::Error;
use time::UtcOffset;

mod args;
mod logger;

const SECRET_ENV: &str = "DEPLOY_HOOK_SECRET";

#[derive(Debug, Error)]
pub enum MainError {
    #[error("You have to pass a directory to deploy.")]
    MissingDirectory,
    #[error("You have to pass a secret key (--secret or $DEPLOY_HOOK_SECRET) to use the HTTP trigger.")]
    MissingSecret,
    #[error("You have to pass either --http or --once to start deploying.")]
    MissingTrigger,
    #[error("You cannot pass both --http and --once.")]
    ConflictingTriggers,
    #[error("Cannot determine the local timezone for logging.")]
    FailedLoggerTimezones,
    #[error("Cannot setup logger: {0}.")]
    FailedLogger(#[from] log::SetLoggerError),
    #[error("Cannot deploy: {0}.")]
    FailedDeploy(#[from] DeployError),
    #[error("{0}")]
    FailedStart(#[from] StartError),
}

fn create_config(args: &Args) -> Result<DeployConfig, MainError> {
    let directory = args.directory.clone().ok_or(MainError::MissingDirectory)?;
    let timeout = Duration::from(args.timeout.clone());
    let defaults = DeployConfig::default();

    Ok(DeployConfig {
        directory: PathBuf::from(directory),
        work_dir: args.work_dir.clone().map(PathBuf::from),
        branch: args.branch.clone(),
        remote: args.remote.clone(),
        reset: args.reset,
        sync_submodules: args.sync_submodules,
        git_binary_path: args.git_binary_path.clone(),
        log_target: (!args.no_log).then(|| PathBuf::from(&args.log)),
        date_format: args.date_format.clone().unwrap_or(defaults.date_format),
        timeout: (!timeout.is_zero()).then_some(timeout),
    })
}

fn create_triggers(args: &Args) -> Result<Vec<Box<dyn Trigger>>, MainError> {
    if args.once && args.http.is_some() {
        return Err(MainError::ConflictingTriggers);
    }

    let mut triggers: Vec<Box<dyn Trigger>> = vec![];
    if args.once {
        triggers.push(Box::new(OnceTrigger));
    } else if let Some(http) = &args.http {
        let secret = args
            .secret
            .clone()
            .or_else(|| env::var(SECRET_ENV).ok())
            .filter(|secret| !secret.is_empty())
            .ok_or(MainError::MissingSecret)?;
        triggers.push(Box::new(HttpTrigger::new(http.clone(), secret)));
        triggers.push(Box::new(SignalTrigger::new()));
    } else {
        return Err(MainError::MissingTrigger);
    }

    Ok(triggers)
}

fn main_inner(args: Args) -> Result<(), MainError> {
    // The local offset can only be determined safely before starting threads.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    init_logger(&args)?;

    // Setup deployment and fail early on misconfiguration.
    let config = create_config(&args)?;
    debug!("Deploying with {config:?}.");
    let mut deployer = Deployer::new(config, offset);
    if let Some(command) = &args.post_deploy {
        deployer = deployer.with_post_deploy(command.clone(), args.shell);
    }
    deployer.validate()?;

    // Setup triggers.
    let triggers = create_triggers(&args)?;

    // Start the main loop.
    let mut deployer: Box<dyn Deploy> = Box::new(deployer);
    start(triggers, &mut deployer)?;

    Ok(())
}

fn main() {
    let args = parse_args();
    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(err) = main_inner(args) {
        eprintln!("{err}");
        process::exit(1);
    }
}
