use crate::{
    context::Context,
    deploy::DeployResult,
    triggers::{Trigger, TriggerError},
};
use log::{debug, error, info};
use mockall::automock;
use std::{sync::mpsc, thread};
use thiserror::Error;

/// A custom error implementation for the start function
#[derive(Debug, Error)]
pub enum StartError {
    #[error("You have to define at least one trigger.")]
    NoTriggers,
    #[error("Trigger failed: {0}.")]
    MisconfiguredTrigger(#[from] TriggerError),
}

/// Something that deploys when it is triggered (e.g. [Deployer](crate::deploy::deployer::Deployer)).
#[automock]
pub trait Deploy {
    /// Run one deployment with the data sent by the trigger.
    fn deploy(&mut self, context: &Context) -> DeployResult;
}

/// The main program loop, that runs the triggers and deploys on every trigger.
///
/// Every trigger runs on its own thread, but the deployments run one after the other
/// on the current thread. It returns when a trigger asks to stop or every trigger finished.
pub fn start(
    triggers: Vec<Box<dyn Trigger>>,
    deployer: &mut Box<dyn Deploy>,
) -> Result<(), StartError> {
    let (tx, rx) = mpsc::channel::<Option<Context>>();

    if triggers.is_empty() {
        return Err(StartError::NoTriggers);
    }

    for trigger in triggers {
        let tx = tx.clone();
        thread::spawn(move || {
            let result = trigger.listen(tx);
            if let Err(err) = result {
                error!("Trigger failed: {err}.");
            }
        });
    }
    // Only the triggers should keep the channel open
    drop(tx);

    debug!("Waiting on triggers.");
    while let Ok(Some(context)) = rx.recv() {
        match deployer.deploy(&context) {
            Ok(()) => info!("Deployment finished."),
            Err(err) => error!("Deployment failed: {err}."),
        }
    }

    debug!("Finished running.");

    Ok(())
}
