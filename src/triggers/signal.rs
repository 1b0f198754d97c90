use super::{Trigger, TriggerError};
use crate::context::Context;
use log::{debug, info, warn};
use std::sync::mpsc::Sender;

/// Stops the HTTP server gracefully on SIGINT/SIGTERM.
///
/// The first signal stops accepting new deployments and lets the running one finish.
/// A second signal exits immediately.
#[derive(Default)]
pub struct SignalTrigger;

impl SignalTrigger {
    pub fn new() -> SignalTrigger {
        SignalTrigger
    }

    /// Returns the signal that should terminate the process, if any arrives after the first.
    fn wait_for_shutdown<I>(
        &self,
        tx: Sender<Option<Context>>,
        signals: I,
    ) -> Result<Option<i32>, TriggerError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut signals = signals.into_iter();

        let Some(first) = signals.next() else {
            return Ok(None);
        };
        info!("Received signal {first}, shutting down after the running deployment.");
        if tx.send(None).is_err() {
            debug!("The main loop already stopped.");
        }

        Ok(signals.next())
    }
}

impl Trigger for SignalTrigger {
    #[cfg(unix)]
    fn listen(&self, tx: Sender<Option<Context>>) -> Result<(), TriggerError> {
        use signal_hook::{consts::TERM_SIGNALS, iterator::Signals};

        let mut signals = match Signals::new(TERM_SIGNALS) {
            Ok(signals) => signals,
            Err(err) => {
                warn!("Cannot listen to termination signals: {err}.");
                return Ok(());
            }
        };

        if let Some(signal) = self.wait_for_shutdown(tx, signals.forever())? {
            warn!("Received signal {signal} again, exiting without waiting.");
            std::process::exit(128 + signal);
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn listen(&self, _tx: Sender<Option<Context>>) -> Result<(), TriggerError> {
        debug!("Termination signals are only handled on unix.");

        Ok(())
    }
}
