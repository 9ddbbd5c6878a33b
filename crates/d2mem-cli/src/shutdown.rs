use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tracing::info;

/// Stop flag for the polling loop.
///
/// `sleep` returns as soon as the flag is raised, so Ctrl+C does not have to
/// wait out a long retry delay.
#[derive(Default)]
pub struct ShutdownSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signal raised by Ctrl+C.
    pub fn with_ctrlc() -> anyhow::Result<Arc<Self>> {
        let signal = Arc::new(Self::new());
        let handler_signal = Arc::clone(&signal);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal, stopping...");
            handler_signal.trigger();
        })?;
        Ok(signal)
    }

    pub fn trigger(&self) {
        // A poisoned lock still holds a usable flag
        let mut stopped = self.stopped.lock().unwrap_or_else(|e| e.into_inner());
        *stopped = true;
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.stopped.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for `duration` or until shutdown. Returns `true` on shutdown.
    pub fn sleep(&self, duration: Duration) -> bool {
        let stopped = self.stopped.lock().unwrap_or_else(|e| e.into_inner());
        match self
            .condvar
            .wait_timeout_while(stopped, duration, |stopped| !*stopped)
        {
            Ok((stopped, _)) => *stopped,
            Err(_) => true,
        }
    }
}
