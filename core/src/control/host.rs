use crate::prelude::{Host, HostSignal};
use crate::telemetry::log::LogManager;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const SLEEP_SLICE: Duration = Duration::from_millis(25);

/// Shared slot through which other threads ask a running script to stop.
#[derive(Clone, Default)]
pub struct SignalHandle {
    pending: Arc<Mutex<Option<HostSignal>>>,
}

impl SignalHandle {
    /// Records `signal` unless an earlier one is still pending.
    pub fn raise(&self, signal: HostSignal) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.get_or_insert(signal);
        }
    }

    pub fn pending(&self) -> Option<HostSignal> {
        self.pending.lock().ok().and_then(|pending| *pending)
    }
}

/// Host backed by the wall clock, the `log` facade and an optional run deadline.
pub struct SystemHost {
    logger: LogManager,
    deadline: Option<Instant>,
    signal: SignalHandle,
}

impl SystemHost {
    pub fn new(logger: LogManager) -> Self {
        Self {
            logger,
            deadline: None,
            signal: SignalHandle::default(),
        }
    }

    /// Raises [`HostSignal::Timeout`] once `timeout` has passed from now.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.deadline = timeout.map(|timeout| Instant::now() + timeout);
        self
    }

    pub fn signal_handle(&self) -> SignalHandle {
        self.signal.clone()
    }
}

impl Host for SystemHost {
    fn generate_information(&self, message: &str) {
        self.logger.record(message);
    }

    fn checkpoint(&self) -> Result<(), HostSignal> {
        if let Some(signal) = self.signal.pending() {
            return Err(signal);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.signal.raise(HostSignal::Timeout);
                return Err(HostSignal::Timeout);
            }
        }
        Ok(())
    }

    fn sleep(&self, duration: Duration) -> Result<(), HostSignal> {
        let until = Instant::now() + duration;
        loop {
            self.checkpoint()?;
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            thread::sleep((until - now).min(SLEEP_SLICE));
        }
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
pub(crate) use manual::ManualHost;
