use crate::prelude::{ControllerResult, Host};
use std::time::Duration;

/// Polling loop capped by elapsed wall-clock time rather than attempts.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRetry {
    interval: Duration,
    timeout: Duration,
}

impl BoundedRetry {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Runs `probe` until it reports success or `timeout` has elapsed.
    ///
    /// The probe always runs at least once and the host sleeps `interval`
    /// between attempts, so the loop can end slightly past the timeout.
    /// Returns `Ok(false)` on timeout; probe errors and host signals propagate.
    pub fn run<F>(&self, host: &dyn Host, mut probe: F) -> ControllerResult<bool>
    where
        F: FnMut() -> ControllerResult<bool>,
    {
        let started = host.now();
        loop {
            if probe()? {
                return Ok(true);
            }
            host.sleep(self.interval)?;
            if host.now().duration_since(started) > self.timeout {
                return Ok(false);
            }
        }
    }
}
