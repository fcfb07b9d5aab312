use std::sync::Mutex;

/// Counts element traffic for one controller run.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reads: usize,
    pub writes: usize,
    pub actions: usize,
    pub errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_read(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.reads += 1;
        }
    }

    pub fn record_write(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.writes += 1;
        }
    }

    pub fn record_action(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.actions += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_traffic() {
        let metrics = MetricsRecorder::new();
        metrics.record_read();
        metrics.record_write();
        metrics.record_write();
        metrics.record_error();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reads, 1);
        assert_eq!(snapshot.writes, 2);
        assert_eq!(snapshot.actions, 0);
        assert_eq!(snapshot.errors, 1);
    }
}
