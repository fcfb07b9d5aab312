use log::info;

/// Information sink labelled with the component that emits the messages.
pub struct LogManager {
    source: String,
}

impl LogManager {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.source, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("carrier")
    }
}
