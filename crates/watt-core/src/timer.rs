//! Timed phase logging for preprocessing steps.

use std::time::Instant;

/// Logs "<name>..." on creation and "<name> took Xs" on [`finished`].
///
/// [`finished`]: TimedLogger::finished
pub struct TimedLogger {
    name: &'static str,
    started: Instant,
}

impl TimedLogger {
    pub fn new(name: &'static str) -> Self {
        tracing::info!("{name}...");
        Self { name, started: Instant::now() }
    }

    pub fn finished(self) {
        tracing::info!("{} took {:.2}s", self.name, self.started.elapsed().as_secs_f64());
    }
}
