//! Leveled message sink handed to an organize pass.

/// Receives the per-file outcome messages of a pass.
///
/// Calls are synchronous; implementations decide where messages go.
pub trait Reporter {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards messages to the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!(target: "smartsort::organizer", "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "smartsort::organizer", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "smartsort::organizer", "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
