//! A synchronous progress callback invoked by the repair loops, so a host
//! application can surface "removed axiom X", "round 3 of weakening", and
//! similar status lines without the repair loop depending on any
//! particular UI.

use log::info;
use parking_lot::Mutex;

/// Receives one status message per notable repair-loop step. Calls happen
/// synchronously on the repairing thread (or, for `BestOfKWeakening`, on
/// whichever worker thread produced the message) — implementations that
/// forward to a UI must do their own dispatch to a UI thread.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: String);
}

/// Forwards every message to the `log` crate at `info` level, prefixed
/// with the target so multiple concurrent repairs are distinguishable in
/// aggregate logs.
pub struct LoggingProgressSink {
    target: &'static str,
}

impl LoggingProgressSink {
    pub fn new(target: &'static str) -> Self {
        LoggingProgressSink { target }
    }
}

impl Default for LoggingProgressSink {
    fn default() -> Self {
        LoggingProgressSink::new("dl_repair::repair")
    }
}

impl ProgressSink for LoggingProgressSink {
    fn report(&self, message: String) {
        info!(target: self.target, "{message}");
    }
}

/// Discards every message. The default when a caller doesn't care to
/// observe progress.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn report(&self, _message: String) {}
}

/// Collects every message in order, for assertions in tests.
#[derive(Default)]
pub struct CollectingProgressSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingProgressSink {
    pub fn new() -> Self {
        CollectingProgressSink::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl ProgressSink for CollectingProgressSink {
    fn report(&self, message: String) {
        self.messages.lock().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_preserves_order() {
        let sink = CollectingProgressSink::new();
        sink.report("first".into());
        sink.report("second".into());
        assert_eq!(sink.messages(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn null_sink_drops_everything() {
        let sink = NullProgressSink;
        sink.report("ignored".into());
    }
}
