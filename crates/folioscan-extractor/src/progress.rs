//! Session-keyed progress callback registry.
//!
//! Pure infrastructure: the registry maps a session id to the callback the
//! caller registered for it. It is owned by the orchestrator that created it,
//! not a process-wide singleton, and distinct sessions never share a key, so
//! a mutex-guarded map is all the coordination required.

use std::collections::HashMap;
use std::sync::Mutex;

use folioscan_core::ProgressUpdate;

/// Callback invoked with each progress update for a session.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Registry of per-session progress callbacks.
#[derive(Default)]
pub struct ProgressReporter {
    callbacks: Mutex<HashMap<String, ProgressCallback>>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `session_id`. A second registration under
    /// the same id replaces the first (session-id uniqueness is the caller's
    /// contract).
    pub fn register(&self, session_id: &str, callback: ProgressCallback) {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(|e| e.into_inner());
        callbacks.insert(session_id.to_string(), callback);
    }

    /// Removes the registration for `session_id`, if any. Safe to call more
    /// than once.
    pub fn remove(&self, session_id: &str) {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(|e| e.into_inner());
        callbacks.remove(session_id);
    }

    /// Delivers an update to the session's callback. Emitting to a session
    /// with no registration is a no-op: delivery is not guaranteed, only
    /// ordering is.
    pub fn emit(&self, session_id: &str, percentage: u8, message: &str) {
        let callbacks = self.callbacks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(callback) = callbacks.get(session_id) {
            callback(ProgressUpdate {
                session_id: session_id.to_string(),
                percentage: percentage.min(100),
                message: message.to_string(),
            });
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn collector() -> (ProgressCallback, Arc<Mutex<Vec<ProgressUpdate>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |update| {
            sink.lock().unwrap().push(update);
        });
        (callback, seen)
    }

    #[test]
    fn emits_to_registered_session() {
        let reporter = ProgressReporter::new();
        let (callback, seen) = collector();
        reporter.register("s1", callback);

        reporter.emit("s1", 10, "Waiting for you to log in");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].session_id, "s1");
        assert_eq!(seen[0].percentage, 10);
    }

    #[test]
    fn emit_to_unknown_session_is_a_noop() {
        let reporter = ProgressReporter::new();
        reporter.emit("ghost", 50, "nope");
    }

    #[test]
    fn removed_session_receives_nothing() {
        let reporter = ProgressReporter::new();
        let (callback, seen) = collector();
        reporter.register("s1", callback);
        reporter.remove("s1");

        reporter.emit("s1", 99, "late");
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(reporter.len(), 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let reporter = ProgressReporter::new();
        reporter.remove("never-registered");
        reporter.remove("never-registered");
    }

    #[test]
    fn distinct_sessions_do_not_cross_talk() {
        let reporter = ProgressReporter::new();
        let (cb1, seen1) = collector();
        let (cb2, seen2) = collector();
        reporter.register("a", cb1);
        reporter.register("b", cb2);

        reporter.emit("a", 20, "phase");

        assert_eq!(seen1.lock().unwrap().len(), 1);
        assert!(seen2.lock().unwrap().is_empty());
    }

    #[test]
    fn re_registration_replaces_the_callback() {
        let reporter = ProgressReporter::new();
        let (cb1, seen1) = collector();
        let (cb2, seen2) = collector();
        reporter.register("a", cb1);
        reporter.register("a", cb2);

        reporter.emit("a", 20, "phase");

        assert!(seen1.lock().unwrap().is_empty());
        assert_eq!(seen2.lock().unwrap().len(), 1);
    }

    #[test]
    fn percentage_is_clamped_to_100() {
        let reporter = ProgressReporter::new();
        let (callback, seen) = collector();
        reporter.register("a", callback);
        reporter.emit("a", 250, "overshoot");
        assert_eq!(seen.lock().unwrap()[0].percentage, 100);
    }
}
