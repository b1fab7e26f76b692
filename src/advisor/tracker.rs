//! Correlates in-flight advisor requests with the state they update.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

/// Handle returned when a request is issued; hand it back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    key: String,
    sequence: u64,
}

struct TrackerState<T> {
    next_sequence: u64,
    latest: HashMap<String, u64>,
    results: HashMap<String, T>,
}

/// Keeps the newest response per key. A ticket superseded by a later one
/// for the same key cannot write its result.
pub struct RequestTracker<T> {
    state: Mutex<TrackerState<T>>,
}

impl<T> Default for RequestTracker<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(TrackerState {
                next_sequence: 0,
                latest: HashMap::new(),
                results: HashMap::new(),
            }),
        }
    }
}

impl<T> RequestTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, key: impl Into<String>) -> RequestTicket {
        let key = key.into();
        let mut state = self.lock();
        state.next_sequence += 1;
        let sequence = state.next_sequence;
        state.latest.insert(key.clone(), sequence);
        RequestTicket { key, sequence }
    }

    /// Stores `value` if `ticket` is still the latest for its key. Returns
    /// whether the value was applied.
    pub fn complete(&self, ticket: RequestTicket, value: T) -> bool {
        let mut state = self.lock();
        if state.latest.get(&ticket.key) != Some(&ticket.sequence) {
            tracing::debug!(
                key = %ticket.key,
                sequence = ticket.sequence,
                "discarding stale advisor response"
            );
            return false;
        }
        state.latest.remove(&ticket.key);
        state.results.insert(ticket.key, value);
        true
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.lock().latest.contains_key(key)
    }

    pub fn take(&self, key: &str) -> Option<T> {
        self.lock().results.remove(key)
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState<T>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> RequestTracker<T> {
    pub fn result(&self, key: &str) -> Option<T> {
        self.lock().results.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_ticket_wins() {
        let tracker = RequestTracker::new();
        let first = tracker.issue("goal-a");
        let second = tracker.issue("goal-a");
        assert!(tracker.complete(second, "fresh".to_string()));
        assert!(!tracker.complete(first, "stale".to_string()));
        assert_eq!(tracker.result("goal-a").as_deref(), Some("fresh"));
    }

    #[test]
    fn late_response_does_not_overwrite_newer_result() {
        let tracker = RequestTracker::new();
        let old = tracker.issue("goal:a");
        let new = tracker.issue("goal:a");
        assert!(tracker.complete(new, 2));
        assert!(!tracker.complete(old, 1));
        assert_eq!(tracker.take("goal:a"), Some(2));
        assert_eq!(tracker.take("goal:a"), None);
    }

    #[test]
    fn keys_are_independent() {
        let tracker = RequestTracker::new();
        let a = tracker.issue("a");
        let b = tracker.issue("b");
        assert!(tracker.is_pending("a"));
        assert!(tracker.complete(b, 'b'));
        assert!(tracker.is_pending("a"));
        assert!(!tracker.is_pending("b"));
        assert!(tracker.complete(a, 'a'));
        assert_eq!(tracker.result("a"), Some('a'));
        assert_eq!(tracker.result("b"), Some('b'));
    }
}
