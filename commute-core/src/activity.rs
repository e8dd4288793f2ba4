use std::collections::HashSet;

use commute_types::DirectionId;

/// Monotonic record of every run ever observed with a live vehicle position.
///
/// The set only grows: there is no removal operation, and it is reset only by
/// restarting the process. It answers "has this run ever proven it is moving?",
/// a weaker but more durable signal than "is it moving right now?".
#[derive(Debug, Default)]
pub struct ActivityTracker {
    seen: HashSet<String>,
}

impl ActivityTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `run_refs` observed active on `direction_id` into the set.
    ///
    /// Returns the number of runs seen for the first time.
    pub fn observe<'a, I>(&mut self, direction_id: DirectionId, run_refs: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let before = self.seen.len();
        for r in run_refs {
            if !self.seen.contains(r) {
                self.seen.insert(r.to_string());
            }
        }
        let added = self.seen.len() - before;
        #[cfg(feature = "tracing")]
        tracing::debug!(direction_id, added, total = self.seen.len(), "observed active runs");
        #[cfg(not(feature = "tracing"))]
        let _ = direction_id;
        added
    }

    /// Whether `run_ref` has ever been observed active.
    #[must_use]
    pub fn was_ever_active(&self, run_ref: &str) -> bool {
        self.seen.contains(run_ref)
    }

    /// Number of distinct runs ever observed active.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if no run has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
