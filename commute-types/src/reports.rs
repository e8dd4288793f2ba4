//! Report envelopes produced by the aggregator.

use serde::{Deserialize, Serialize};

use crate::error::CommuteError;

/// Progress of the refresh pass currently in flight.
///
/// Counts call phases: every connection contributes two (runs, departures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Call phases finished so far, successful or not.
    pub completed: usize,
    /// Call phases planned for the pass.
    pub total: usize,
}

impl Progress {
    /// Fraction of the pass completed, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed.min(self.total) as f64) / (self.total as f64)
    }

    /// Returns `true` once every planned phase has completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Summary of one refresh pass over the catalog.
///
/// Failed connections keep their previous services; their failures are
/// collected in `warnings` instead of aborting the pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Connections whose slot range was replaced.
    pub refreshed: usize,
    /// Connections skipped because they do not track the configured leg.
    pub skipped: usize,
    /// Services written across all refreshed connections.
    pub services: usize,
    /// Non-fatal issues encountered, one per failed connection.
    pub warnings: Vec<CommuteError>,
}

impl RefreshReport {
    /// Returns `true` when no connection failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
