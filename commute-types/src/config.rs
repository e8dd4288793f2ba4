//! Configuration shared by the monitor and its loops.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Which direction of each connection the monitor follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Leg {
    /// Follow each connection's forward direction.
    #[default]
    Outbound,
    /// Follow each connection's reverse direction; connections without one are skipped.
    Return,
}

/// Global configuration for the `Monitor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Period of the refresh loop that fetches runs and departures.
    pub refresh_period: Duration,
    /// Period of the fetch-free tick loop that republishes the visible list.
    pub tick_period: Duration,
    /// Safety margin subtracted from get-going-by deadlines.
    ///
    /// Also the grace period after which a missed service is hidden.
    pub buffer: Duration,
    /// Maximum departures requested (and slots kept) per connection.
    pub max_results: usize,
    /// Time zone used to render deadlines for presenters.
    pub timezone: Tz,
    /// Direction of travel followed on every connection.
    pub leg: Leg,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_period: Duration::from_secs(30),
            tick_period: Duration::from_secs(1),
            buffer: Duration::from_secs(120),
            max_results: 3,
            timezone: chrono_tz::Australia::Melbourne,
            leg: Leg::Outbound,
        }
    }
}
