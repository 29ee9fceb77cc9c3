use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Lifetime and eviction thresholds for the session directory
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Fixed lifetime from creation; also the cookie Max-Age
    pub lifetime: Duration,
    /// Sessions idle for longer than this are swept
    pub idle_timeout: Duration,
    /// Sessions used within this window count as active in stats
    pub active_threshold: Duration,
    /// How often the background sweep runs
    pub sweep_interval: std::time::Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::hours(2),
            idle_timeout: Duration::hours(2),
            active_threshold: Duration::minutes(30),
            sweep_interval: std::time::Duration::from_secs(10 * 60),
        }
    }
}

/// Snapshot of directory occupancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}
