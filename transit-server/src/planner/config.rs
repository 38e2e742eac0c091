//! Search configuration for both planners.

use std::time::Duration;

use crate::domain::FareSchedule;

/// Tunable parameters for route search.
///
/// All numeric policy values live here rather than in the algorithms; the
/// defaults keep a plain edge-time sum for single-line trips (no dwell
/// penalty) and a five-minute transfer wait.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Wait added every time the line ridden changes (minutes).
    pub transfer_wait_mins: f64,

    /// Dwell added at each intermediate station (minutes).
    pub stop_wait_mins: f64,

    /// Largest transfer budget the minimizing planner explores.
    /// Bounds combinatorial growth; exceeding it reports no route.
    pub max_transfers: usize,

    /// Maximum number of alternatives the minimizing planner returns.
    pub max_alternatives: usize,

    /// Per-query deadline. `None` disables the timeout.
    pub timeout: Option<Duration>,

    /// Fare schedule applied to finished paths.
    pub fares: FareSchedule,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            transfer_wait_mins: 5.0,
            stop_wait_mins: 0.0,
            max_transfers: 3,
            max_alternatives: 5,
            timeout: None,
            fares: FareSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.transfer_wait_mins, 5.0);
        assert_eq!(config.stop_wait_mins, 0.0);
        assert_eq!(config.max_transfers, 3);
        assert_eq!(config.max_alternatives, 5);
        assert!(config.timeout.is_none());
    }
}
