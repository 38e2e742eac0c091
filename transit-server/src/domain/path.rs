//! Path results.

/// A concrete station-to-station route.
///
/// `lines` runs parallel to the hops of `stations`: `lines[i]` is the line
/// ridden from `stations[i]` to `stations[i + 1]`, so it is always one
/// shorter than `stations`. Paths are request-local and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub stations: Vec<String>,
    pub lines: Vec<String>,
    /// Total travel time in minutes, waits included.
    pub total_minutes: f64,
    /// Number of line changes along the hops.
    pub transfers: usize,
    /// Accumulated transfer and stop waits, in minutes.
    pub wait_minutes: f64,
    /// Total distance covered, in meters.
    pub distance_meters: f64,
    pub fare: f64,
}

impl Path {
    /// The zero-cost path from a station to itself.
    pub fn trivial(station: impl Into<String>) -> Self {
        Self {
            stations: vec![station.into()],
            lines: Vec::new(),
            total_minutes: 0.0,
            transfers: 0,
            wait_minutes: 0.0,
            distance_meters: 0.0,
            fare: 0.0,
        }
    }

    pub fn hop_count(&self) -> usize {
        self.lines.len()
    }
}
