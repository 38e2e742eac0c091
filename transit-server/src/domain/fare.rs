//! Fare calculation.

/// Distance-band fare schedule with a per-transfer surcharge.
///
/// The default bands follow common metro pricing: a flat amount up to each
/// distance step, then one unit per started 20 km beyond the last band.
/// The surcharge must be non-negative so that fare never decreases as the
/// transfer count grows.
#[derive(Debug, Clone)]
pub struct FareSchedule {
    /// (upper distance bound in meters, fare) pairs, ascending by bound.
    pub bands: Vec<(f64, f64)>,
    /// Fare for the first `extra_step_meters` past the last band.
    pub beyond_base: f64,
    /// Band width past the last bound; each started step adds one unit.
    pub extra_step_meters: f64,
    /// Added once per line change.
    pub transfer_surcharge: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            bands: vec![
                (6_000.0, 3.0),
                (12_000.0, 4.0),
                (22_000.0, 5.0),
                (32_000.0, 6.0),
            ],
            beyond_base: 7.0,
            extra_step_meters: 20_000.0,
            transfer_surcharge: 0.0,
        }
    }
}

impl FareSchedule {
    /// Fare for a trip of the given length and transfer count.
    ///
    /// A zero-distance trip (single-station path) is free.
    pub fn fare(&self, distance_meters: f64, transfers: usize) -> f64 {
        if distance_meters <= 0.0 {
            return 0.0;
        }
        let base = self
            .bands
            .iter()
            .find(|(bound, _)| distance_meters <= *bound)
            .map(|(_, fare)| *fare)
            .unwrap_or_else(|| {
                let last_bound = self.bands.last().map(|(b, _)| *b).unwrap_or(0.0);
                let extra = distance_meters - last_bound;
                self.beyond_base + (extra / self.extra_step_meters).floor()
            });
        base + self.transfer_surcharge * transfers as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        let fares = FareSchedule::default();
        assert_eq!(fares.fare(1.0, 0), 3.0);
        assert_eq!(fares.fare(6_000.0, 0), 3.0);
        assert_eq!(fares.fare(6_001.0, 0), 4.0);
        assert_eq!(fares.fare(12_000.0, 0), 4.0);
        assert_eq!(fares.fare(22_000.0, 0), 5.0);
        assert_eq!(fares.fare(32_000.0, 0), 6.0);
    }

    #[test]
    fn beyond_last_band() {
        let fares = FareSchedule::default();
        assert_eq!(fares.fare(33_000.0, 0), 7.0);
        assert_eq!(fares.fare(52_000.0, 0), 8.0);
        assert_eq!(fares.fare(73_000.0, 0), 9.0);
    }

    #[test]
    fn zero_distance_is_free() {
        let fares = FareSchedule::default();
        assert_eq!(fares.fare(0.0, 0), 0.0);
    }

    #[test]
    fn surcharge_is_non_decreasing_in_transfers() {
        let fares = FareSchedule {
            transfer_surcharge: 1.5,
            ..FareSchedule::default()
        };
        let d = 10_000.0;
        assert!(fares.fare(d, 0) <= fares.fare(d, 1));
        assert!(fares.fare(d, 1) <= fares.fare(d, 2));
        assert_eq!(fares.fare(d, 2), 4.0 + 3.0);
    }
}
