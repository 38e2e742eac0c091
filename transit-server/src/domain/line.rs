//! Transit lines.

use super::TransitError;

/// An ordered sequence of stations traversed at a fixed average speed.
///
/// Invariants enforced at construction and on every insertion:
/// the station list has no duplicate consecutive entries, and the
/// average speed is strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: String,
    pub speed_kmh: f64,
    stations: Vec<String>,
}

impl Line {
    /// Creates a line from an ordered station list.
    pub fn new(
        id: impl Into<String>,
        speed_kmh: f64,
        stations: Vec<String>,
    ) -> Result<Self, TransitError> {
        let id = id.into();
        if !(speed_kmh > 0.0) || !speed_kmh.is_finite() {
            return Err(TransitError::InvalidConnection(format!(
                "line {id} speed must be a positive number of km/h"
            )));
        }
        if stations.is_empty() {
            return Err(TransitError::InvalidConnection(format!(
                "line {id} must have at least one station"
            )));
        }
        for pair in stations.windows(2) {
            if pair[0] == pair[1] {
                return Err(TransitError::InvalidConnection(format!(
                    "line {id} lists {} twice in a row",
                    pair[0]
                )));
            }
        }
        Ok(Self {
            id,
            speed_kmh,
            stations,
        })
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn first(&self) -> &str {
        &self.stations[0]
    }

    pub fn last(&self) -> &str {
        &self.stations[self.stations.len() - 1]
    }

    pub fn contains(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s == station)
    }

    /// Index of a station in the ordered list, if it is a member.
    pub fn position(&self, station: &str) -> Option<usize> {
        self.stations.iter().position(|s| s == station)
    }

    /// Consecutive pairs of stations, i.e. the line's implied edges.
    pub fn segments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stations
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Inserts a station at the head of the line.
    pub fn prepend(&mut self, station: impl Into<String>) -> Result<(), TransitError> {
        let station = station.into();
        if self.first() == station {
            return Err(self.duplicate_consecutive(&station));
        }
        self.stations.insert(0, station);
        Ok(())
    }

    /// Inserts a station at the tail of the line.
    pub fn append(&mut self, station: impl Into<String>) -> Result<(), TransitError> {
        let station = station.into();
        if self.last() == station {
            return Err(self.duplicate_consecutive(&station));
        }
        self.stations.push(station);
        Ok(())
    }

    /// Splices a station in immediately after the given position.
    pub fn splice_after(
        &mut self,
        position: usize,
        station: impl Into<String>,
    ) -> Result<(), TransitError> {
        let station = station.into();
        if position >= self.stations.len() {
            return Err(TransitError::InvalidConnection(format!(
                "position {position} is past the end of line {}",
                self.id
            )));
        }
        if self.stations[position] == station
            || self.stations.get(position + 1).is_some_and(|s| *s == station)
        {
            return Err(self.duplicate_consecutive(&station));
        }
        self.stations.insert(position + 1, station);
        Ok(())
    }

    fn duplicate_consecutive(&self, station: &str) -> TransitError {
        TransitError::InvalidConnection(format!(
            "inserting {station} would repeat it consecutively on line {}",
            self.id
        ))
    }
}
