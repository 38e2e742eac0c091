//! The transit network graph.
//!
//! Owns the station and line tables and the per-edge distance overrides.
//! Edges are derived: one exists between each pair of stations consecutive
//! on some line, weighted by geographic distance converted to minutes at
//! that line's speed. The single source of truth for topology.

use std::collections::HashMap;

use crate::domain::{Coordinates, Line, Station, TransitError};

/// One hop out of a station: the neighbor, the line ridden, and the edge
/// weight in both minutes and meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    pub station: String,
    pub line: String,
    pub minutes: f64,
    pub meters: f64,
}

/// Station/line tables plus distance overrides.
///
/// Stations and lines are keyed by stable string identifiers; nothing in
/// the graph hands out shared mutable references.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    stations: HashMap<String, Station>,
    lines: HashMap<String, Line>,
    /// Explicit edge lengths (meters) keyed by (line, unordered station
    /// pair). An entry overrides the haversine distance for that one edge.
    overrides: HashMap<(String, String, String), f64>,
}

fn edge_key(line: &str, a: &str, b: &str) -> (String, String, String) {
    if a <= b {
        (line.to_string(), a.to_string(), b.to_string())
    } else {
        (line.to_string(), b.to_string(), a.to_string())
    }
}

/// Meters to minutes at the given line speed.
fn minutes_at(meters: f64, speed_kmh: f64) -> f64 {
    meters * 60.0 / (speed_kmh * 1000.0)
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a station, failing if the name is taken.
    pub fn add_station(
        &mut self,
        name: impl Into<String>,
        coords: Coordinates,
    ) -> Result<(), TransitError> {
        let name = name.into();
        if self.stations.contains_key(&name) {
            return Err(TransitError::DuplicateStation(name));
        }
        self.stations.insert(name.clone(), Station::new(name, coords));
        Ok(())
    }

    /// Adds a line and its implied edges.
    ///
    /// Every member station must already exist, and every implied edge must
    /// have strictly positive length.
    pub fn add_line(
        &mut self,
        id: impl Into<String>,
        speed_kmh: f64,
        stations: Vec<String>,
    ) -> Result<(), TransitError> {
        let id = id.into();
        if self.lines.contains_key(&id) {
            return Err(TransitError::DuplicateLine(id));
        }
        let line = Line::new(id, speed_kmh, stations)?;
        for name in line.stations() {
            if !self.stations.contains_key(name) {
                return Err(TransitError::StationNotFound(name.clone()));
            }
        }
        for (a, b) in line.segments() {
            let meters = self.edge_meters(&line.id, a, b).unwrap_or(0.0);
            if meters <= 0.0 {
                return Err(TransitError::InvalidConnection(format!(
                    "stations {a} and {b} are co-located; edge length must be positive"
                )));
            }
        }
        self.lines.insert(line.id.clone(), line);
        Ok(())
    }

    /// Records an explicit length for one line's edge between two
    /// stations, overriding the haversine-derived distance.
    pub fn connect(
        &mut self,
        a: &str,
        b: &str,
        line: &str,
        distance_meters: f64,
    ) -> Result<(), TransitError> {
        for name in [a, b] {
            if !self.stations.contains_key(name) {
                return Err(TransitError::InvalidConnection(format!(
                    "unknown station {name}"
                )));
            }
        }
        if !self.lines.contains_key(line) {
            return Err(TransitError::LineNotFound(line.to_string()));
        }
        if !(distance_meters > 0.0) || !distance_meters.is_finite() {
            return Err(TransitError::InvalidConnection(format!(
                "distance between {a} and {b} must be positive"
            )));
        }
        self.overrides.insert(edge_key(line, a, b), distance_meters);
        Ok(())
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.get(name)
    }

    pub fn contains_station(&self, name: &str) -> bool {
        self.stations.contains_key(name)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn line(&self, id: &str) -> Option<&Line> {
        self.lines.get(id)
    }

    pub fn contains_line(&self, id: &str) -> bool {
        self.lines.contains_key(id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// Ids of the lines passing through a station, unsorted.
    pub fn lines_through<'a>(&'a self, station: &'a str) -> impl Iterator<Item = &'a str> {
        self.lines
            .values()
            .filter(move |line| line.contains(station))
            .map(|line| line.id.as_str())
    }

    /// Length in meters of one line's edge between two stations: the
    /// explicit override if one was recorded, otherwise the great-circle
    /// distance.
    pub fn edge_meters(&self, line: &str, a: &str, b: &str) -> Option<f64> {
        if let Some(meters) = self.overrides.get(&edge_key(line, a, b)) {
            return Some(*meters);
        }
        let sa = self.stations.get(a)?;
        let sb = self.stations.get(b)?;
        Some(sa.coords.distance_meters(&sb.coords))
    }

    /// Every (neighbor, line, weight) triple one hop from a station,
    /// sorted by neighbor name then line id. Pure read.
    pub fn neighbors(&self, station: &str) -> Vec<Hop> {
        let mut hops = Vec::new();
        for line in self.lines.values() {
            for (a, b) in line.segments() {
                let other = if a == station {
                    b
                } else if b == station {
                    a
                } else {
                    continue;
                };
                let Some(meters) = self.edge_meters(&line.id, station, other) else {
                    continue;
                };
                hops.push(Hop {
                    station: other.to_string(),
                    line: line.id.clone(),
                    minutes: minutes_at(meters, line.speed_kmh),
                    meters,
                });
            }
        }
        hops.sort_by(|x, y| (&x.station, &x.line).cmp(&(&y.station, &y.line)));
        hops.dedup_by(|x, y| x.station == y.station && x.line == y.line);
        hops
    }

    /// Applies a mutation produced elsewhere: inserts a validated station.
    /// Callers are expected to have checked for duplicates already.
    pub(crate) fn insert_station_unchecked(&mut self, station: Station) {
        self.stations.insert(station.name.clone(), station);
    }

    pub(crate) fn line_mut(&mut self, id: &str) -> Option<&mut Line> {
        self.lines.get_mut(id)
    }

    pub(crate) fn insert_line_unchecked(&mut self, line: Line) {
        self.lines.insert(line.id.clone(), line);
    }

    pub(crate) fn set_override(&mut self, line: &str, a: &str, b: &str, meters: f64) {
        self.overrides.insert(edge_key(line, a, b), meters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    fn grid_graph() -> NetworkGraph {
        // Three stations spaced ~1.1 km apart going north.
        let mut g = NetworkGraph::new();
        g.add_station("A", coords(51.50, -0.10)).unwrap();
        g.add_station("B", coords(51.51, -0.10)).unwrap();
        g.add_station("C", coords(51.52, -0.10)).unwrap();
        g.add_line("Red", 40.0, vec!["A".into(), "B".into(), "C".into()])
            .unwrap();
        g
    }

    #[test]
    fn duplicate_station_rejected() {
        let mut g = grid_graph();
        let err = g.add_station("A", coords(0.0, 0.0)).unwrap_err();
        assert_eq!(err, TransitError::DuplicateStation("A".into()));
        assert_eq!(g.station_count(), 3);
    }

    #[test]
    fn line_requires_known_stations() {
        let mut g = grid_graph();
        let err = g
            .add_line("Blue", 35.0, vec!["A".into(), "Ghost".into()])
            .unwrap_err();
        assert_eq!(err, TransitError::StationNotFound("Ghost".into()));
        assert!(!g.contains_line("Blue"));
    }

    #[test]
    fn duplicate_line_rejected() {
        let mut g = grid_graph();
        let err = g
            .add_line("Red", 35.0, vec!["A".into(), "B".into()])
            .unwrap_err();
        assert_eq!(err, TransitError::DuplicateLine("Red".into()));
    }

    #[test]
    fn colocated_stations_make_no_edge() {
        let mut g = NetworkGraph::new();
        g.add_station("A", coords(51.5, -0.1)).unwrap();
        g.add_station("Twin", coords(51.5, -0.1)).unwrap();
        let err = g
            .add_line("Red", 40.0, vec!["A".into(), "Twin".into()])
            .unwrap_err();
        assert!(matches!(err, TransitError::InvalidConnection(_)));
    }

    #[test]
    fn connect_validates_inputs() {
        let mut g = grid_graph();
        assert!(matches!(
            g.connect("A", "Ghost", "Red", 500.0),
            Err(TransitError::InvalidConnection(_))
        ));
        assert!(matches!(
            g.connect("A", "B", "Ghost line", 500.0),
            Err(TransitError::LineNotFound(_))
        ));
        assert!(matches!(
            g.connect("A", "B", "Red", 0.0),
            Err(TransitError::InvalidConnection(_))
        ));
        assert!(matches!(
            g.connect("A", "B", "Red", -3.0),
            Err(TransitError::InvalidConnection(_))
        ));
    }

    #[test]
    fn connect_overrides_edge_weight_symmetrically() {
        let mut g = grid_graph();
        g.connect("A", "B", "Red", 2000.0).unwrap();
        assert_eq!(g.edge_meters("Red", "A", "B"), Some(2000.0));
        assert_eq!(g.edge_meters("Red", "B", "A"), Some(2000.0));

        // 2 km at 40 km/h is exactly 3 minutes.
        let hops = g.neighbors("A");
        let to_b = hops.iter().find(|h| h.station == "B").unwrap();
        assert!((to_b.minutes - 3.0).abs() < 1e-9);
    }

    #[test]
    fn neighbors_are_sorted_and_symmetric() {
        let g = grid_graph();
        let from_b = g.neighbors("B");
        let names: Vec<_> = from_b.iter().map(|h| h.station.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        for hop in &from_b {
            assert!(hop.minutes > 0.0);
            assert!(hop.meters > 0.0);
        }
    }

    #[test]
    fn lines_through_station() {
        let mut g = grid_graph();
        g.add_line("Blue", 35.0, vec!["B".into(), "C".into()]).unwrap();
        let mut through_b: Vec<_> = g.lines_through("B").collect();
        through_b.sort();
        assert_eq!(through_b, ["Blue", "Red"]);
        assert_eq!(g.lines_through("A").count(), 1);
    }
}
