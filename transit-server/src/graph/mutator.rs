//! Station insertion.
//!
//! All mutation goes through [`GraphMutator`]: a request is validated and
//! turned into a complete post-insertion plan while the graph is untouched,
//! and only a plan that can no longer fail is applied. On any error the
//! graph and index are exactly as they were before the call.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{Coordinates, Line, Station, TransitError};

use super::network::NetworkGraph;
use super::snapper::StationSnapper;
use super::Network;

/// Tunables for the insertion fallback chain.
#[derive(Debug, Clone)]
pub struct MutatorConfig {
    /// A brand-new single-station line auto-connects to the nearest
    /// existing station only when it is at most this far away.
    pub auto_connect_radius_meters: f64,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            auto_connect_radius_meters: 5_000.0,
        }
    }
}

/// A request to insert one station onto an existing or brand-new line.
#[derive(Debug, Clone)]
pub struct StationInsertion {
    pub name: String,
    pub coords: Coordinates,
    /// Target line id; created when `new_line` is set.
    pub line: String,
    /// Average speed for a newly created line; ignored for existing lines.
    pub line_speed: Option<f64>,
    pub new_line: bool,
    /// Ordered existing stations seeding a brand-new multi-station line.
    pub seed_stations: Vec<String>,
    /// Explicit `{station → distance meters}` connection points. Ordered
    /// so anchor choice is deterministic.
    pub connections: BTreeMap<String, f64>,
}

/// What a successful insertion changed, for logging and the API message.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionOutcome {
    pub station: String,
    pub line: String,
    pub created_line: bool,
    /// Stations now adjacent to the new one, with effective edge meters.
    pub connected: Vec<(String, f64)>,
}

/// Where the new station lands in the line's ordered list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    Prepend,
    Append,
    After(usize),
}

/// A fully validated insertion, ready to apply without failure.
struct Plan {
    station: Station,
    line: Line,
    created_line: bool,
    overrides: Vec<(String, f64)>,
    /// (neighbor, effective meters) after insertion.
    neighbors: Vec<(String, f64)>,
}

/// Applies station/line insertion requests atomically.
pub struct GraphMutator<'a> {
    network: &'a mut Network,
    config: &'a MutatorConfig,
}

impl<'a> GraphMutator<'a> {
    pub fn new(network: &'a mut Network, config: &'a MutatorConfig) -> Self {
        Self { network, config }
    }

    /// Inserts a station per the request, republishing the affected index
    /// entries. Nothing is changed on error.
    pub fn insert_station(
        &mut self,
        request: &StationInsertion,
    ) -> Result<InsertionOutcome, TransitError> {
        let plan = self.plan(request)?;
        Ok(self.apply(plan))
    }

    fn plan(&self, request: &StationInsertion) -> Result<Plan, TransitError> {
        let graph = &self.network.graph;

        if request.name.is_empty() {
            return Err(TransitError::InvalidConnection(
                "station name must not be empty".into(),
            ));
        }
        if graph.contains_station(&request.name) {
            return Err(TransitError::DuplicateStation(request.name.clone()));
        }

        let (line, created_line) = self.target_line(request)?;
        let Some(line) = line else {
            // Brand-new line with no seed: solo station, auto-connected to
            // the nearest neighbor when one is in range.
            return self.plan_solo_line(request);
        };

        let placement = self.placement(request, &line)?;
        let neighbors = self.planned_neighbors(request, &line, placement)?;

        let mut line = line;
        match placement {
            Placement::Prepend => line.prepend(&request.name)?,
            Placement::Append => line.append(&request.name)?,
            Placement::After(position) => line.splice_after(position, &request.name)?,
        }

        Ok(Plan {
            station: Station::new(&request.name, request.coords),
            line,
            created_line,
            overrides: request
                .connections
                .iter()
                .map(|(station, meters)| (station.clone(), *meters))
                .collect(),
            neighbors,
        })
    }

    /// Resolves the target line: a clone of the existing one, a new seeded
    /// one, or `None` for the solo-line path.
    fn target_line(
        &self,
        request: &StationInsertion,
    ) -> Result<(Option<Line>, bool), TransitError> {
        let graph = &self.network.graph;

        if !request.new_line {
            let line = graph
                .line(&request.line)
                .ok_or_else(|| TransitError::LineNotFound(request.line.clone()))?;
            return Ok((Some(line.clone()), false));
        }

        if graph.contains_line(&request.line) {
            return Err(TransitError::DuplicateLine(request.line.clone()));
        }
        let speed = request.line_speed.ok_or_else(|| {
            TransitError::InvalidConnection(format!(
                "new line {} requires a speed",
                request.line
            ))
        })?;

        if request.seed_stations.is_empty() {
            return Ok((None, true));
        }

        for station in &request.seed_stations {
            if !graph.contains_station(station) {
                return Err(TransitError::StationNotFound(station.clone()));
            }
        }
        let line = Line::new(&request.line, speed, request.seed_stations.clone())?;
        for (a, b) in line.segments() {
            if graph.edge_meters(&line.id, a, b).unwrap_or(0.0) <= 0.0 {
                return Err(TransitError::InvalidConnection(format!(
                    "stations {a} and {b} are co-located; edge length must be positive"
                )));
            }
        }
        Ok((Some(line), true))
    }

    fn plan_solo_line(&self, request: &StationInsertion) -> Result<Plan, TransitError> {
        let graph = &self.network.graph;
        let speed = request.line_speed.ok_or_else(|| {
            TransitError::InvalidConnection(format!(
                "new line {} requires a speed",
                request.line
            ))
        })?;

        let snapper = StationSnapper::new(graph);
        let snap = snapper
            .nearest(&request.coords, &request.name)
            .filter(|snap| {
                snap.distance_meters > 0.0
                    && snap.distance_meters <= self.config.auto_connect_radius_meters
            });

        let (stations, neighbors) = match snap {
            Some(snap) => (
                vec![snap.station.clone(), request.name.clone()],
                vec![(snap.station, snap.distance_meters)],
            ),
            None => (vec![request.name.clone()], Vec::new()),
        };

        Ok(Plan {
            station: Station::new(&request.name, request.coords),
            line: Line::new(&request.line, speed, stations)?,
            created_line: true,
            overrides: Vec::new(),
            neighbors,
        })
    }

    /// Chooses the insertion point: explicit connections first, else the
    /// nearest member of the line. Head and tail anchors win over interior
    /// splices so line extension stays expressible.
    fn placement(
        &self,
        request: &StationInsertion,
        line: &Line,
    ) -> Result<Placement, TransitError> {
        if !request.connections.is_empty() {
            for (station, meters) in &request.connections {
                if !line.contains(station) {
                    return Err(TransitError::InvalidConnection(format!(
                        "station {station} is not on line {}",
                        line.id
                    )));
                }
                if !(*meters > 0.0) || !meters.is_finite() {
                    return Err(TransitError::InvalidConnection(format!(
                        "distance to {station} must be positive"
                    )));
                }
            }
            if request.connections.contains_key(line.first()) {
                return Ok(Placement::Prepend);
            }
            if request.connections.contains_key(line.last()) {
                return Ok(Placement::Append);
            }
            let anchor = request.connections.keys().next().ok_or_else(|| {
                TransitError::InvalidConnection("at least one connection is required".into())
            })?;
            let position = line.position(anchor).ok_or_else(|| {
                TransitError::InvalidConnection(format!(
                    "station {anchor} is not on line {}",
                    line.id
                ))
            })?;
            return Ok(Placement::After(position));
        }

        let snapper = StationSnapper::new(&self.network.graph);
        let snap = snapper
            .nearest_of(&request.coords, line.stations())
            .ok_or_else(|| {
                TransitError::InvalidConnection(format!(
                    "line {} has no stations to connect to",
                    line.id
                ))
            })?;
        if snap.station == line.first() {
            Ok(Placement::Prepend)
        } else if snap.station == line.last() {
            Ok(Placement::Append)
        } else {
            let position = line.position(&snap.station).ok_or_else(|| {
                TransitError::InvalidConnection(format!(
                    "station {} is not on line {}",
                    snap.station, line.id
                ))
            })?;
            Ok(Placement::After(position))
        }
    }

    /// The stations adjacent to the new one after insertion, with their
    /// effective edge lengths, each validated strictly positive.
    fn planned_neighbors(
        &self,
        request: &StationInsertion,
        line: &Line,
        placement: Placement,
    ) -> Result<Vec<(String, f64)>, TransitError> {
        let members = line.stations();
        let adjacent: Vec<&String> = match placement {
            Placement::Prepend => vec![&members[0]],
            Placement::Append => vec![&members[members.len() - 1]],
            Placement::After(position) => {
                let mut stations = vec![&members[position]];
                if let Some(next) = members.get(position + 1) {
                    stations.push(next);
                }
                stations
            }
        };

        let mut neighbors = Vec::with_capacity(adjacent.len());
        for station in adjacent {
            let meters = match request.connections.get(station) {
                Some(meters) => *meters,
                None => self.derived_meters(&request.coords, station)?,
            };
            if meters <= 0.0 {
                return Err(TransitError::InvalidConnection(format!(
                    "stations {} and {station} are co-located; edge length must be positive",
                    request.name
                )));
            }
            neighbors.push((station.clone(), meters));
        }
        Ok(neighbors)
    }

    fn derived_meters(
        &self,
        coords: &Coordinates,
        station: &str,
    ) -> Result<f64, TransitError> {
        let target = self
            .network
            .graph
            .station(station)
            .ok_or_else(|| TransitError::StationNotFound(station.to_string()))?;
        Ok(coords.distance_meters(&target.coords))
    }

    fn apply(&mut self, plan: Plan) -> InsertionOutcome {
        let outcome = InsertionOutcome {
            station: plan.station.name.clone(),
            line: plan.line.id.clone(),
            created_line: plan.created_line,
            connected: plan.neighbors.clone(),
        };

        let graph: &mut NetworkGraph = &mut self.network.graph;
        graph.insert_station_unchecked(plan.station);
        for (station, meters) in &plan.overrides {
            graph.set_override(&outcome.line, &outcome.station, station, *meters);
        }

        // A created line gives every member a new membership (and, when
        // seeded, new edges), so all of them are refreshed; extending an
        // existing line only touches the new station and its neighbors.
        let refresh: Vec<String> = if plan.created_line {
            plan.line.stations().to_vec()
        } else {
            std::iter::once(outcome.station.clone())
                .chain(plan.neighbors.into_iter().map(|(station, _)| station))
                .collect()
        };
        graph.insert_line_unchecked(plan.line);
        self.network.index.refresh(&self.network.graph, &refresh);

        info!(
            station = %outcome.station,
            line = %outcome.line,
            created_line = outcome.created_line,
            connections = outcome.connected.len(),
            "station inserted"
        );
        outcome
    }
}
