//! Network topology: the graph, its derived route index, the snapshot
//! format, nearest-station lookup and the mutation path.

mod index;
mod mutator;
mod network;
mod snapper;
mod snapshot;

pub use index::{RouteIndex, StationLinks};
pub use mutator::{GraphMutator, InsertionOutcome, MutatorConfig, StationInsertion};
pub use network::{Hop, NetworkGraph};
pub use snapper::{Snap, StationSnapper};
pub use snapshot::{LineSnapshot, Snapshot, SnapshotError, StationSnapshot, sample_network};

use crate::domain::{Coordinates, TransitError};

/// The graph together with its derived adjacency index.
///
/// The pair is kept in lockstep: every mutation goes through
/// [`GraphMutator`], which refreshes the affected index entries before the
/// write lock is released, so readers never observe a stale index.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub graph: NetworkGraph,
    pub index: RouteIndex,
}

impl Network {
    /// Builds the graph and index from a snapshot, validating every
    /// invariant the snapshot format cannot express.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, TransitError> {
        let mut graph = NetworkGraph::new();
        for (name, station) in &snapshot.stations {
            graph.add_station(name.clone(), Coordinates::new(station.lat, station.lng)?)?;
        }
        for (id, line) in &snapshot.lines {
            graph.add_line(id.clone(), line.speed, line.stations.clone())?;
        }
        let index = RouteIndex::build(&graph);
        Ok(Self { graph, index })
    }

    /// Serializes the current tables back to the snapshot format.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self
                .graph
                .lines()
                .map(|line| {
                    (
                        line.id.clone(),
                        LineSnapshot {
                            speed: line.speed_kmh,
                            stations: line.stations().to_vec(),
                        },
                    )
                })
                .collect(),
            stations: self
                .graph
                .stations()
                .map(|station| {
                    (
                        station.name.clone(),
                        StationSnapshot {
                            lat: station.coords.lat(),
                            lng: station.coords.lng(),
                        },
                    )
                })
                .collect(),
        }
    }
}
