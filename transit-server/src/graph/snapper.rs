//! Nearest-station lookup.

use crate::domain::Coordinates;

use super::network::NetworkGraph;

/// Result of a nearest-station scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Snap {
    pub station: String,
    pub distance_meters: f64,
}

/// Nearest-station lookup by geographic distance.
///
/// A full scan over the station table; station counts are in the hundreds,
/// so this is not a performance-critical path. Ties are broken by station
/// name so repeated scans are reproducible.
pub struct StationSnapper<'a> {
    graph: &'a NetworkGraph,
}

impl<'a> StationSnapper<'a> {
    pub fn new(graph: &'a NetworkGraph) -> Self {
        Self { graph }
    }

    /// The station nearest to `coords`, excluding `exclude` (normally the
    /// station being inserted). `None` when the station table is empty.
    pub fn nearest(&self, coords: &Coordinates, exclude: &str) -> Option<Snap> {
        self.nearest_of(
            coords,
            self.graph
                .stations()
                .map(|s| s.name.as_str())
                .filter(|name| *name != exclude),
        )
    }

    /// Nearest among an explicit candidate set, used for snapping onto the
    /// members of one line. Unknown candidate names are skipped.
    pub fn nearest_of<I>(&self, coords: &Coordinates, candidates: I) -> Option<Snap>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut best: Option<Snap> = None;
        for candidate in candidates {
            let name = candidate.as_ref();
            let Some(station) = self.graph.station(name) else {
                continue;
            };
            let distance = coords.distance_meters(&station.coords);
            let closer = match &best {
                None => true,
                Some(snap) => {
                    distance < snap.distance_meters
                        || (distance == snap.distance_meters && name < snap.station.as_str())
                }
            };
            if closer {
                best = Some(Snap {
                    station: name.to_string(),
                    distance_meters: distance,
                });
            }
        }
        best
    }
}
