//! The durable snapshot format.
//!
//! A snapshot is the sole persistent representation of the network: a line
//! table keyed by line id and a station table keyed by name. The in-memory
//! graph is built from it at startup and can be serialized back for reload.
//! Distance overrides are runtime state and are not part of the format.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TransitError;

/// One line in the snapshot: average speed plus the ordered station list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSnapshot {
    pub speed: f64,
    pub stations: Vec<String>,
}

/// One station in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationSnapshot {
    pub lat: f64,
    pub lng: f64,
}

/// The serializable station/line tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Snapshot {
    pub lines: BTreeMap<String, LineSnapshot>,
    pub stations: BTreeMap<String, StationSnapshot>,
}

/// Failure loading or saving a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but violates a graph invariant.
    #[error(transparent)]
    Invalid(#[from] TransitError),
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SnapshotError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Serializes the snapshot to a file, pretty-printed.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, text).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// A small built-in network used when no snapshot file is configured.
///
/// Three lines crossing at Cathedral, Central and Northfield, spaced at
/// plausible metro distances.
pub fn sample_network() -> Snapshot {
    let stations = [
        ("Airport", 51.560, -0.145),
        ("Cathedral", 51.514, -0.128),
        ("Central", 51.515, -0.112),
        ("Dockside", 51.514, -0.078),
        ("Eastmarket", 51.516, -0.095),
        ("Northfield", 51.540, -0.120),
        ("Oldbrook", 51.513, -0.143),
        ("Riverbank", 51.500, -0.133),
        ("Southquay", 51.487, -0.136),
        ("Stadium", 51.498, -0.098),
        ("Westgate", 51.512, -0.160),
    ];
    let lines = [
        (
            "Line 1",
            40.0,
            vec![
                "Westgate",
                "Oldbrook",
                "Cathedral",
                "Central",
                "Eastmarket",
                "Dockside",
            ],
        ),
        (
            "Line 2",
            35.0,
            vec!["Northfield", "Cathedral", "Riverbank", "Southquay"],
        ),
        ("Line 3", 45.0, vec!["Airport", "Northfield", "Central", "Stadium"]),
    ];

    Snapshot {
        stations: stations
            .into_iter()
            .map(|(name, lat, lng)| (name.to_string(), StationSnapshot { lat, lng }))
            .collect(),
        lines: lines
            .into_iter()
            .map(|(id, speed, stations)| {
                (
                    id.to_string(),
                    LineSnapshot {
                        speed,
                        stations: stations.into_iter().map(String::from).collect(),
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");

        let snapshot = sample_network();
        snapshot.to_file(&path).unwrap();
        let reloaded = Snapshot::from_file(&path).unwrap();
        assert_eq!(snapshot, reloaded);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Snapshot::from_file("/nonexistent/network.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/network.json"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Snapshot::from_file(&path),
            Err(SnapshotError::Parse { .. })
        ));
    }

    #[test]
    fn sample_network_is_consistent() {
        let snapshot = sample_network();
        for line in snapshot.lines.values() {
            for station in &line.stations {
                assert!(
                    snapshot.stations.contains_key(station),
                    "line references unknown station {station}"
                );
            }
        }
    }
}
