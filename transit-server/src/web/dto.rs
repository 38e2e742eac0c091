//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Path;

/// Optimization criterion for a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Time,
    Transfers,
}

/// Request to plan a route.
#[derive(Debug, Deserialize)]
pub struct RouteQueryRequest {
    /// Start station name
    pub start: String,

    /// End station name
    pub end: String,

    /// Optimization mode (defaults to lowest time)
    #[serde(default)]
    pub mode: QueryMode,
}

/// One planned route on the wire.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// Ordered station names
    pub path: Vec<String>,

    /// Line ridden on each hop
    pub lines: Vec<String>,

    /// Total travel time in minutes, waits included
    pub time: f64,

    /// Number of line changes
    pub transfers: usize,

    /// Accumulated wait time in minutes
    pub wait_time: f64,

    /// Fare for the trip
    pub fare: f64,
}

impl RouteResult {
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.stations.clone(),
            lines: path.lines.clone(),
            time: path.total_minutes,
            transfers: path.transfers,
            wait_time: path.wait_minutes,
            fare: path.fare,
        }
    }
}

/// Response for transfer-minimizing queries: ranked alternatives.
#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub all_paths: Vec<RouteResult>,
}

/// Error body for any failed query.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The station part of an insertion request.
#[derive(Debug, Deserialize)]
pub struct StationBody {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// The line part of an insertion request.
#[derive(Debug, Deserialize)]
pub struct LineBody {
    pub name: String,

    /// Average speed in km/h; required only when creating a line
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Request to insert a station onto an existing or brand-new line.
#[derive(Debug, Deserialize)]
pub struct InsertStationRequest {
    pub station: StationBody,

    pub line: LineBody,

    #[serde(rename = "isNewLine", default)]
    pub is_new_line: bool,

    /// Ordered existing stations seeding a brand-new line
    #[serde(rename = "lineStations", default)]
    pub line_stations: Vec<String>,

    /// Explicit connection points: station name to distance in meters
    #[serde(default)]
    pub connections: BTreeMap<String, f64>,
}

/// Outcome of a mutation request.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

/// One station in the `/stations` listing.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub name: String,
    pub lines: Vec<String>,
}
