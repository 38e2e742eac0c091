//! Error types for the transit core.
//!
//! Planners and the graph mutator return these typed failures; they never
//! substitute an empty or zero-cost path for an error. The web layer maps
//! each variant onto the wire contract.

/// Failures surfaced by queries and mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitError {
    /// A named start, end or connection station is not in the network.
    #[error("station not found: {0}")]
    StationNotFound(String),

    /// The target line id does not exist.
    #[error("line not found: {0}")]
    LineNotFound(String),

    /// No connecting path exists, or none within the bounded transfer search.
    #[error("no route found from {start} to {end}")]
    NoRouteFound { start: String, end: String },

    /// A station with this name already exists.
    #[error("station already exists: {0}")]
    DuplicateStation(String),

    /// A line with this id already exists.
    #[error("line already exists: {0}")]
    DuplicateLine(String),

    /// Non-positive distance, or a named connection station not on the
    /// target line.
    #[error("invalid connection: {0}")]
    InvalidConnection(String),

    /// Latitude/longitude out of range or not finite.
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// The query exceeded its configured deadline.
    #[error("route computation exceeded the configured deadline")]
    ComputationTimeout,
}

impl TransitError {
    /// Convenience constructor for route failures.
    pub fn no_route(start: impl Into<String>, end: impl Into<String>) -> Self {
        TransitError::NoRouteFound {
            start: start.into(),
            end: end.into(),
        }
    }
}
