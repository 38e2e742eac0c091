//! Station records.

use super::Coordinates;

/// A named point in the network with geographic coordinates.
///
/// Stations are identified by name and are never deleted in normal
/// operation; their line membership is derived, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub coords: Coordinates,
}

impl Station {
    pub fn new(name: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }
}
