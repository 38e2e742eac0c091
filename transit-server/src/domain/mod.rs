//! Domain types for the transit route planner.
//!
//! Core value types shared by the graph and both planners. Types validate
//! their invariants at construction time, so downstream code can trust any
//! value it is handed.

mod coords;
mod error;
mod fare;
mod line;
mod path;
mod station;

pub use coords::Coordinates;
pub use error::TransitError;
pub use fare::FareSchedule;
pub use line::Line;
pub use path::Path;
pub use station::Station;
