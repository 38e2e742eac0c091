//! Route planners.
//!
//! Two search strategies over the same graph and cost model: a Dijkstra
//! variant minimizing total travel time, and a budgeted enumeration
//! minimizing the number of line changes. Both treat (station, line) as
//! the search state so transfer costs fall out of state transitions.

mod config;
mod cost;
mod time_path;
mod transfers;

pub use config::SearchConfig;
pub use time_path::TimePlanner;
pub use transfers::TransferPlanner;
