//! Transit network route planner.
//!
//! A web service answering "how do I get from station A to station B"
//! over a fixed-topology transit network, by lowest total time or fewest
//! line changes, with live insertion of new stations.

pub mod domain;
pub mod graph;
pub mod planner;
pub mod web;
