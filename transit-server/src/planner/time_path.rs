//! Lowest-total-time route search.
//!
//! A Dijkstra search whose state is the pair (station, line currently
//! ridden), not the station alone: arriving somewhere on line L and
//! arriving there on line M are different states, because continuing on a
//! different line costs the transfer wait. Transfer accounting is a
//! property of the state transition rather than a loop variable.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::domain::{Path, TransitError};
use crate::graph::Network;

use super::config::SearchConfig;
use super::cost::{Deadline, assemble};

/// (station, line ridden to reach it); the line is `None` only at the
/// origin.
type State = (String, Option<String>);

/// Heap entry ordered for a min-heap: smallest cost pops first, with
/// station name then line id fixing the order of equal-cost entries so
/// repeated queries on an unchanged graph are reproducible.
#[derive(Debug, Clone, PartialEq)]
struct QueueEntry {
    cost: f64,
    station: String,
    line: Option<String>,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.station.cmp(&self.station))
            .then_with(|| other.line.cmp(&self.line))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes the single lowest-total-time path between two stations.
pub struct TimePlanner<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
}

impl<'a> TimePlanner<'a> {
    pub fn new(network: &'a Network, config: &'a SearchConfig) -> Self {
        Self { network, config }
    }

    /// The path minimizing edge time plus accumulated waits.
    pub fn shortest_path(&self, start: &str, end: &str) -> Result<Path, TransitError> {
        for station in [start, end] {
            if !self.network.graph.contains_station(station) {
                return Err(TransitError::StationNotFound(station.to_string()));
            }
        }
        if start == end {
            return Ok(Path::trivial(start));
        }

        let deadline = Deadline::starting_now(self.config.timeout);
        let index = &self.network.index;

        let mut best: HashMap<State, f64> = HashMap::new();
        let mut parent: HashMap<State, State> = HashMap::new();
        let mut queue = BinaryHeap::new();

        let origin: State = (start.to_string(), None);
        best.insert(origin, 0.0);
        queue.push(QueueEntry {
            cost: 0.0,
            station: start.to_string(),
            line: None,
        });

        while let Some(entry) = queue.pop() {
            deadline.check()?;

            let state: State = (entry.station.clone(), entry.line.clone());
            match best.get(&state) {
                Some(&cost) if cost < entry.cost => continue, // stale entry
                _ => {}
            }

            if entry.station == end {
                return self.reconstruct(&parent, state);
            }

            for hop in index.hops(&entry.station) {
                let mut cost = entry.cost + hop.minutes;
                if entry.station != start {
                    cost += self.config.stop_wait_mins;
                }
                if entry.line.as_deref().is_some_and(|line| line != hop.line) {
                    cost += self.config.transfer_wait_mins;
                }

                let next: State = (hop.station.clone(), Some(hop.line.clone()));
                if best.get(&next).is_none_or(|&known| cost < known) {
                    best.insert(next.clone(), cost);
                    parent.insert(next, state.clone());
                    queue.push(QueueEntry {
                        cost,
                        station: hop.station.clone(),
                        line: Some(hop.line.clone()),
                    });
                }
            }
        }

        Err(TransitError::no_route(start, end))
    }

    /// Walks the parent chain back to the origin and assembles the path.
    fn reconstruct(
        &self,
        parent: &HashMap<State, State>,
        terminal: State,
    ) -> Result<Path, TransitError> {
        let end = terminal.0.clone();
        let mut stations = Vec::new();
        let mut lines = Vec::new();

        let mut state = terminal;
        loop {
            stations.push(state.0.clone());
            match state.1.clone() {
                Some(line) => lines.push(line),
                None => break, // reached the origin state
            }
            match parent.get(&state) {
                Some(prev) => state = prev.clone(),
                None => break,
            }
        }
        stations.reverse();
        lines.reverse();

        assemble(&self.network.index, self.config, stations, lines)
            .ok_or(TransitError::no_route(state.0, end))
    }
}
