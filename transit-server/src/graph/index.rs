//! Per-station adjacency index.
//!
//! A derived view over [`NetworkGraph`]: for each station, the lines
//! passing through it and its one-hop neighbors with edge weights. Built
//! once at load and refreshed per station after a mutation, so mutation
//! cost stays proportional to the size of the change. Hops are kept sorted
//! by (neighbor, line) to fix planner enumeration order.

use std::collections::{BTreeSet, HashMap};

use super::network::{Hop, NetworkGraph};

/// Index entry for one station.
#[derive(Debug, Clone, Default)]
pub struct StationLinks {
    /// Ids of the lines passing through the station.
    pub lines: BTreeSet<String>,
    /// Outgoing hops, sorted by (neighbor name, line id).
    pub hops: Vec<Hop>,
}

/// Adjacency and line-membership view over the whole network.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    entries: HashMap<String, StationLinks>,
}

impl RouteIndex {
    /// Builds the full index from the graph.
    pub fn build(graph: &NetworkGraph) -> Self {
        let mut index = Self::default();
        for station in graph.stations() {
            index.entries.insert(
                station.name.clone(),
                Self::entry_for(graph, &station.name),
            );
        }
        index
    }

    /// Recomputes the entries for the given stations only.
    pub fn refresh<I>(&mut self, graph: &NetworkGraph, stations: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for station in stations {
            let name = station.as_ref();
            if graph.contains_station(name) {
                self.entries
                    .insert(name.to_string(), Self::entry_for(graph, name));
            }
        }
    }

    fn entry_for(graph: &NetworkGraph, station: &str) -> StationLinks {
        StationLinks {
            lines: graph.lines_through(station).map(String::from).collect(),
            hops: graph.neighbors(station),
        }
    }

    pub fn links(&self, station: &str) -> Option<&StationLinks> {
        self.entries.get(station)
    }

    /// Outgoing hops of a station; empty for unknown stations.
    pub fn hops(&self, station: &str) -> &[Hop] {
        self.entries
            .get(station)
            .map(|links| links.hops.as_slice())
            .unwrap_or(&[])
    }

    /// The hops joining two specific stations, sorted by line id.
    pub fn hops_between<'a>(&'a self, from: &str, to: &str) -> impl Iterator<Item = &'a Hop> {
        let to = to.to_string();
        self.hops(from)
            .iter()
            .filter(move |hop| hop.station == to)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
