//! Fewest-line-changes route search.
//!
//! Explores by increasing transfer budget: at budget k, a depth-first
//! enumeration of simple station sequences where staying on a line is free
//! and switching lines consumes one unit. The first budget that yields any
//! complete sequence is minimal, and only sequences found at that budget
//! are kept; they are deduplicated exactly, given a minimal-transfer line
//! assignment, ranked by total time and truncated to the configured cap.

use std::collections::{BTreeSet, HashSet};

use crate::domain::{Path, TransitError};
use crate::graph::Network;

use super::config::SearchConfig;
use super::cost::{Deadline, build_path};

/// Enumerates up to a bounded number of distinct minimal-transfer paths.
pub struct TransferPlanner<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
}

impl<'a> TransferPlanner<'a> {
    pub fn new(network: &'a Network, config: &'a SearchConfig) -> Self {
        Self { network, config }
    }

    /// Every distinct path achieving the minimum possible number of line
    /// changes, ranked ascending by (transfers, time), at most
    /// `max_alternatives` of them.
    ///
    /// The search gives up past `max_transfers` changes; that bound is a
    /// documented design limit, reported as `NoRouteFound`.
    pub fn fewest_transfers(&self, start: &str, end: &str) -> Result<Vec<Path>, TransitError> {
        for station in [start, end] {
            if !self.network.graph.contains_station(station) {
                return Err(TransitError::StationNotFound(station.to_string()));
            }
        }
        if start == end {
            return Ok(vec![Path::trivial(start)]);
        }

        let deadline = Deadline::starting_now(self.config.timeout);

        let mut sequences = BTreeSet::new();
        for budget in 0..=self.config.max_transfers {
            sequences = self.enumerate(start, end, budget, &deadline)?;
            if !sequences.is_empty() {
                break;
            }
        }
        if sequences.is_empty() {
            return Err(TransitError::no_route(start, end));
        }

        let mut paths: Vec<Path> = sequences
            .into_iter()
            .filter_map(|stations| build_path(&self.network.index, self.config, stations))
            .collect();
        paths.sort_by(|a, b| {
            a.transfers
                .cmp(&b.transfers)
                .then_with(|| a.total_minutes.total_cmp(&b.total_minutes))
                .then_with(|| a.stations.cmp(&b.stations))
        });
        paths.truncate(self.config.max_alternatives);

        if paths.is_empty() {
            return Err(TransitError::no_route(start, end));
        }
        Ok(paths)
    }

    /// All simple station sequences from `start` to `end` using at most
    /// `budget` line changes. The set is ordered, so callers inherit a
    /// fixed result order.
    fn enumerate(
        &self,
        start: &str,
        end: &str,
        budget: usize,
        deadline: &Deadline,
    ) -> Result<BTreeSet<Vec<String>>, TransitError> {
        let mut found = BTreeSet::new();
        let mut trail = vec![start.to_string()];
        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        self.explore(
            start, None, budget, end, deadline, &mut trail, &mut visited, &mut found,
        )?;
        Ok(found)
    }

    #[allow(clippy::too_many_arguments)]
    fn explore(
        &self,
        station: &str,
        line: Option<&str>,
        budget: usize,
        end: &str,
        deadline: &Deadline,
        trail: &mut Vec<String>,
        visited: &mut HashSet<String>,
        found: &mut BTreeSet<Vec<String>>,
    ) -> Result<(), TransitError> {
        deadline.check()?;

        for hop in self.network.index.hops(station) {
            let switches = line.is_some_and(|line| line != hop.line);
            if switches && budget == 0 {
                continue;
            }
            if visited.contains(&hop.station) {
                continue;
            }

            trail.push(hop.station.clone());
            if hop.station == end {
                found.insert(trail.clone());
            } else {
                visited.insert(hop.station.clone());
                self.explore(
                    &hop.station,
                    Some(&hop.line),
                    budget - usize::from(switches),
                    end,
                    deadline,
                    trail,
                    visited,
                    found,
                )?;
                visited.remove(&hop.station);
            }
            trail.pop();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LineSnapshot, Snapshot, StationSnapshot, sample_network};
    use crate::planner::TimePlanner;

    fn network() -> Network {
        Network::from_snapshot(&sample_network()).unwrap()
    }

    fn plan(network: &Network, start: &str, end: &str) -> Result<Vec<Path>, TransitError> {
        let config = SearchConfig::default();
        TransferPlanner::new(network, &config).fewest_transfers(start, end)
    }

    #[test]
    fn self_route_is_trivial() {
        let network = network();
        let paths = plan(&network, "Airport", "Airport").unwrap();
        assert_eq!(paths, vec![Path::trivial("Airport")]);
    }

    #[test]
    fn same_line_needs_no_transfers() {
        let network = network();
        let paths = plan(&network, "Westgate", "Dockside").unwrap();
        assert!(!paths.is_empty());
        for path in &paths {
            assert_eq!(path.transfers, 0);
        }
    }

    #[test]
    fn minimal_transfer_count_is_found() {
        let network = network();
        // Southquay (Line 2 only) to Stadium (Line 3 only): one change at
        // Northfield.
        let paths = plan(&network, "Southquay", "Stadium").unwrap();
        for path in &paths {
            assert_eq!(path.transfers, 1);
        }
    }

    #[test]
    fn no_duplicate_station_sequences() {
        let network = network();
        let paths = plan(&network, "Airport", "Dockside").unwrap();
        let mut seen = std::collections::HashSet::new();
        for path in &paths {
            assert!(seen.insert(path.stations.clone()), "duplicate {:?}", path.stations);
        }
    }

    #[test]
    fn ranked_by_transfers_then_time() {
        let network = network();
        let paths = plan(&network, "Airport", "Dockside").unwrap();
        for pair in paths.windows(2) {
            assert!(
                (pair[0].transfers, pair[0].total_minutes)
                    <= (pair[1].transfers, pair[1].total_minutes)
            );
        }
    }

    #[test]
    fn respects_alternative_cap() {
        let network = network();
        let config = SearchConfig {
            max_alternatives: 1,
            ..SearchConfig::default()
        };
        let paths = TransferPlanner::new(&network, &config)
            .fewest_transfers("Westgate", "Stadium")
            .unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn time_planner_never_beaten() {
        // The lowest-time path is a lower bound for every alternative.
        let network = network();
        let config = SearchConfig::default();
        let stations: Vec<String> = {
            let mut names: Vec<_> =
                network.graph.stations().map(|s| s.name.clone()).collect();
            names.sort();
            names
        };
        for a in &stations {
            for b in &stations {
                let quickest = TimePlanner::new(&network, &config).shortest_path(a, b);
                let alternatives =
                    TransferPlanner::new(&network, &config).fewest_transfers(a, b);
                let (Ok(quickest), Ok(alternatives)) = (quickest, alternatives) else {
                    continue;
                };
                for path in alternatives {
                    assert!(
                        quickest.total_minutes <= path.total_minutes + 1e-9,
                        "{a}->{b}: {} > {}",
                        quickest.total_minutes,
                        path.total_minutes
                    );
                }
            }
        }
    }

    #[test]
    fn disjoint_lines_are_no_route() {
        let mut snapshot = Snapshot::default();
        for (name, lat, lng) in [
            ("A", 51.50, -0.10),
            ("B", 51.51, -0.10),
            ("X", 51.50, 0.20),
            ("Y", 51.51, 0.20),
        ] {
            snapshot
                .stations
                .insert(name.into(), StationSnapshot { lat, lng });
        }
        snapshot.lines.insert(
            "West".into(),
            LineSnapshot {
                speed: 40.0,
                stations: vec!["A".into(), "B".into()],
            },
        );
        snapshot.lines.insert(
            "East".into(),
            LineSnapshot {
                speed: 40.0,
                stations: vec!["X".into(), "Y".into()],
            },
        );
        let network = Network::from_snapshot(&snapshot).unwrap();

        assert_eq!(
            plan(&network, "A", "Y").unwrap_err(),
            TransitError::no_route("A", "Y")
        );
    }

    #[test]
    fn budget_bound_is_reported_as_no_route() {
        // A chain of single-hop lines needing three changes; with the
        // budget lowered to 1 the search must give up, not loop.
        let mut snapshot = Snapshot::default();
        let names = ["A", "B", "C", "D", "E"];
        for (i, name) in names.iter().enumerate() {
            snapshot.stations.insert(
                (*name).into(),
                StationSnapshot {
                    lat: 51.50 + i as f64 * 0.01,
                    lng: -0.10,
                },
            );
        }
        for (i, pair) in names.windows(2).enumerate() {
            snapshot.lines.insert(
                format!("Shuttle {i}"),
                LineSnapshot {
                    speed: 40.0,
                    stations: vec![pair[0].to_string(), pair[1].to_string()],
                },
            );
        }
        let network = Network::from_snapshot(&snapshot).unwrap();

        let config = SearchConfig {
            max_transfers: 1,
            ..SearchConfig::default()
        };
        assert_eq!(
            TransferPlanner::new(&network, &config)
                .fewest_transfers("A", "E")
                .unwrap_err(),
            TransitError::no_route("A", "E")
        );

        // The default budget of 3 is enough.
        let paths = plan(&network, "A", "E").unwrap();
        assert_eq!(paths[0].transfers, 3);
    }

    #[test]
    fn insertion_preserves_reachability() {
        use crate::graph::{GraphMutator, MutatorConfig, StationInsertion};
        use std::collections::BTreeMap;

        let mut network = network();
        let config = SearchConfig::default();

        let stations: Vec<String> = {
            let mut names: Vec<_> =
                network.graph.stations().map(|s| s.name.clone()).collect();
            names.sort();
            names
        };
        let reachable: Vec<(String, String)> = stations
            .iter()
            .flat_map(|a| stations.iter().map(move |b| (a.clone(), b.clone())))
            .filter(|(a, b)| {
                TimePlanner::new(&network, &config)
                    .shortest_path(a, b)
                    .is_ok()
            })
            .collect();

        let insertion = StationInsertion {
            name: "Midtown".into(),
            coords: crate::domain::Coordinates::new(51.5145, -0.120).unwrap(),
            line: "Line 1".into(),
            line_speed: None,
            new_line: false,
            seed_stations: Vec::new(),
            connections: BTreeMap::from([("Cathedral".into(), 700.0)]),
        };
        let mutator_config = MutatorConfig::default();
        GraphMutator::new(&mut network, &mutator_config)
            .insert_station(&insertion)
            .unwrap();

        for (a, b) in reachable {
            assert!(
                TimePlanner::new(&network, &config).shortest_path(&a, &b).is_ok(),
                "{a}->{b} became unreachable"
            );
        }
    }
}
