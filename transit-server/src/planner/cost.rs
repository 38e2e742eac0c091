//! Shared path assembly: line assignment and metric computation.
//!
//! Both planners produce raw station sequences (with or without line
//! choices); the functions here turn them into finished [`Path`] values
//! with one consistent cost model, so the two planners can never disagree
//! about what a given route costs.

use std::time::{Duration, Instant};

use crate::domain::{Path, TransitError};
use crate::graph::RouteIndex;

use super::config::SearchConfig;

/// A query deadline. `check` is called from every search loop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline(Option<Instant>);

impl Deadline {
    pub(crate) fn starting_now(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    pub(crate) fn check(&self) -> Result<(), TransitError> {
        match self.0 {
            Some(at) if Instant::now() > at => Err(TransitError::ComputationTimeout),
            _ => Ok(()),
        }
    }
}

/// Picks a line for every hop of a station sequence, minimizing the number
/// of line changes; ties prefer staying on the current line, then the
/// lexicographically smallest id. Returns `None` when some consecutive
/// pair shares no line.
pub(crate) fn line_assignment(index: &RouteIndex, stations: &[String]) -> Option<Vec<String>> {
    if stations.len() < 2 {
        return Some(Vec::new());
    }

    // Candidate lines per hop, in fixed (sorted) order.
    let mut hop_lines: Vec<Vec<&str>> = Vec::with_capacity(stations.len() - 1);
    for pair in stations.windows(2) {
        let lines: Vec<&str> = index
            .hops_between(&pair[0], &pair[1])
            .map(|hop| hop.line.as_str())
            .collect();
        if lines.is_empty() {
            return None;
        }
        hop_lines.push(lines);
    }

    // dp[i][j] = fewest changes for hops 0..=i ending on hop_lines[i][j].
    let mut dp: Vec<Vec<usize>> = Vec::with_capacity(hop_lines.len());
    dp.push(vec![0; hop_lines[0].len()]);
    for i in 1..hop_lines.len() {
        let row: Vec<usize> = hop_lines[i]
            .iter()
            .map(|line| {
                hop_lines[i - 1]
                    .iter()
                    .zip(&dp[i - 1])
                    .map(|(prev, &cost)| cost + usize::from(prev != line))
                    .min()
                    .unwrap_or(usize::MAX)
            })
            .collect();
        dp.push(row);
    }

    // Backtrack, preferring to stay on the line chosen downstream.
    let last = hop_lines.len() - 1;
    let mut j = (0..hop_lines[last].len()).min_by_key(|&j| (dp[last][j], hop_lines[last][j]))?;
    let mut assigned = vec![hop_lines[last][j]; hop_lines.len()];
    for i in (1..hop_lines.len()).rev() {
        let choice = hop_lines[i][j];
        let target = dp[i][j];
        j = (0..hop_lines[i - 1].len())
            .filter(|&k| dp[i - 1][k] + usize::from(hop_lines[i - 1][k] != choice) == target)
            .min_by_key(|&k| (hop_lines[i - 1][k] != choice, hop_lines[i - 1][k]))?;
        assigned[i - 1] = hop_lines[i - 1][j];
    }

    Some(assigned.into_iter().map(String::from).collect())
}

/// Computes a finished path from a station sequence and its per-hop lines.
///
/// One hop costs its edge minutes; departing any intermediate station adds
/// the stop wait, and departing on a different line than the arriving one
/// adds the transfer wait. Returns `None` when the hops are not in the
/// index (the graph changed under the caller, which the locking model
/// prevents).
pub(crate) fn assemble(
    index: &RouteIndex,
    config: &SearchConfig,
    stations: Vec<String>,
    lines: Vec<String>,
) -> Option<Path> {
    if stations.len() != lines.len() + 1 {
        return None;
    }
    if lines.is_empty() {
        let station = stations.into_iter().next()?;
        return Some(Path::trivial(station));
    }

    let mut total_minutes = 0.0;
    let mut wait_minutes = 0.0;
    let mut distance_meters = 0.0;
    let mut transfers = 0;

    for i in 0..lines.len() {
        let hop = index
            .hops_between(&stations[i], &stations[i + 1])
            .find(|hop| hop.line == lines[i])?;
        total_minutes += hop.minutes;
        distance_meters += hop.meters;

        if i > 0 {
            total_minutes += config.stop_wait_mins;
            wait_minutes += config.stop_wait_mins;
            if lines[i] != lines[i - 1] {
                total_minutes += config.transfer_wait_mins;
                wait_minutes += config.transfer_wait_mins;
                transfers += 1;
            }
        }
    }

    let fare = config.fares.fare(distance_meters, transfers);
    Some(Path {
        stations,
        lines,
        total_minutes,
        transfers,
        wait_minutes,
        distance_meters,
        fare,
    })
}

/// Assigns lines and assembles in one step, for callers that only have a
/// station sequence.
pub(crate) fn build_path(
    index: &RouteIndex,
    config: &SearchConfig,
    stations: Vec<String>,
) -> Option<Path> {
    let lines = line_assignment(index, &stations)?;
    assemble(index, config, stations, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::graph::{NetworkGraph, RouteIndex};

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    /// Two lines sharing the B-C-D stretch; Express also covers A-B.
    fn index() -> RouteIndex {
        let mut g = NetworkGraph::new();
        for (name, lat) in [("A", 51.50), ("B", 51.51), ("C", 51.52), ("D", 51.53)] {
            g.add_station(name, coords(lat, -0.10)).unwrap();
        }
        g.add_line(
            "Express",
            40.0,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
        )
        .unwrap();
        g.add_line("Local", 40.0, vec!["B".into(), "C".into(), "D".into()])
            .unwrap();
        RouteIndex::build(&g)
    }

    fn seq(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assignment_stays_on_one_line() {
        let index = index();
        let lines = line_assignment(&index, &seq(&["A", "B", "C", "D"])).unwrap();
        assert_eq!(lines, ["Express", "Express", "Express"]);
    }

    #[test]
    fn assignment_prefers_smallest_line_on_ties() {
        let index = index();
        // B-C-D is covered by both lines with zero transfers either way.
        let lines = line_assignment(&index, &seq(&["B", "C", "D"])).unwrap();
        assert_eq!(lines, ["Express", "Express"]);
    }

    #[test]
    fn assignment_fails_without_shared_line() {
        let index = index();
        assert!(line_assignment(&index, &seq(&["A", "D"])).is_none());
    }

    #[test]
    fn trivial_sequences() {
        let index = index();
        assert_eq!(line_assignment(&index, &seq(&["A"])).unwrap(), Vec::<String>::new());
        let path = build_path(&index, &SearchConfig::default(), seq(&["A"])).unwrap();
        assert_eq!(path, crate::domain::Path::trivial("A"));
    }

    #[test]
    fn assemble_accumulates_waits() {
        let index = index();
        let config = SearchConfig {
            stop_wait_mins: 1.0,
            transfer_wait_mins: 5.0,
            ..SearchConfig::default()
        };
        let path = assemble(
            &index,
            &config,
            seq(&["A", "B", "C"]),
            vec!["Express".into(), "Local".into()],
        )
        .unwrap();
        assert_eq!(path.transfers, 1);
        // One intermediate stop plus one transfer.
        assert!((path.wait_minutes - 6.0).abs() < 1e-9);
        assert!(path.total_minutes > path.wait_minutes);
    }

    #[test]
    fn assemble_rejects_mismatched_lengths() {
        let index = index();
        let config = SearchConfig::default();
        assert!(assemble(&index, &config, seq(&["A", "B"]), vec![]).is_none());
    }

    #[test]
    fn deadline_expires() {
        let deadline = Deadline::starting_now(Some(Duration::from_millis(0)));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(deadline.check(), Err(TransitError::ComputationTimeout));

        let unlimited = Deadline::starting_now(None);
        assert!(unlimited.check().is_ok());
    }
}
