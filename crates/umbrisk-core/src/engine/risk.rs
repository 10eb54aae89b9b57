//! Percept-consistent hazard risk over grid frontiers.
//!
//! The estimator models each frontier cell with one boolean "hazard present"
//! indicator and scores a target cell by enumerating every assignment of the
//! remaining indicators, dropping assignments that contradict recorded
//! percepts, and summing the weights of the survivors.
//!
//! ## Model
//!
//! - Each indicator is an independent Bernoulli with one fixed global prior.
//!   This is the agent's epistemic model, not ground truth: the prior is
//!   deliberately NOT derived from whatever distribution generated the
//!   world, and no per-cell conditional tables are involved.
//! - A candidate assignment is *consistent* when, for every visited cell
//!   with a recorded percept, the percept equals "at least one grid-adjacent
//!   cell is hazardous in the assignment". Cells the assignment does not
//!   cover (visited cells, off-grid coordinates) count as non-hazardous.
//! - Scores are unnormalized sums of assignment weights, comparable only
//!   within the same evidence snapshot.
//!
//! Cost is `O(2^(f-1))` for a frontier of `f` cells. Frontier iteration and
//! tie-breaking are deterministic: cells order lexicographically by
//! coordinate.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::errors::InferError;
use crate::engine::events::all_events;
use crate::engine::network::{Evidence, Value, Variable};

/// A grid coordinate.
///
/// The derived `Ord` is lexicographic by `(x, y)`, which fixes frontier
/// iteration order and minimum-risk tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The four grid-adjacent coordinates, in a fixed order.
    pub fn adjacent(&self) -> [Cell; 4] {
        [
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x, self.y - 1),
            Cell::new(self.x, self.y + 1),
        ]
    }

    /// Name of this cell's hazard indicator variable.
    fn indicator(&self) -> String {
        format!("hazard_{}_{}", self.x, self.y)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Scores frontier cells by how likely they are to hide a hazard, given
/// boolean percept evidence recorded at visited cells.
#[derive(Debug, Clone)]
pub struct RiskEstimator {
    prior: f64,
    percepts: BTreeMap<Cell, bool>,
}

impl RiskEstimator {
    /// Creates an estimator with the given per-cell hazard prior.
    ///
    /// The prior must be finite and in `[0, 1]`.
    pub fn new(prior: f64) -> Result<Self, InferError> {
        if !prior.is_finite() || !(0.0..=1.0).contains(&prior) {
            return Err(InferError::Domain(format!(
                "hazard prior {} is not in [0, 1]",
                prior
            )));
        }
        Ok(RiskEstimator {
            prior,
            percepts: BTreeMap::new(),
        })
    }

    pub fn hazard_prior(&self) -> f64 {
        self.prior
    }

    /// Records the boolean percept observed at a visited cell.
    ///
    /// A cell's percept is recorded exactly once, at the moment the agent
    /// occupies it, and never revised; a second record is a `Domain` error.
    pub fn record_percept(&mut self, cell: Cell, observed: bool) -> Result<(), InferError> {
        if self.percepts.contains_key(&cell) {
            return Err(InferError::Domain(format!(
                "percept for cell {} is already recorded",
                cell
            )));
        }
        self.percepts.insert(cell, observed);
        Ok(())
    }

    /// Recorded percepts, ordered by cell.
    pub fn percepts(&self) -> &BTreeMap<Cell, bool> {
        &self.percepts
    }

    /// Unnormalized estimate of `P(hazard at target | recorded percepts)`.
    ///
    /// Holds `target`'s indicator fixed at hazardous, enumerates all
    /// assignments of the remaining frontier indicators, filters them
    /// against the percepts, and sums the surviving weights. Scores are
    /// comparable only against other scores from the same percept snapshot.
    ///
    /// # Errors
    ///
    /// `Domain` if `target` is not in `frontier`, or if `frontier` overlaps
    /// a visited cell.
    pub fn estimate_risk(&self, target: Cell, frontier: &BTreeSet<Cell>) -> Result<f64, InferError> {
        if !frontier.contains(&target) {
            return Err(InferError::Domain(format!(
                "target cell {} is not in the frontier",
                target
            )));
        }
        if let Some(visited) = frontier.iter().find(|c| self.percepts.contains_key(*c)) {
            return Err(InferError::Domain(format!(
                "frontier cell {} has already been visited",
                visited
            )));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "estimate_risk for {} over a frontier of {} cells",
            target,
            frontier.len()
        );

        let hidden: Vec<Variable> = frontier
            .iter()
            .filter(|&&c| c != target)
            .map(|c| Variable::boolean(c.indicator()))
            .collect();
        let mut base = Evidence::default();
        base.insert(target.indicator(), Value::Bool(true));

        let mut total = 0.0;
        for event in all_events(&hidden, &base)? {
            if !self.consistent(&event) {
                continue;
            }
            let weight: f64 = frontier
                .iter()
                .map(|c| {
                    if hazardous(&event, *c) {
                        self.prior
                    } else {
                        1.0 - self.prior
                    }
                })
                .product();
            total += weight;
        }
        Ok(total)
    }

    /// The minimum-risk frontier cell, or `None` on an empty frontier.
    ///
    /// Ties break toward the lexicographically smallest cell. An empty or
    /// uniformly hopeless frontier is the caller's cue to fall back to an
    /// exploratory move; that policy lives outside this crate.
    pub fn safest_cell(&self, frontier: &BTreeSet<Cell>) -> Result<Option<Cell>, InferError> {
        let mut best: Option<(Cell, f64)> = None;
        for &cell in frontier {
            let risk = self.estimate_risk(cell, frontier)?;
            match best {
                Some((_, lowest)) if risk >= lowest => {}
                _ => best = Some((cell, risk)),
            }
        }
        Ok(best.map(|(cell, _)| cell))
    }

    /// The consistency filter: every recorded percept must equal "some
    /// adjacent cell is hazardous" under the candidate assignment.
    fn consistent(&self, event: &Evidence) -> bool {
        self.percepts.iter().all(|(visited, &observed)| {
            let any_adjacent_hazard = visited
                .adjacent()
                .iter()
                .any(|c| hazardous(event, *c));
            any_adjacent_hazard == observed
        })
    }
}

fn hazardous(event: &Evidence, cell: Cell) -> bool {
    event
        .get(&cell.indicator())
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(cells: &[(i32, i32)]) -> BTreeSet<Cell> {
        cells.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn prior_outside_unit_interval_is_rejected() {
        assert!(matches!(
            RiskEstimator::new(1.2).unwrap_err(),
            InferError::Domain(_)
        ));
        assert!(matches!(
            RiskEstimator::new(f64::NAN).unwrap_err(),
            InferError::Domain(_)
        ));
    }

    #[test]
    fn duplicate_percept_is_rejected() {
        let mut estimator = RiskEstimator::new(0.2).expect("estimator");
        estimator.record_percept(Cell::new(0, 0), false).expect("first record");
        let err = estimator.record_percept(Cell::new(0, 0), true).unwrap_err();
        assert!(matches!(err, InferError::Domain(_)));
    }

    #[test]
    fn target_outside_frontier_is_rejected() {
        let estimator = RiskEstimator::new(0.2).expect("estimator");
        let err = estimator
            .estimate_risk(Cell::new(5, 5), &frontier(&[(0, 1), (1, 0)]))
            .unwrap_err();
        assert!(matches!(err, InferError::Domain(_)));
    }

    #[test]
    fn visited_cell_in_frontier_is_rejected() {
        let mut estimator = RiskEstimator::new(0.2).expect("estimator");
        estimator.record_percept(Cell::new(0, 1), true).expect("record");
        let err = estimator
            .estimate_risk(Cell::new(0, 1), &frontier(&[(0, 1), (1, 0)]))
            .unwrap_err();
        assert!(matches!(err, InferError::Domain(_)));
    }

    #[test]
    fn no_recorded_percepts_returns_the_prior() {
        let estimator = RiskEstimator::new(0.15).expect("estimator");
        let cells = frontier(&[(0, 1), (1, 0), (2, 3)]);
        for &cell in &cells {
            let risk = estimator.estimate_risk(cell, &cells).expect("risk");
            assert!((risk - 0.15).abs() < 1e-12);
        }
    }

    #[test]
    fn false_percept_rules_out_adjacent_target() {
        // No breeze at (0, 0) means neither neighbor can hide a hazard.
        let mut estimator = RiskEstimator::new(0.2).expect("estimator");
        estimator.record_percept(Cell::new(0, 0), false).expect("record");
        let cells = frontier(&[(0, 1), (1, 0)]);
        let risk = estimator
            .estimate_risk(Cell::new(1, 0), &cells)
            .expect("risk");
        assert_eq!(risk, 0.0);
    }

    #[test]
    fn safest_cell_is_none_on_empty_frontier() {
        let estimator = RiskEstimator::new(0.2).expect("estimator");
        assert_eq!(estimator.safest_cell(&BTreeSet::new()).expect("ok"), None);
    }
}
