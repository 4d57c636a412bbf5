//! Single-source cost fields ("Dijkstra maps") over a tile grid.
//! This module exists so mob movement can descend toward the player without per-mob searches.
//! It does not own when a field is rebuilt; the round controller decides that.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;
use crate::types::Pos;

const LOG_SCALE: f64 = 6.0;
const LOG_EPSILON: f64 = 1e-10;

/// Integer approximation of Euclidean distance.
pub fn octagonal_distance(from: Pos, to: Pos) -> f64 {
    let dy = i64::from(from.y.abs_diff(to.y));
    let dx = i64::from(from.x.abs_diff(to.x));
    let (max, min) = if dx > dy { (dx, dy) } else { (dy, dx) };
    let approx = max * 1007 + min * 441;
    let correction = if max < (min << 4) { max * 40 } else { 0 };
    ((approx - correction + 512) >> 10) as f64
}

pub fn manhattan_distance(from: Pos, to: Pos) -> f64 {
    f64::from(from.y.abs_diff(to.y) + from.x.abs_diff(to.x))
}

pub fn euclidean_distance(from: Pos, to: Pos) -> f64 {
    let dy = f64::from(from.y - to.y);
    let dx = f64::from(from.x - to.x);
    dy.hypot(dx)
}

/// `6 * ln(distance)`, with a zero distance clamped to a tiny positive value.
pub fn log_scaled(distance: f64) -> f64 {
    let distance = if distance == 0.0 { LOG_EPSILON } else { distance };
    LOG_SCALE * distance.ln()
}

pub fn log_distance(from: Pos, to: Pos) -> f64 {
    log_scaled(octagonal_distance(from, to))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Octagonal,
    #[default]
    LogOctagonal,
    Manhattan,
    Euclidean,
}

impl Metric {
    pub fn distance(self, from: Pos, to: Pos) -> f64 {
        match self {
            Metric::Octagonal => octagonal_distance(from, to),
            Metric::LogOctagonal => log_distance(from, to),
            Metric::Manhattan => manhattan_distance(from, to),
            Metric::Euclidean => euclidean_distance(from, to),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    cost: Cost,
    pos: Pos,
}

/// Settled costs from one source. Positions that were never reached are absent.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    source: Pos,
    costs: BTreeMap<Pos, f64>,
}

impl DistanceField {
    /// Runs lazy-deletion Dijkstra from `source`. Reaching a neighbour costs
    /// `cost_fn(source, neighbour)` plus the settled cost of the node being expanded.
    /// Movement-blocked and missing tiles are never enqueued. With a `target`, expansion
    /// stops as soon as the target is settled.
    pub fn build<F>(
        grid: &TileGrid,
        source: Pos,
        target: Option<Pos>,
        cost_fn: F,
        include_diagonals: bool,
    ) -> Self
    where
        F: Fn(Pos, Pos) -> f64,
    {
        let mut costs: BTreeMap<Pos, f64> = BTreeMap::new();
        let mut open = BTreeSet::new();
        if grid.contains(source) {
            open.insert(OpenNode { cost: Cost(0.0), pos: source });
        }

        while let Some(OpenNode { cost: Cost(cost), pos }) = open.pop_first() {
            if costs.contains_key(&pos) {
                continue;
            }
            costs.insert(pos, cost);
            if target == Some(pos) {
                break;
            }
            for neighbor in grid.neighbors(pos, include_diagonals) {
                if costs.contains_key(&neighbor) || grid.is_movement_blocked(neighbor) {
                    continue;
                }
                // Negative metric values (a log of a sub-unit distance) would break settling.
                let step = cost_fn(source, neighbor).max(0.0);
                open.insert(OpenNode { cost: Cost(cost + step), pos: neighbor });
            }
        }

        Self { source, costs }
    }

    /// Field over the whole reachable grid using a named metric.
    pub fn with_metric(grid: &TileGrid, source: Pos, metric: Metric, include_diagonals: bool) -> Self {
        Self::build(grid, source, None, |from, to| metric.distance(from, to), include_diagonals)
    }

    pub fn source(&self) -> Pos {
        self.source
    }

    pub fn cost(&self, pos: Pos) -> Option<f64> {
        self.costs.get(&pos).copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.costs.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Settled positions ordered by cost, ties by position.
    pub fn ascending(&self) -> Vec<(Pos, f64)> {
        let mut ordered: Vec<(Pos, f64)> =
            self.costs.iter().map(|(pos, cost)| (*pos, *cost)).collect();
        ordered.sort_by(|left, right| left.1.total_cmp(&right.1).then(left.0.cmp(&right.0)));
        ordered
    }

    /// Like [`DistanceField::ascending`], cut off after the last cost at or below `threshold`.
    pub fn within(&self, threshold: f64) -> Vec<(Pos, f64)> {
        let mut ordered = self.ascending();
        ordered.retain(|(_, cost)| *cost <= threshold);
        ordered
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, f64)> + '_ {
        self.costs.iter().map(|(pos, cost)| (*pos, *cost))
    }
}
