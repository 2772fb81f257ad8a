//! A* waypoint search over an occupancy octree.
//!
//! Successors of a position are the candidate waypoints of the leaves adjacent to
//! the leaf containing it. Once the search stands inside the goal's leaf, the goal
//! itself is the only successor.

use crate::candidates::generate_candidates;
use crate::config::SearchConfig;
use crate::octree::{Leaf, OccupancyOctree};
use crate::point::Point;
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// A node of the search tree. `parent` indexes the planner's node arena.
#[derive(Clone, Debug)]
struct SearchNode {
    position: Point,
    parent: Option<usize>,
    g_cost: f64, // Cost from start
    h_cost: f64, // Straight-line distance to goal
}

/// Entry of the open set.
struct OpenEntry {
    f_cost: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; equal scores pop in insertion order.
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reason a search did not reach the goal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathFailure {
    /// Start or goal lies outside the octree volume
    OutOfBounds,
    /// The goal's leaf is not free
    GoalBlocked,
    /// The open set ran empty before the goal was reached
    NoPath,
    /// The expansion ceiling was hit; the path is a best-effort partial one
    MaxExpansionsExceeded,
    /// The caller asked the search to stop; the path is a best-effort partial one
    Cancelled,
}

/// Result of a search.
#[derive(Clone, Debug)]
pub struct PathResult {
    /// Waypoints from start to goal inclusive. Empty when no path was found, partial
    /// when the search was cut short.
    pub path: Vec<Point>,
    /// Sum of segment lengths along `path`
    pub cost: f64,
    /// Number of nodes expanded
    pub nodes_expanded: usize,
    /// Whether `path` ends at the goal
    pub success: bool,
    pub failure_reason: Option<PathFailure>,
}

impl PathResult {
    fn failed(reason: PathFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
            nodes_expanded,
            success: false,
            failure_reason: Some(reason),
        }
    }

    /// Total Euclidean length of the path.
    pub fn length(&self) -> f64 {
        self.path.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// A* planner borrowing a populated octree.
///
/// The tree is read-only for the lifetime of the planner, and every call owns its
/// own open and closed sets, so one planner can serve many searches concurrently.
pub struct AStarPlanner<'a> {
    octree: &'a OccupancyOctree,
    config: SearchConfig,
}

impl<'a> AStarPlanner<'a> {
    pub fn new(octree: &'a OccupancyOctree, config: SearchConfig) -> Self {
        Self { octree, config }
    }

    pub fn with_defaults(octree: &'a OccupancyOctree) -> Self {
        Self::new(octree, SearchConfig::default())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a path from `start` to `goal`.
    ///
    /// Only leaves larger than `2 * min_edge` offer intermediate waypoints. A goal
    /// whose own leaf is that small (typically right next to an obstacle) is reached
    /// only when the start already lies in the same leaf; otherwise the search
    /// ends with [`PathFailure::NoPath`].
    pub fn find_path(&self, start: Point, goal: Point) -> PathResult {
        self.find_path_until(start, goal, || false)
    }

    /// Find a path, polling `should_stop` once per iteration of the search loop.
    ///
    /// When `should_stop` returns `true` the search ends with
    /// [`PathFailure::Cancelled`] and the best partial path found so far.
    pub fn find_path_until<F>(&self, start: Point, goal: Point, mut should_stop: F) -> PathResult
    where
        F: FnMut() -> bool,
    {
        trace!("[AStar] find_path: start={} goal={}", start, goal);

        let Some(goal_leaf) = self.octree.leaf_at(&goal) else {
            debug!("[AStar] FAILED: OutOfBounds - goal {} outside octree", goal);
            return PathResult::failed(PathFailure::OutOfBounds, 0);
        };
        let Some(start_leaf) = self.octree.leaf_at(&start) else {
            debug!("[AStar] FAILED: OutOfBounds - start {} outside octree", start);
            return PathResult::failed(PathFailure::OutOfBounds, 0);
        };
        if !goal_leaf.tag.is_free() {
            debug!("[AStar] FAILED: GoalBlocked - goal leaf tagged {:?}", goal_leaf.tag);
            return PathResult::failed(PathFailure::GoalBlocked, 0);
        }
        if !start_leaf.tag.is_free() {
            warn!("[AStar] start {} resolves to a {:?} leaf", start, start_leaf.tag);
        }
        if start == goal {
            return PathResult {
                path: vec![start],
                cost: 0.0,
                nodes_expanded: 0,
                success: true,
                failure_reason: None,
            };
        }

        let mut nodes = vec![SearchNode {
            position: start,
            parent: None,
            g_cost: 0.0,
            h_cost: start.distance(&goal),
        }];
        let mut open_set = BinaryHeap::new();
        let mut visited: HashSet<Point> = HashSet::new();
        let mut seq: u64 = 0;
        open_set.push(OpenEntry {
            f_cost: nodes[0].h_cost,
            seq,
            node: 0,
        });

        let mut nodes_expanded = 0;
        let mut best = 0;

        while let Some(entry) = open_set.pop() {
            if should_stop() {
                debug!("[AStar] cancelled after {} expansions", nodes_expanded);
                return self.partial_path(&nodes, best, PathFailure::Cancelled, nodes_expanded);
            }

            let current = entry.node;
            let position = nodes[current].position;
            if !visited.insert(position) {
                continue;
            }

            if nodes[current].h_cost < nodes[best].h_cost {
                best = current;
            }

            nodes_expanded += 1;
            if nodes_expanded > self.config.max_expansions {
                debug!(
                    "[AStar] FAILED: MaxExpansionsExceeded ({} nodes)",
                    nodes_expanded
                );
                return self.partial_path(
                    &nodes,
                    best,
                    PathFailure::MaxExpansionsExceeded,
                    nodes_expanded,
                );
            }

            for candidate in self.successors(&position, &goal, &goal_leaf) {
                if visited.contains(&candidate) {
                    continue;
                }

                let g_cost = nodes[current].g_cost + candidate.distance(&position);
                let h_cost = candidate.distance(&goal);
                nodes.push(SearchNode {
                    position: candidate,
                    parent: Some(current),
                    g_cost,
                    h_cost,
                });
                let index = nodes.len() - 1;

                if h_cost == 0.0 {
                    return self.reconstruct_path(&nodes, index, nodes_expanded);
                }

                seq += 1;
                open_set.push(OpenEntry {
                    f_cost: g_cost + h_cost,
                    seq,
                    node: index,
                });
            }
        }

        debug!("[AStar] FAILED: NoPath after expanding {} nodes", nodes_expanded);
        PathResult::failed(PathFailure::NoPath, nodes_expanded)
    }

    /// Plan several independent requests in parallel.
    pub fn plan_many(&self, requests: &[(Point, Point)]) -> Vec<PathResult> {
        requests
            .par_iter()
            .map(|&(start, goal)| self.find_path(start, goal))
            .collect()
    }

    fn successors(&self, position: &Point, goal: &Point, goal_leaf: &Leaf) -> Vec<Point> {
        let Some(leaf) = self.octree.leaf_at(position) else {
            return Vec::new();
        };

        if leaf == *goal_leaf {
            return vec![*goal];
        }

        let adjacent = self.octree.adjacent_leaves(&leaf);
        generate_candidates(&adjacent, self.octree.min_edge(), self.config.corner_candidates)
    }

    fn chain(nodes: &[SearchNode], index: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            path.push(nodes[i].position);
            current = nodes[i].parent;
        }
        path.reverse();
        path
    }

    fn reconstruct_path(&self, nodes: &[SearchNode], index: usize, nodes_expanded: usize) -> PathResult {
        let path = Self::chain(nodes, index);
        let cost = nodes[index].g_cost;

        trace!(
            "[AStar] SUCCESS: {} waypoints, cost={:.3}, nodes_expanded={}",
            path.len(),
            cost,
            nodes_expanded
        );

        PathResult {
            path,
            cost,
            nodes_expanded,
            success: true,
            failure_reason: None,
        }
    }

    fn partial_path(
        &self,
        nodes: &[SearchNode],
        best: usize,
        reason: PathFailure,
        nodes_expanded: usize,
    ) -> PathResult {
        PathResult {
            path: Self::chain(nodes, best),
            cost: nodes[best].g_cost,
            nodes_expanded,
            success: false,
            failure_reason: Some(reason),
        }
    }
}

/// Search `octree` with the default settings and return only the waypoints.
///
/// The result runs from `start` to `goal` inclusive, or is empty when no path was
/// found. A search cut short by the expansion ceiling yields its partial path.
/// Goals inside small leaves next to obstacles may be unreachable, see
/// [`AStarPlanner::find_path`].
pub fn astar(octree: &OccupancyOctree, start: Point, goal: Point) -> Vec<Point> {
    AStarPlanner::with_defaults(octree).find_path(start, goal).path
}
