//! Move targets derived from adjacent leaves.
//!
//! Stepping only to leaf centers makes the search zig-zag through large free
//! volumes. Large free leaves therefore also offer their corners, pulled inward by
//! a fixed margin, so the search can enter them on whichever side is closest to
//! the goal.

use crate::octree::Leaf;
use crate::point::Point;

/// Turns a set of adjacent leaves into candidate waypoints.
///
/// Only `Free` leaves contribute. A leaf whose shortest edge is at most
/// `2 * min_edge` is skipped; otherwise its center is emitted, followed by its eight
/// corners inset by `2 * min_edge` when `corners` is set and the shortest edge
/// exceeds `4 * min_edge`.
///
/// Size is the shortest edge, so a leaf that is thin along one axis offers nothing
/// even when it is large along the others. A tree whose root is at most
/// `2 * min_edge` thick along some axis therefore yields no candidates at all.
pub fn generate_candidates(leaves: &[Leaf], min_edge: f64, corners: bool) -> Vec<Point> {
    let margin = 2.0 * min_edge;
    let mut candidates = Vec::with_capacity(leaves.len());

    for leaf in leaves {
        if !leaf.tag.is_free() {
            continue;
        }

        let size = leaf.size();
        if size <= margin {
            continue;
        }

        candidates.push(leaf.center());

        if corners && size > 2.0 * margin {
            let c = leaf.center();
            for corner in leaf.bounds.corners() {
                candidates.push(Point::new(
                    corner.x - margin * (corner.x - c.x).signum(),
                    corner.y - margin * (corner.y - c.y).signum(),
                    corner.z - margin * (corner.z - c.z).signum(),
                ));
            }
        }
    }

    candidates
}
