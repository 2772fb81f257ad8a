use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in 3D space, stored as a center and a per-axis half extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Point,
    pub half_extent: Point,
}

impl BoundingBox {
    pub fn new(center: Point, half_extent: Point) -> Self {
        Self { center, half_extent }
    }

    /// Builds a box from its minimum and maximum corners.
    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self {
            center: Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0, (min.z + max.z) / 2.0),
            half_extent: Point::new((max.x - min.x) / 2.0, (max.y - min.y) / 2.0, (max.z - min.z) / 2.0),
        }
    }

    /// A zero-extent box, used to look up the leaves touching a single point.
    pub fn point(p: Point) -> Self {
        Self { center: p, half_extent: Point::ZERO }
    }

    pub fn min(&self) -> Point {
        Point::new(
            self.center.x - self.half_extent.x,
            self.center.y - self.half_extent.y,
            self.center.z - self.half_extent.z,
        )
    }

    pub fn max(&self) -> Point {
        Point::new(
            self.center.x + self.half_extent.x,
            self.center.y + self.half_extent.y,
            self.center.z + self.half_extent.z,
        )
    }

    pub fn volume(&self) -> f64 {
        8.0 * self.half_extent.x * self.half_extent.y * self.half_extent.z
    }

    /// Length of the shortest full edge.
    pub fn min_edge(&self) -> f64 {
        2.0 * self.half_extent.min_component()
    }

    /// Whether the extents are positive and finite.
    pub fn is_well_formed(&self) -> bool {
        let c = self.center.to_array();
        let h = self.half_extent.to_array();
        c.iter().all(|v| v.is_finite()) && h.iter().all(|v| v.is_finite() && *v > 0.0)
    }

    /// Boundary-inclusive point containment.
    pub fn contains_point(&self, p: &Point) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x &&
        p.y >= min.y && p.y <= max.y &&
        p.z >= min.z && p.z <= max.z
    }

    /// Whether `other` lies entirely inside this box (shared faces allowed).
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        let (min, max) = (self.min(), self.max());
        let (o_min, o_max) = (other.min(), other.max());
        min.x <= o_min.x && max.x >= o_max.x &&
        min.y <= o_min.y && max.y >= o_max.y &&
        min.z <= o_min.z && max.z >= o_max.z
    }

    /// Whether the two boxes are strictly separated along some axis.
    ///
    /// Boxes that only touch along a face, edge or corner are *not* disjoint.
    pub fn is_disjoint(&self, other: &BoundingBox) -> bool {
        let (min, max) = (self.min(), self.max());
        let (o_min, o_max) = (other.min(), other.max());
        max.x < o_min.x || max.y < o_min.y || max.z < o_min.z ||
        min.x > o_max.x || min.y > o_max.y || min.z > o_max.z
    }

    /// The eight corners, in octant order.
    pub fn corners(&self) -> [Point; 8] {
        std::array::from_fn(|i| self.signed_offset(i, self.half_extent))
    }

    /// The `i`-th octant of an octant split around the center.
    ///
    /// Bit 0 of `i` selects +x, bit 1 selects +y and bit 2 selects +z.
    pub fn octant(&self, i: usize) -> BoundingBox {
        let half = Point::new(
            self.half_extent.x / 2.0,
            self.half_extent.y / 2.0,
            self.half_extent.z / 2.0,
        );
        BoundingBox::new(self.signed_offset(i, half), half)
    }

    fn signed_offset(&self, i: usize, offset: Point) -> Point {
        let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
        let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
        let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
        Point::new(
            self.center.x + sx * offset.x,
            self.center.y + sy * offset.y,
            self.center.z + sz * offset.z,
        )
    }
}
