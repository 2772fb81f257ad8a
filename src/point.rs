use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A position (or per-axis extent) in 3D space.
///
/// Equality is exact per component, there is no epsilon. The `Hash` implementation
/// agrees with `==`, so points can key the visited set of a search. Coordinates are
/// expected to be finite: a `NaN` component never compares equal to itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Component along `axis` (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn min_component(&self) -> f64 {
        self.x.min(self.y).min(self.z)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // -0.0 == 0.0, so both must feed the same bits.
        for v in [self.x, self.y, self.z] {
            let v = if v == 0.0 { 0.0f64 } else { v };
            v.to_bits().hash(state);
        }
    }
}

impl From<[f64; 3]> for Point {
    fn from(p: [f64; 3]) -> Self {
        Point::new(p[0], p[1], p[2])
    }
}

impl From<Point> for [f64; 3] {
    fn from(p: Point) -> Self {
        p.to_array()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
