use crate::bounds::BoundingBox;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// One axis-aligned obstacle region, as delivered by a map loader.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleBox {
    pub center: Point,
    pub half_extent: Point,
}

impl ObstacleBox {
    pub fn new(center: Point, half_extent: Point) -> Self {
        Self { center, half_extent }
    }

    /// Builds an obstacle from a six-number record:
    /// `center_x center_y center_z half_x half_y half_z`.
    pub fn from_record(record: [f64; 6]) -> Self {
        Self {
            center: Point::new(record[0], record[1], record[2]),
            half_extent: Point::new(record[3], record[4], record[5]),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.center, self.half_extent)
    }
}

impl From<[f64; 6]> for ObstacleBox {
    fn from(record: [f64; 6]) -> Self {
        ObstacleBox::from_record(record)
    }
}
