//! Planner configuration.
//!
//! Everything the tree and the search need is passed in explicitly through these
//! values; nothing is stored in shared mutable state. A configuration can be built in
//! code or loaded from a TOML document:
//!
//! ```toml
//! [octree]
//! center = { x = 0.0, y = 0.0, z = -32.0 }
//! half_extent = { x = 32.0, y = 32.0, z = 32.0 }
//! min_volume = 0.015625
//!
//! [search]
//! max_expansions = 9000
//!
//! [[obstacles]]
//! center = { x = 2.75, y = 0.0, z = 0.0 }
//! half_extent = { x = 0.5, y = 1.125, z = 1.5 }
//! ```

use crate::bounds::BoundingBox;
use crate::error::ConfigError;
use crate::obstacles::ObstacleBox;
use crate::octree::OccupancyOctree;
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default smallest splittable volume: cells of 0.25 on a side.
pub const DEFAULT_MIN_VOLUME: f64 = 0.25 * 0.25 * 0.25;

/// Default expansion ceiling for a single search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 9000;

fn default_min_volume() -> f64 {
    DEFAULT_MIN_VOLUME
}

fn default_max_expansions() -> usize {
    DEFAULT_MAX_EXPANSIONS
}

fn default_true() -> bool {
    true
}

/// Root volume and resolution of an occupancy octree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OctreeConfig {
    /// Center of the root box
    pub center: Point,
    /// Half size of the root box along each axis
    pub half_extent: Point,
    /// Nodes at or below this volume are never split
    #[serde(default = "default_min_volume")]
    pub min_volume: f64,
}

impl OctreeConfig {
    pub fn new(center: Point, half_extent: Point, min_volume: f64) -> Self {
        Self { center, half_extent, min_volume }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.center, self.half_extent)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds().is_well_formed() {
            return Err(ConfigError::Invalid(format!(
                "octree root must have finite, positive extents (center {}, half extent {})",
                self.center, self.half_extent
            )));
        }
        if !(self.min_volume.is_finite() && self.min_volume > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_volume must be positive and finite, got {}",
                self.min_volume
            )));
        }
        Ok(())
    }
}

/// A* search settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of nodes to expand before returning the best partial path
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
    /// Offer inset corners of large free leaves as move targets, not only centers
    #[serde(default = "default_true")]
    pub corner_candidates: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            corner_candidates: true,
        }
    }
}

impl SearchConfig {
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_corner_candidates(mut self, enabled: bool) -> Self {
        self.corner_candidates = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expansions == 0 {
            return Err(ConfigError::Invalid("max_expansions must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Complete planner configuration: tree, search settings and an optional obstacle list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub octree: OctreeConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub obstacles: Vec<ObstacleBox>,
}

impl PlannerConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Creates the octree described by this configuration and applies its obstacles.
    pub fn build_octree(&self) -> Result<OccupancyOctree, ConfigError> {
        self.validate()?;
        let mut octree = OccupancyOctree::from_config(&self.octree)?;
        octree.insert_obstacles(self.obstacles.iter().copied());
        Ok(octree)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.octree.validate()?;
        self.search.validate()?;
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if !obstacle.bounds().is_well_formed() {
                return Err(ConfigError::Invalid(format!(
                    "obstacle {} has a non-positive or non-finite extent",
                    i
                )));
            }
        }
        Ok(())
    }
}
