//! # octonav
//!
//! `octonav` is a Rust library for planning collision-free 3D waypoint paths for an
//! aerial agent, designed to be used in Rust as well as compiled to WebAssembly (WASM).
//! It represents the flight volume with an adaptive occupancy octree and searches it
//! with A*.
//!
//! ## Features
//!
//! - **Adaptive occupancy**: [`OccupancyOctree`] splits only where obstacle regions
//!   cut through a node and merges uniform octants back, down to a configured minimum volume.
//! - **Leaf adjacency**: face neighbours of any leaf, found with epsilon-grown box queries.
//! - **Corner candidates**: large free leaves offer inset corners as waypoints, so paths
//!   cut across open space instead of hopping between leaf centers.
//! - **Bounded search**: [`AStarPlanner`] caps expansions, supports polling cancellation,
//!   and plans independent requests in parallel.
//! - **WASM-first**: a `wasm-bindgen` wrapper exposes the tree and the planner to JavaScript.
//!
//! ## Example
//!
//! ```
//! use octonav::{astar, BoundingBox, Occupancy, OccupancyOctree, Point};
//!
//! let bounds = BoundingBox::new(Point::new(0.0, 0.0, -32.0), Point::new(32.0, 32.0, 32.0));
//! let mut tree = OccupancyOctree::new(bounds, 0.25 * 0.25 * 0.25);
//! tree.set_region(
//!     &BoundingBox::new(Point::new(2.75, 0.0, 0.0), Point::new(0.5, 1.125, 1.5)),
//!     Occupancy::Obstacle,
//! );
//!
//! let path = astar(&tree, Point::new(0.0, 0.0, 0.0), Point::new(6.0, 0.0, -1.0));
//! assert_eq!(path.last(), Some(&Point::new(6.0, 0.0, -1.0)));
//! ```
//!
//! ## Main Interface
//!
//! Populate an [`OccupancyOctree`] (directly or from a [`PlannerConfig`]) and hand it to
//! an [`AStarPlanner`].

mod astar;
mod bounds;
mod candidates;
mod config;
mod error;
mod obstacles;
mod occupancy;
mod octree;
mod point;
pub mod wasm;

pub use astar::astar;
pub use astar::AStarPlanner;
pub use astar::PathFailure;
pub use astar::PathResult;
pub use bounds::BoundingBox;
pub use candidates::generate_candidates;
pub use config::OctreeConfig;
pub use config::PlannerConfig;
pub use config::SearchConfig;
pub use config::DEFAULT_MAX_EXPANSIONS;
pub use config::DEFAULT_MIN_VOLUME;
pub use error::ConfigError;
pub use obstacles::ObstacleBox;
pub use occupancy::Occupancy;
pub use octree::Leaf;
pub use octree::OccupancyOctree;
pub use point::Point;
