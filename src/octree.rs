use crate::bounds::BoundingBox;
use crate::config::OctreeConfig;
use crate::error::ConfigError;
use crate::obstacles::ObstacleBox;
use crate::occupancy::Occupancy;
use crate::point::Point;
use log::debug;

/// A leaf of the occupancy octree: one box with one tag.
///
/// Leaves are copied out of the tree, so holding one does not borrow the tree.
/// Two distinct leaves never share a box, which makes `bounds` their identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leaf {
    pub bounds: BoundingBox,
    pub tag: Occupancy,
}

impl Leaf {
    pub fn center(&self) -> Point {
        self.bounds.center
    }

    /// Length of the shortest edge of the leaf.
    pub fn size(&self) -> f64 {
        self.bounds.min_edge()
    }
}

/// Adaptive occupancy map over a bounded volume.
///
/// The volume is recursively subdivided into eight octants where a region write
/// only partially covers a node, and collapsed again when all eight children end up
/// as leaves with the same tag. Nodes at or below `min_volume` are never split, so
/// partially overlapping writes at that resolution are dropped.
pub struct OccupancyOctree {
    root: OctreeNode,
    min_volume: f64,
    min_edge: f64,
}

impl OccupancyOctree {
    /// Creates a tree whose root is a single `Free` leaf covering `bounds`.
    ///
    /// # Arguments
    ///
    /// * `bounds` - The volume covered by the tree. Extents must be positive.
    /// * `min_volume` - Nodes with a volume at or below this value are never split.
    pub fn new(bounds: BoundingBox, min_volume: f64) -> OccupancyOctree {
        debug_assert!(bounds.is_well_formed(), "octree bounds must have positive extents");
        debug_assert!(min_volume > 0.0, "min_volume must be positive");
        OccupancyOctree {
            root: OctreeNode::new(bounds, Occupancy::Free),
            min_volume,
            min_edge: min_volume.cbrt(),
        }
    }

    /// Validates `config` and creates an empty tree from it.
    pub fn from_config(config: &OctreeConfig) -> Result<OccupancyOctree, ConfigError> {
        config.validate()?;
        debug!(
            "[Octree] root center={} half_extent={} min_volume={}",
            config.center, config.half_extent, config.min_volume
        );
        Ok(OccupancyOctree::new(config.bounds(), config.min_volume))
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.root.bounds
    }

    pub fn min_volume(&self) -> f64 {
        self.min_volume
    }

    /// Edge length of a cube of `min_volume`.
    pub fn min_edge(&self) -> f64 {
        self.min_edge
    }

    /// Writes `tag` over the axis-aligned `region`.
    ///
    /// The region must have non-negative extents; degenerate boxes are not rejected.
    pub fn set_region(&mut self, region: &BoundingBox, tag: Occupancy) {
        self.root.set_region(region, tag, self.min_volume);
    }

    /// Marks every obstacle box as `Occupancy::Obstacle`. Returns the number applied.
    pub fn insert_obstacles<I>(&mut self, obstacles: I) -> usize
    where
        I: IntoIterator<Item = ObstacleBox>,
    {
        let mut count = 0;
        for obstacle in obstacles {
            debug_assert!(obstacle.bounds().is_well_formed(), "malformed obstacle {:?}", obstacle);
            self.set_region(&obstacle.bounds(), Occupancy::Obstacle);
            count += 1;
        }
        debug!("[Octree] inserted {} obstacles, {} leaves", count, self.leaf_count());
        count
    }

    /// Collapses the tree back to a single root leaf carrying `tag`.
    pub fn clear(&mut self, tag: Occupancy) {
        self.root.children = None;
        self.root.tag = tag;
    }

    /// Tag of the leaf containing `point`, or `None` outside the root volume.
    pub fn get_value(&self, point: &Point) -> Option<Occupancy> {
        self.root.leaf_at(point).map(|node| node.tag)
    }

    /// The leaf containing `point`, or `None` outside the root volume.
    ///
    /// On a boundary shared by several leaves, the first one in octant order wins;
    /// this is the first element of `leaves_in_box` for a zero-extent query.
    pub fn leaf_at(&self, point: &Point) -> Option<Leaf> {
        self.root.leaf_at(point).map(OctreeNode::as_leaf)
    }

    /// Every leaf overlapping `query`, boundaries included.
    pub fn leaves_in_box(&self, query: &BoundingBox) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        self.root.collect_in_box(query, &mut leaves);
        leaves
    }

    /// Leaves sharing a face with `leaf`.
    ///
    /// For each axis the leaf's box is grown by `min_edge / 2` along that axis and
    /// shrunk by the same amount along the other two, so that leaves touching only
    /// along an edge or a corner are not reported. Leaves thinner than that margin
    /// may get an incomplete neighbour set.
    pub fn adjacent_leaves(&self, leaf: &Leaf) -> Vec<Leaf> {
        let eps = self.min_edge / 2.0;
        let half = leaf.bounds.half_extent.to_array();
        let mut neighbours: Vec<Leaf> = Vec::new();

        for axis in 0..3 {
            let grown: [f64; 3] = std::array::from_fn(|a| {
                if a == axis { half[a] + eps } else { (half[a] - eps).max(0.0) }
            });
            let query = BoundingBox::new(leaf.bounds.center, Point::from(grown));
            for found in self.leaves_in_box(&query) {
                if found.bounds != leaf.bounds && !neighbours.contains(&found) {
                    neighbours.push(found);
                }
            }
        }
        neighbours
    }

    /// Every leaf of the tree, in depth-first octant order.
    pub fn leaves(&self) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        self.root.collect_where(&mut |_: &OctreeNode| true, &mut leaves);
        leaves
    }

    /// Every leaf carrying `tag`.
    pub fn leaves_with(&self, tag: Occupancy) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        self.root.collect_where(&mut |node: &OctreeNode| node.tag == tag, &mut leaves);
        leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Depth of the deepest leaf; a lone root has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

struct OctreeNode {
    bounds: BoundingBox,
    tag: Occupancy,
    children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    fn new(bounds: BoundingBox, tag: Occupancy) -> OctreeNode {
        OctreeNode {
            bounds,
            tag,
            children: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn as_leaf(&self) -> Leaf {
        Leaf {
            bounds: self.bounds,
            tag: self.tag,
        }
    }

    fn set_region(&mut self, region: &BoundingBox, tag: Occupancy, min_volume: f64) {
        if region.contains_box(&self.bounds) {
            self.children = None;
            self.tag = tag;
            return;
        }

        if region.is_disjoint(&self.bounds) || self.bounds.volume() <= min_volume {
            return;
        }

        if self.children.is_none() {
            self.subdivide();
        }

        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                child.set_region(region, tag, min_volume);
            }
        }

        self.try_merge();
    }

    fn subdivide(&mut self) {
        let tag = self.tag;
        let bounds = self.bounds;
        self.children = Some(Box::new(std::array::from_fn(|i| {
            OctreeNode::new(bounds.octant(i), tag)
        })));
    }

    // Only the immediate children are inspected; a child that is itself split keeps
    // this node split even if its subtree is uniform.
    fn try_merge(&mut self) {
        let merged = match &self.children {
            Some(children) => {
                let first = children[0].tag;
                children
                    .iter()
                    .all(|c| c.is_leaf() && c.tag == first)
                    .then_some(first)
            }
            None => None,
        };

        if let Some(tag) = merged {
            self.children = None;
            self.tag = tag;
        }
    }

    fn leaf_at(&self, point: &Point) -> Option<&OctreeNode> {
        if !self.bounds.contains_point(point) {
            return None;
        }

        match &self.children {
            None => Some(self),
            Some(children) => children.iter().find_map(|child| child.leaf_at(point)),
        }
    }

    fn collect_in_box(&self, query: &BoundingBox, out: &mut Vec<Leaf>) {
        if self.bounds.is_disjoint(query) {
            return;
        }

        match &self.children {
            None => out.push(self.as_leaf()),
            Some(children) => {
                for child in children.iter() {
                    child.collect_in_box(query, out);
                }
            }
        }
    }

    fn collect_where<F>(&self, keep: &mut F, out: &mut Vec<Leaf>)
    where
        F: FnMut(&OctreeNode) -> bool,
    {
        match &self.children {
            None => {
                if keep(self) {
                    out.push(self.as_leaf());
                }
            }
            Some(children) => {
                for child in children.iter() {
                    child.collect_where(keep, out);
                }
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => children.iter().map(OctreeNode::leaf_count).sum(),
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(OctreeNode::node_count).sum())
    }

    fn depth(&self) -> usize {
        self.children
            .as_ref()
            .map_or(0, |children| 1 + children.iter().map(OctreeNode::depth).max().unwrap_or(0))
    }
}
