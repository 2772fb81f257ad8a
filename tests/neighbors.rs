use octonav::{AStarPlanner, BoundingBox, Leaf, Occupancy, OccupancyOctree, PathFailure, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cube_tree(half: f64, min_volume: f64) -> OccupancyOctree {
    OccupancyOctree::new(
        BoundingBox::new(Point::new(0.0, 0.0, 0.0), Point::new(half, half, half)),
        min_volume,
    )
}

fn leaf_with_min(leaves: &[Leaf], min: Point) -> bool {
    leaves.iter().any(|l| l.bounds.min() == min)
}

/// Whether two boxes touch along one axis and overlap with positive length on the other two.
fn shares_face(a: &BoundingBox, b: &BoundingBox) -> bool {
    let (a_min, a_max) = (a.min().to_array(), a.max().to_array());
    let (b_min, b_max) = (b.min().to_array(), b.max().to_array());
    let mut touching = 0;
    let mut overlapping = 0;
    for i in 0..3 {
        if a_max[i] == b_min[i] || b_max[i] == a_min[i] {
            touching += 1;
        } else if a_min[i].max(b_min[i]) < a_max[i].min(b_max[i]) {
            overlapping += 1;
        }
    }
    touching == 1 && overlapping == 2
}

#[test]
fn test_small_leaf_neighbors() {
    let mut tree = cube_tree(4.0, 1.0);
    let cell = BoundingBox::from_min_max(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
    tree.set_region(&cell, Occupancy::Obstacle);

    let leaf = tree.leaf_at(&Point::new(0.5, 0.5, 0.5)).unwrap();
    assert_eq!(leaf.bounds, cell);

    let neighbors = tree.adjacent_leaves(&leaf);
    assert_eq!(neighbors.len(), 6, "Neighbors: {:?}", neighbors);

    // Unit cells on the positive side, whole root octants on the negative side.
    assert!(leaf_with_min(&neighbors, Point::new(1.0, 0.0, 0.0)));
    assert!(leaf_with_min(&neighbors, Point::new(0.0, 1.0, 0.0)));
    assert!(leaf_with_min(&neighbors, Point::new(0.0, 0.0, 1.0)));
    assert!(leaf_with_min(&neighbors, Point::new(-4.0, 0.0, 0.0)));
    assert!(leaf_with_min(&neighbors, Point::new(0.0, -4.0, 0.0)));
    assert!(leaf_with_min(&neighbors, Point::new(0.0, 0.0, -4.0)));
    assert!(!neighbors.contains(&leaf));
}

#[test]
fn test_large_leaf_neighbors_skip_diagonals() {
    let mut tree = cube_tree(4.0, 1.0);
    let cell = BoundingBox::from_min_max(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
    tree.set_region(&cell, Occupancy::Obstacle);

    // Root octant x[-4, 0] y[0, 4] z[0, 4].
    let leaf = tree.leaf_at(&Point::new(-2.0, 2.0, 2.0)).unwrap();
    assert_eq!(leaf.size(), 4.0);

    let neighbors = tree.adjacent_leaves(&leaf);
    // Across +x: four unit cells and three 2-cells. Across -y and -z: one octant each.
    assert_eq!(neighbors.len(), 9, "Neighbors: {:?}", neighbors);
    for n in &neighbors {
        assert!(shares_face(&leaf.bounds, &n.bounds), "{:?} does not share a face with {:?}", n.bounds, leaf.bounds);
    }
    assert!(neighbors.iter().any(|n| n.tag == Occupancy::Obstacle));
}

#[test]
fn test_lone_root_has_no_neighbors() {
    let tree = cube_tree(4.0, 1.0);
    let root = tree.leaf_at(&Point::ZERO).unwrap();
    assert!(tree.adjacent_leaves(&root).is_empty());
}

fn assert_reciprocal(tree: &OccupancyOctree) {
    let leaves = tree.leaves();
    for leaf in &leaves {
        let neighbors = tree.adjacent_leaves(leaf);
        for n in &neighbors {
            assert!(shares_face(&leaf.bounds, &n.bounds), "{:?} reported for {:?} without a shared face", n.bounds, leaf.bounds);

            let back = tree.adjacent_leaves(n);
            assert!(
                back.contains(leaf),
                "Leaf {:?} claims neighbor {:?}, but not the other way round",
                leaf.bounds,
                n.bounds
            );
        }
    }
}

#[test]
fn test_neighbor_reciprocity_random() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree = cube_tree(8.0, 1.0);

    for _ in 0..12 {
        let center = Point::new(
            rng.gen_range(-7.0..7.0),
            rng.gen_range(-7.0..7.0),
            rng.gen_range(-7.0..7.0),
        );
        let half = Point::new(
            rng.gen_range(0.3..3.0),
            rng.gen_range(0.3..3.0),
            rng.gen_range(0.3..3.0),
        );
        tree.set_region(&BoundingBox::new(center, half), Occupancy::Obstacle);
    }

    assert!(tree.leaf_count() > 8);
    assert_reciprocal(&tree);
}

#[test]
fn test_neighbor_reciprocity_fine_resolution() {
    let mut tree = OccupancyOctree::new(
        BoundingBox::new(Point::new(0.0, 0.0, -32.0), Point::new(32.0, 32.0, 32.0)),
        0.25 * 0.25 * 0.25,
    );
    tree.set_region(
        &BoundingBox::new(Point::new(2.75, 0.0, 0.0), Point::new(0.5, 1.125, 1.5)),
        Occupancy::Obstacle,
    );

    assert_reciprocal(&tree);
}

#[test]
fn test_thin_root_is_handled() {
    // Leaves end up far thinner than the adjacency margin along z.
    let mut tree = OccupancyOctree::new(
        BoundingBox::new(Point::ZERO, Point::new(8.0, 8.0, 0.1)),
        0.001,
    );
    tree.set_region(
        &BoundingBox::new(Point::ZERO, Point::new(1.0, 1.0, 0.05)),
        Occupancy::Obstacle,
    );
    assert!(tree.depth() > 1);
    assert!(tree.leaf_count() > 8);

    for leaf in tree.leaves() {
        let neighbors = tree.adjacent_leaves(&leaf);
        assert!(!neighbors.contains(&leaf));
    }

    // Every leaf is at most 0.2 thick, so nothing qualifies as a waypoint.
    let result = AStarPlanner::with_defaults(&tree).find_path(Point::new(-6.0, -6.0, 0.0), Point::new(6.0, 6.0, 0.0));
    assert!(result.path.is_empty());
    assert_eq!(result.failure_reason, Some(PathFailure::NoPath));
}
