use xtree::eval::{FieldEvaluator, HalfSpace, Intersection, Union};
use xtree::{Point, Region, Vec3, XTree, XTreeConfig};

const MAX_DEPTH: usize = 6;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `max(x - 0.07, y + 0.11)`: two half-spaces meeting at a right angle.
fn right_angle() -> FieldEvaluator<Intersection<HalfSpace, HalfSpace>> {
    FieldEvaluator::new(Intersection::new(
        HalfSpace::new(Vec3::X, 0.07),
        HalfSpace::new(Vec3::Y, -0.11),
    ))
}

fn distance_to_edge(x: f64, y: f64) -> f64 {
    ((x - 0.07).powi(2) + (y + 0.11).powi(2)).sqrt()
}

#[test]
fn edge_forces_deeper_subdivision() {
    init_logging();
    let config = XTreeConfig::default().with_max_depth(MAX_DEPTH);
    let tree = XTree::build(&mut right_angle(), Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();

    let on_edge = tree.leaves().filter(|leaf| {
        let r = leaf.region();
        r.lower.x <= 0.07 && 0.07 <= r.upper.x && r.lower.y <= -0.11 && -0.11 <= r.upper.y
    });
    assert!(on_edge.clone().count() > 0);
    assert!(on_edge.clone().all(|leaf| leaf.level() == MAX_DEPTH));

    let far_depth = tree
        .leaves()
        .filter_map(|leaf| leaf.vertex().map(|v| (leaf.level(), v)))
        .filter(|(_, v)| distance_to_edge(v.x, v.y) > 0.3)
        .map(|(level, _)| level)
        .max()
        .unwrap();
    assert!(far_depth < MAX_DEPTH, "smooth region refined to {far_depth}");
}

#[test]
fn edge_vertices_sit_on_the_surface() {
    let config = XTreeConfig::default().with_max_depth(5);
    let mut eval = right_angle();
    let tree = XTree::build(&mut eval, Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();

    let mut crossing = 0;
    for leaf in tree.leaves() {
        let Some(v) = leaf.vertex() else { continue };
        if leaf.corners() == 0 || leaf.corners() == 0xFF {
            continue;
        }
        crossing += 1;
        let f = (v.x - 0.07).max(v.y + 0.11);
        assert!(f.abs() <= 1e-9, "vertex {v:?} off the surface by {f}");
    }
    assert!(crossing > 0);
}

#[test]
fn edge_cells_stop_at_feature_depth() {
    let config = XTreeConfig::default().with_max_depth(MAX_DEPTH).with_feature_depth(3);
    let tree = XTree::build(&mut right_angle(), Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();

    let mut found = 0;
    for leaf in tree.leaves() {
        let r = leaf.region();
        if r.lower.x <= 0.07 && 0.07 <= r.upper.x && r.lower.y <= -0.11 && -0.11 <= r.upper.y {
            found += 1;
            assert_eq!(leaf.level(), 3);
            let v = leaf.vertex().unwrap();
            assert!(distance_to_edge(v.x, v.y) < 1e-9, "vertex {v:?} misses the edge");
        }
    }
    assert_eq!(found, 8);
}

#[test]
fn concave_corner_is_refined() {
    // min(x, y): an inward-facing right angle.
    let field = Union::new(HalfSpace::new(Vec3::X, 0.0), HalfSpace::new(Vec3::Y, 0.0));
    let config = XTreeConfig::default().with_max_depth(4);
    let tree = XTree::build(
        &mut FieldEvaluator::new(field),
        Region::<2>::new([-0.9, -0.8], [1.1, 1.2]),
        &config,
    )
    .unwrap();
    assert_eq!(tree.stats().max_level, 4);
}

/// Edges placed anywhere inside a level-3 cell land exactly on the crease.
#[test]
fn off_grid_edges_are_recovered() {
    let config = XTreeConfig::default().with_max_depth(4).with_feature_depth(3);
    let region = Region::<3>::new([-1.0; 3], [1.0; 3]);

    for i in 0..10 {
        for j in 0..10 {
            let (ex, ey) = (0.003 + 0.026 * i as f64, -0.003 - 0.026 * j as f64);
            let mut eval = FieldEvaluator::new(Intersection::new(
                HalfSpace::new(Vec3::X, ex),
                HalfSpace::new(Vec3::Y, ey),
            ));
            let tree = XTree::build(&mut eval, region, &config).unwrap();

            let mut found = 0;
            for leaf in tree.leaves() {
                let r = leaf.region();
                let on_edge = Point::<3>::new(ex, ey, r.center().z);
                if !r.contains(&on_edge) {
                    continue;
                }
                found += 1;
                assert_eq!(leaf.level(), 3, "edge ({ex}, {ey})");
                let v = leaf.vertex().unwrap();
                let miss = ((v.x - ex).powi(2) + (v.y - ey).powi(2)).sqrt();
                assert!(miss < 1e-9, "edge ({ex}, {ey}): vertex {v:?} misses by {miss}");
                assert!(r.contains(v));
            }
            assert_eq!(found, 8, "edge ({ex}, {ey})");
        }
    }
}
