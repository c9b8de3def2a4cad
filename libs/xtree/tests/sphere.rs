use xtree::eval::{FieldEvaluator, Sphere};
use xtree::{Fill, Region, Vec3, XTree, XTreeConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn sphere_vertices_lie_on_surface() {
    init_logging();
    let mut eval = FieldEvaluator::new(Sphere::new(Vec3::ZERO, 0.5));
    let config = XTreeConfig::default().with_max_depth(5);
    let tree = XTree::build(&mut eval, Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();

    let mut vertices = 0;
    for leaf in tree.leaves() {
        assert!(leaf.level() <= 5);
        if let Some(v) = leaf.vertex() {
            vertices += 1;
            let r = v.norm();
            assert!((r - 0.5).abs() <= 0.01, "vertex {v:?} at radius {r}");
        }
    }
    assert!(vertices > 0);
    assert!(tree.stats().max_level <= 5);
    assert_eq!(eval.depth(), 0);
}

#[test]
fn sphere_surface_is_covered() {
    let mut eval = FieldEvaluator::new(Sphere::new(Vec3::ZERO, 0.5));
    let config = XTreeConfig::default().with_max_depth(4);
    let tree = XTree::build(&mut eval, Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();

    // Every cell straddling the surface carries a vertex.
    for leaf in tree.leaves() {
        let mask = leaf.corners();
        if mask != 0 && mask != 0xFF {
            assert_eq!(leaf.fill(), Fill::Ambiguous);
            assert!(leaf.vertex().is_some());
        }
    }
}

#[test]
fn offset_sphere_keeps_its_center() {
    let center = Vec3::new(0.2, -0.1, 0.05);
    let mut eval = FieldEvaluator::new(Sphere::new(center, 0.4));
    let config = XTreeConfig::default().with_max_depth(4);
    let tree = XTree::build(&mut eval, Region::<3>::new([-1.0; 3], [1.0; 3]), &config).unwrap();

    for v in tree.leaves().filter_map(|leaf| leaf.vertex()) {
        let r = (Vec3::new(v.x, v.y, v.z) - center).length();
        assert!((r - 0.4).abs() <= 0.01, "vertex {v:?} at radius {r}");
    }
}
