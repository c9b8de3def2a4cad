use xtree::eval::{FieldEvaluator, HalfSpace, Intersection, Sphere, Union};
use xtree::{Region, Vec3, XTree, XTreeConfig};

#[test]
fn parallel_build_matches_sequential() {
    let eval = FieldEvaluator::new(Sphere::new(Vec3::new(0.1, 0.0, -0.05), 0.6));
    let region = Region::<3>::new([-1.0; 3], [1.0; 3]);

    for parallel_depth in [0, 1, 3] {
        let config = XTreeConfig::default()
            .with_max_depth(4)
            .with_parallel_depth(parallel_depth);
        let sequential = XTree::build(&mut eval.clone(), region, &config).unwrap();
        let parallel = XTree::build_parallel(&eval, region, &config).unwrap();
        assert_eq!(sequential, parallel, "parallel_depth {parallel_depth}");
    }
}

#[test]
fn parallel_build_handles_features() {
    let field = Union::new(
        Intersection::new(HalfSpace::new(Vec3::X, 0.2), HalfSpace::new(Vec3::Z, 0.1)),
        Sphere::new(Vec3::new(-0.4, 0.3, 0.0), 0.3),
    );
    let eval = FieldEvaluator::new(field);
    let region = Region::<3>::new([-1.0; 3], [1.0; 3]);
    let config = XTreeConfig::default().with_max_depth(4);

    let sequential = XTree::build(&mut eval.clone(), region, &config).unwrap();
    let parallel = XTree::build_parallel(&eval, region, &config).unwrap();
    assert_eq!(sequential.stats(), parallel.stats());
    assert_eq!(sequential, parallel);
}

#[test]
fn parallel_build_reports_errors() {
    let eval = FieldEvaluator::with_capacity(Sphere::new(Vec3::ZERO, 0.5), 8);
    let region = Region::<2>::new([-1.0; 2], [1.0; 2]);
    assert!(XTree::build_parallel(&eval, region, &XTreeConfig::default()).is_err());
}
