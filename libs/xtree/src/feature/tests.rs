//! # Feature Tests
//!
//! ## Test Categories
//!
//! - **Push**: degenerate, antipodal and orthogonal directions
//! - **Check**: non-mutating single-direction tests
//! - **Merge**: feature-against-feature compatibility
//! - **Witness**: the separating direction is valid

use super::*;
use approx::assert_relative_eq;

fn feature(dirs: &[[f64; 3]]) -> Feature {
    let mut f = Feature::new();
    for &d in dirs {
        assert!(f.push(Vec3::from_array(d)), "setup push {d:?} failed");
    }
    f
}

// =============================================================================
// PUSH TESTS
// =============================================================================

#[test]
fn test_push_zero_vector_rejected() {
    let mut f = Feature::new();
    assert!(!f.push(Vec3::ZERO));
    assert!(f.is_empty());
}

#[test]
fn test_push_antipodal_rejected() {
    let mut f = Feature::new();
    assert!(f.push(Vec3::new(1.0, 0.0, 0.0)));
    assert!(!f.push(Vec3::new(-1.0, 0.0, 0.0)));
    assert_eq!(f.len(), 1);
}

#[test]
fn test_push_orthogonal_triad() {
    let mut f = Feature::new();
    assert!(f.push(Vec3::new(1.0, 0.0, 0.0)));
    assert!(f.push(Vec3::new(0.0, 1.0, 0.0)));
    assert!(f.push(Vec3::new(0.0, 0.0, 1.0)));
    assert!(f.push(Vec3::new(1.0, 1.0, 1.0)));
    assert!(!f.push(Vec3::new(-1.0, -1.0, -1.0)));
    assert_eq!(f.len(), 4);
}

#[test]
fn test_push_mixed_octant() {
    let mut f = Feature::new();
    assert!(f.push(Vec3::new(1.0, 0.0, 0.0)));
    assert!(f.push(Vec3::new(0.0, -1.0, 0.0)));
    assert!(f.push(Vec3::new(0.0, 0.0, -1.0)));
    assert!(f.push(Vec3::new(0.0, 0.0, -1.0)));
    assert!(f.push(Vec3::new(0.0, -1.0, 0.0)));
    assert!(!f.push(Vec3::new(-1.0, 1.0, 1.0)));
    assert!(f.push(Vec3::new(1.0, -1.0, -1.0)));
}

/// Repeated directions that differ only by rounding are not stored twice.
#[test]
fn test_push_noisy_duplicates() {
    let s = 2.0_f64.sqrt();
    let mut f = Feature::new();
    assert!(f.push(Vec3::new(s, 0.0, -s)));
    assert!(f.push(Vec3::new(s, 0.0, s)));
    assert!(f.push(Vec3::new(1.0, 0.0, -1.0)));
    assert_eq!(f.len(), 2);
}

#[test]
fn test_push_stores_unit_directions() {
    let f = feature(&[[3.0, 0.0, 4.0]]);
    assert_relative_eq!(f.directions()[0].length(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(f.directions()[0].z, 0.8, epsilon = 1e-12);
}

// =============================================================================
// CHECK TESTS
// =============================================================================

#[test]
fn test_check_flat_plane() {
    let mut f = feature(&[[-1.0, 1.0, 0.0], [-1.0, -1.0, 0.0]]);
    assert!(f.check(Vec3::new(0.0, -1.0, 0.0)));
    assert!(f.check(Vec3::new(0.0, 1.0, 0.0)));

    assert!(f.push(Vec3::new(0.0, 1.0, 0.0)));
    assert!(!f.check(Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn test_check_does_not_mutate() {
    let f = feature(&[[1.0, 0.0, 0.0]]);
    assert!(f.check(Vec3::Y));
    assert!(!f.check(Vec3::ZERO));
    assert_eq!(f.len(), 1);
}

// =============================================================================
// MERGE TESTS
// =============================================================================

#[test]
fn test_check_feature_tetrahedron() {
    let a = feature(&[[0.0, 0.0, 1.0], [1.0, 0.0, -1.0]]);
    let b = feature(&[[-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]]);
    assert!(!a.check_feature(&b));
    assert!(!b.check_feature(&a));
}

#[test]
fn test_extend_compatible_features() {
    let mut a = feature(&[[1.0, 0.0, 0.0]]);
    let b = feature(&[[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
    assert!(a.check_feature(&b));
    assert!(a.extend(&b));
    assert_eq!(a.len(), 2);
}

#[test]
fn test_extend_incompatible_leaves_set_unchanged() {
    let mut a = feature(&[[1.0, 0.0, 0.0]]);
    let b = feature(&[[-1.0, 0.0, 0.0]]);
    assert!(!a.extend(&b));
    assert_eq!(a.directions(), &[Vec3::X]);
}

#[test]
fn test_empty_features_are_compatible() {
    let a = Feature::new();
    let b = feature(&[[0.0, 0.0, 1.0]]);
    assert!(a.check_feature(&b));
    assert!(a.check_feature(&Feature::new()));
}

// =============================================================================
// WITNESS TESTS
// =============================================================================

#[test]
fn test_witness_separates_all_directions() {
    let f = feature(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, -0.5, 0.2]]);
    let w = f.witness().unwrap();
    assert_relative_eq!(w.length(), 1.0, epsilon = 1e-12);
    for d in f.directions() {
        assert!(d.dot(w) > 0.0, "{d:?} behind witness {w:?}");
    }
}

#[test]
fn test_witness_of_symmetric_pair() {
    let f = feature(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let w = f.witness().unwrap();
    let h = 0.5_f64.sqrt();
    assert_relative_eq!(w.x, h, epsilon = 1e-9);
    assert_relative_eq!(w.y, h, epsilon = 1e-9);
    assert!(Feature::new().witness().is_none());
}
