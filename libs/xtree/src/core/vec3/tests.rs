//! Tests for the vector helpers.

use super::*;

/// Ensures embedding keeps the perpendicular coordinate.
#[test]
fn embed_uses_perp_for_missing_axes() {
    let p = Point::<2>::new(0.25, -0.5);
    let v = embed(&p, Vec3::new(9.0, 9.0, 0.75));
    assert_eq!(v, Vec3::new(0.25, -0.5, 0.75));
}

/// A 3D point ignores `perp` entirely.
#[test]
fn embed_3d_ignores_perp() {
    let p = Point::<3>::new(1.0, 2.0, 3.0);
    assert_eq!(embed(&p, Vec3::splat(7.0)), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn project_then_embed_is_identity_on_leading_axes() {
    let v = Vec3::new(-1.0, 4.0, 2.0);
    let p = project::<2>(v);
    assert_eq!(embed(&p, Vec3::new(0.0, 0.0, 2.0)), v);
}

#[test]
fn direction_is_zero_padded() {
    let d = Point::<2>::new(0.6, 0.8);
    assert_eq!(direction3(&d), Vec3::new(0.6, 0.8, 0.0));
}
