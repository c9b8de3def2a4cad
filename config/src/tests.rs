//! # Tests for Config Constants
//!
//! Unit tests verifying the relationships between configuration constants.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_feature_epsilon_above_epsilon() {
    assert!(
        FEATURE_EPSILON > EPSILON,
        "FEATURE_EPSILON must absorb gradient noise"
    );
}

#[test]
fn test_singular_value_cutoff_is_small_fraction() {
    assert!(SINGULAR_VALUE_CUTOFF > 0.0 && SINGULAR_VALUE_CUTOFF <= 1.0e-3);
    // Squared cutoff still sits far above f64 round-off in AᵀA
    assert!(SINGULAR_VALUE_CUTOFF.powi(2) > 1.0e3 * f64::EPSILON);
}

// =============================================================================
// RESOLUTION TESTS
// =============================================================================

#[test]
fn test_default_resolution_fits_capacity() {
    // Octree cells stage R^3 interior samples and 8 corners per batch
    assert!(DEFAULT_RESOLUTION.pow(3) + 8 <= SAMPLE_CAPACITY);
    assert!(DEFAULT_RESOLUTION.pow(2) + 4 <= SAMPLE_CAPACITY);
}

#[test]
fn test_feature_angle_is_acute() {
    assert!(DEFAULT_FEATURE_ANGLE > 0.0 && DEFAULT_FEATURE_ANGLE < 90.0);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_depths_are_bounded() {
    assert!(DEFAULT_MAX_DEPTH >= 1);
    assert!(DEFAULT_MAX_DEPTH <= MAX_DEPTH_LIMIT);
    assert!(DEFAULT_PARALLEL_DEPTH <= DEFAULT_MAX_DEPTH);
}
