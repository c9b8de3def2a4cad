//! Tests for the centralized configuration constants.

use super::*;

/// Ensures default constants are sane and positive.
#[test]
fn default_constants_are_valid() {
    let cfg = GlobalConfig::default();
    assert!(cfg.max_err > 0.0);
    assert!(cfg.resolution >= 1);
}

/// Validates the builder rejects invalid values.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// assert!(GlobalConfig::new(0.0, 3).is_err());
/// ```
#[test]
fn new_validates_inputs() {
    assert_eq!(
        GlobalConfig::new(0.0, 3).unwrap_err(),
        ConfigError::InvalidTolerance(0.0)
    );
    assert_eq!(
        GlobalConfig::new(1.0e-9, 0).unwrap_err(),
        ConfigError::InvalidResolution(0)
    );
    assert!(matches!(
        GlobalConfig::new(f64::NAN, 3),
        Err(ConfigError::InvalidTolerance(_))
    ));
}

#[test]
fn error_messages_name_the_field() {
    let err = ConfigError::InvalidResolution(0);
    assert!(err.to_string().contains("resolution"));
}
