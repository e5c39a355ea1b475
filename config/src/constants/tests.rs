//! Tests for the centralized configuration constants.

use super::*;

/// Ensures default constants are sane and positive.
#[test]
fn default_constants_are_valid() {
    let cfg = GlobalConfig::default();
    assert!(cfg.tolerance > 0.0);
    assert!(cfg.sliver_angle_degrees > 90.0);
    assert!(cfg.auto_smooth_angle_degrees > 0.0);
}

/// Validates the builder rejects invalid values.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        GlobalConfig::new(0.0, 170.0, 5.0, 60.0).unwrap_err(),
        ConfigError::InvalidTolerance(0.0)
    );
    assert_eq!(
        GlobalConfig::new(1.0e-3, 45.0, 5.0, 60.0).unwrap_err(),
        ConfigError::InvalidAngle {
            name: "sliver_angle_degrees",
            value: 45.0
        }
    );
    assert!(GlobalConfig::new(f64::NAN, 170.0, 5.0, 60.0).is_err());
    assert!(GlobalConfig::new(1.0e-3, 170.0, 5.0, 0.0).is_err());
}

#[test]
fn error_messages_name_the_field() {
    let err = GlobalConfig::new(1.0e-3, 170.0, 95.0, 60.0).unwrap_err();
    assert!(err.to_string().contains("sliver_normal_tolerance_degrees"));
}
