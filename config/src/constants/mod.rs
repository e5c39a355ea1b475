//! Centralized configuration values shared by the geometry kernel.
//!
//! Each public item documents its purpose and provides a minimal usage example
//! so that downstream crates can remain declarative and avoid scattering
//! literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Point-identity tolerance.
///
/// Two 3D points are the same vertex when their squared distance is below
/// `POINT_EPSILON²`. Vertex deduplication, edge matching and loop detection all
/// rely on this single value.
///
/// # Examples
/// ```
/// use config::constants::POINT_EPSILON;
/// assert_eq!(POINT_EPSILON, 1.0e-3);
/// ```
pub const POINT_EPSILON: f64 = 1.0e-3;

/// Tolerance below which a direction or cross product is treated as zero.
///
/// # Examples
/// ```
/// use config::constants::DIRECTION_EPSILON;
/// assert!(DIRECTION_EPSILON < 1.0e-6);
/// ```
pub const DIRECTION_EPSILON: f64 = 1.0e-9;

/// Slices thinner than this are dropped instead of being emitted as faces.
///
/// # Examples
/// ```
/// use config::constants::MIN_SLICE_EXTENT;
/// let height: f64 = 1.0e-6;
/// assert!(height.abs() < MIN_SLICE_EXTENT);
/// ```
pub const MIN_SLICE_EXTENT: f64 = 1.0e-4;

// =============================================================================
// ANGLE CONSTANTS
// =============================================================================

/// Largest interior angle (degrees) at which a triangle counts as a sliver.
///
/// # Examples
/// ```
/// use config::constants::SLIVER_ANGLE_DEGREES;
/// assert_eq!(SLIVER_ANGLE_DEGREES, 170.0);
/// ```
pub const SLIVER_ANGLE_DEGREES: f64 = 170.0;

/// Maximum angle (degrees) between a sliver's normal and the neighbour it may
/// swap a shared edge with.
///
/// # Examples
/// ```
/// use config::constants::SLIVER_NORMAL_TOLERANCE_DEGREES;
/// assert!(SLIVER_NORMAL_TOLERANCE_DEGREES <= 5.0);
/// ```
pub const SLIVER_NORMAL_TOLERANCE_DEGREES: f64 = 5.0;

/// Angle (degrees) below which incident triangle normals are blended under
/// automatic shading.
///
/// # Examples
/// ```
/// use config::constants::AUTO_SMOOTH_ANGLE_DEGREES;
/// assert_eq!(AUTO_SMOOTH_ANGLE_DEGREES, 60.0);
/// ```
pub const AUTO_SMOOTH_ANGLE_DEGREES: f64 = 60.0;

// =============================================================================
// PATH CONSTANTS
// =============================================================================

/// Number of polyline samples used to estimate the length of one bezier
/// segment.
///
/// # Examples
/// ```
/// use config::constants::BEZIER_LENGTH_SAMPLES;
/// assert_eq!(BEZIER_LENGTH_SAMPLES, 10);
/// ```
pub const BEZIER_LENGTH_SAMPLES: usize = 10;

/// Default spacing between sampled tangent frames along a path.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_U_RESOLUTION;
/// assert!(DEFAULT_U_RESOLUTION > 0.0);
/// ```
pub const DEFAULT_U_RESOLUTION: f64 = 1.0;

/// Upper bound on subdivision passes when splitting oversized triangles.
///
/// # Examples
/// ```
/// use config::constants::MAX_SUBDIVISION_PASSES;
/// assert!(MAX_SUBDIVISION_PASSES >= 1);
/// ```
pub const MAX_SUBDIVISION_PASSES: usize = 8;

// =============================================================================
// GLOBAL CONFIGURATION
// =============================================================================

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Point-identity tolerance propagated into geometry kernels.
    pub tolerance: f64,
    /// Interior angle (degrees) at which a triangle is a sliver.
    pub sliver_angle_degrees: f64,
    /// Normal tolerance (degrees) for sliver edge swaps.
    pub sliver_normal_tolerance_degrees: f64,
    /// Blend angle (degrees) used by automatic shading.
    pub auto_smooth_angle_degrees: f64,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// values.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-4, 175.0, 2.0, 45.0).expect("valid config");
    /// assert_eq!(cfg.sliver_angle_degrees, 175.0);
    /// ```
    pub fn new(
        tolerance: f64,
        sliver_angle_degrees: f64,
        sliver_normal_tolerance_degrees: f64,
        auto_smooth_angle_degrees: f64,
    ) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if !(sliver_angle_degrees > 90.0 && sliver_angle_degrees < 180.0) {
            return Err(ConfigError::InvalidAngle {
                name: "sliver_angle_degrees",
                value: sliver_angle_degrees,
            });
        }
        if !(sliver_normal_tolerance_degrees >= 0.0 && sliver_normal_tolerance_degrees < 90.0) {
            return Err(ConfigError::InvalidAngle {
                name: "sliver_normal_tolerance_degrees",
                value: sliver_normal_tolerance_degrees,
            });
        }
        if !(auto_smooth_angle_degrees > 0.0 && auto_smooth_angle_degrees <= 180.0) {
            return Err(ConfigError::InvalidAngle {
                name: "auto_smooth_angle_degrees",
                value: auto_smooth_angle_degrees,
            });
        }
        Ok(Self {
            tolerance,
            sliver_angle_degrees,
            sliver_normal_tolerance_degrees,
            auto_smooth_angle_degrees,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: POINT_EPSILON,
            sliver_angle_degrees: SLIVER_ANGLE_DEGREES,
            sliver_normal_tolerance_degrees: SLIVER_NORMAL_TOLERANCE_DEGREES,
            auto_smooth_angle_degrees: AUTO_SMOOTH_ANGLE_DEGREES,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when an angle threshold is outside its meaningful range.
    InvalidAngle {
        /// Name of the offending field.
        name: &'static str,
        /// Rejected value in degrees.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidAngle { name, value } => {
                write!(f, "{name} is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
