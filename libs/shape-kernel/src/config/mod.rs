//! Kernel-level configuration helpers building on the shared `config` crate.
//!
//! The module wraps the workspace configuration so geometry components can
//! stay decoupled from literal constants.

use config::constants::{
    ConfigError, GlobalConfig, AUTO_SMOOTH_ANGLE_DEGREES, POINT_EPSILON, SLIVER_ANGLE_DEGREES,
    SLIVER_NORMAL_TOLERANCE_DEGREES,
};

/// Geometry kernel configuration wrapper.
///
/// # Examples
/// ```
/// use shape_kernel::config::KernelConfig;
/// let cfg = KernelConfig::default();
/// assert!(cfg.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Point-identity tolerance forwarded to every structural comparison.
    pub tolerance: f64,
    /// Interior angle (degrees) at which a triangle is queued for repair.
    pub sliver_angle_degrees: f64,
    /// Maximum normal deviation (degrees) between a sliver and its swap partner.
    pub sliver_normal_tolerance_degrees: f64,
    /// Blend angle (degrees) for automatic shading.
    pub auto_smooth_angle_degrees: f64,
}

impl KernelConfig {
    /// Creates a new configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use shape_kernel::config::KernelConfig;
    /// let cfg = KernelConfig::new(1.0e-4, 170.0, 5.0, 60.0).unwrap();
    /// assert_eq!(cfg.tolerance, 1.0e-4);
    /// ```
    pub fn new(
        tolerance: f64,
        sliver_angle_degrees: f64,
        sliver_normal_tolerance_degrees: f64,
        auto_smooth_angle_degrees: f64,
    ) -> Result<Self, KernelConfigError> {
        GlobalConfig::new(
            tolerance,
            sliver_angle_degrees,
            sliver_normal_tolerance_degrees,
            auto_smooth_angle_degrees,
        )
        .map(Self::from)
        .map_err(KernelConfigError)
    }

    /// Returns a copy using a different point tolerance.
    ///
    /// # Examples
    /// ```
    /// use shape_kernel::config::KernelConfig;
    /// let cfg = KernelConfig::default().with_tolerance(1.0e-5).unwrap();
    /// assert_eq!(cfg.tolerance, 1.0e-5);
    /// ```
    pub fn with_tolerance(self, tolerance: f64) -> Result<Self, KernelConfigError> {
        Self::new(
            tolerance,
            self.sliver_angle_degrees,
            self.sliver_normal_tolerance_degrees,
            self.auto_smooth_angle_degrees,
        )
    }
}

impl From<GlobalConfig> for KernelConfig {
    fn from(cfg: GlobalConfig) -> Self {
        Self {
            tolerance: cfg.tolerance,
            sliver_angle_degrees: cfg.sliver_angle_degrees,
            sliver_normal_tolerance_degrees: cfg.sliver_normal_tolerance_degrees,
            auto_smooth_angle_degrees: cfg.auto_smooth_angle_degrees,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: POINT_EPSILON,
            sliver_angle_degrees: SLIVER_ANGLE_DEGREES,
            sliver_normal_tolerance_degrees: SLIVER_NORMAL_TOLERANCE_DEGREES,
            auto_smooth_angle_degrees: AUTO_SMOOTH_ANGLE_DEGREES,
        }
    }
}

/// Error wrapper for invalid kernel configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfigError(pub ConfigError);

impl std::fmt::Display for KernelConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for KernelConfigError {}
