//! # Config Crate
//!
//! Centralized configuration constants for the procedural geometry kernel.
//! All tolerances, angle thresholds and sampling counts are defined here so
//! every builder compares points and classifies triangles the same way.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{POINT_EPSILON, SLIVER_ANGLE_DEGREES};
//!
//! // Two points are the same vertex when their squared distance is below ε².
//! let d2: f64 = 0.0005 * 0.0005;
//! assert!(d2 < POINT_EPSILON * POINT_EPSILON);
//!
//! // Triangles with an interior angle at or above this are slivers.
//! assert!(SLIVER_ANGLE_DEGREES > 90.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **One Tolerance**: Vertex dedup, edge matching and loop detection share ε
//! - **Validated Snapshots**: `GlobalConfig::new` rejects nonsensical values

pub mod constants;
