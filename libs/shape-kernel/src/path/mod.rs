//! # Bezier Paths
//!
//! Smooth cubic bezier paths through a list of knots.
//!
//! Inner control points are solved so the curve is C2-continuous at every
//! knot (a tridiagonal system per axis, solved with the Thomas algorithm).
//! Curve parameters are mapped by arc length, so `point(0.5)` lies halfway
//! along the path rather than halfway through the segment list.


use crate::error::{GeometryError, GeometryResult};
use config::constants::{BEZIER_LENGTH_SAMPLES, DEFAULT_U_RESOLUTION, DIRECTION_EPSILON};
use glam::DVec3;
use tracing::warn;

// =============================================================================
// TANGENT
// =============================================================================

/// A sampled path position with its unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tangent {
    /// Position on the path.
    pub position: DVec3,
    /// Unit direction of travel.
    pub direction: DVec3,
    /// Scale applied to a cross-section's horizontal extent.
    pub width_scale: f64,
    /// Scale applied to a cross-section's vertical extent.
    pub height_scale: f64,
}

impl Tangent {
    /// Creates an unscaled tangent.
    pub fn new(position: DVec3, direction: DVec3) -> Self {
        Self {
            position,
            direction: direction.normalize_or_zero(),
            width_scale: 1.0,
            height_scale: 1.0,
        }
    }

    /// Copy with cross-section scales.
    pub fn with_scale(mut self, width: f64, height: f64) -> Self {
        self.width_scale = width;
        self.height_scale = height;
        self
    }
}

// =============================================================================
// BEZIER PATH
// =============================================================================

/// A piecewise cubic bezier through at least two knots.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPath {
    knots: Vec<DVec3>,
    controls: Vec<[DVec3; 2]>,
    segment_lengths: Vec<f64>,
    length: f64,
}

impl BezierPath {
    /// Solves control points for `knots`.
    ///
    /// Fewer than two knots is an error.
    pub fn new(knots: Vec<DVec3>) -> GeometryResult<Self> {
        if knots.len() < 2 {
            return Err(GeometryError::NotEnoughKnots { count: knots.len() });
        }
        let controls = solve_controls(&knots);
        let segment_lengths: Vec<f64> = (0..controls.len())
            .map(|i| {
                let [c1, c2] = controls[i];
                polyline_length(knots[i], c1, c2, knots[i + 1])
            })
            .collect();
        let length = segment_lengths.iter().sum();
        Ok(Self {
            knots,
            controls,
            segment_lengths,
            length,
        })
    }

    /// The knots the path passes through.
    pub fn knots(&self) -> &[DVec3] {
        &self.knots
    }

    /// Inner control pair of each segment.
    pub fn control_points(&self) -> &[[DVec3; 2]] {
        &self.controls
    }

    /// Number of cubic segments.
    pub fn segment_count(&self) -> usize {
        self.controls.len()
    }

    /// Approximate length of each segment.
    pub fn segment_lengths(&self) -> &[f64] {
        &self.segment_lengths
    }

    /// Approximate total length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Point at arc-length fraction `t` in `[0, 1]`.
    pub fn point(&self, t: f64) -> DVec3 {
        if t <= 0.0 {
            return self.knots[0];
        }
        if t >= 1.0 {
            return self.knots[self.knots.len() - 1];
        }
        let (segment, local) = self.locate(t);
        let [c1, c2] = self.controls[segment];
        cubic(self.knots[segment], c1, c2, self.knots[segment + 1], local)
    }

    /// Unit direction of travel at arc-length fraction `t`.
    pub fn tangent(&self, t: f64) -> DVec3 {
        let t = t.clamp(0.0, 1.0);
        let (segment, local) = self.locate(t);
        let [c1, c2] = self.controls[segment];
        let derivative = cubic_derivative(self.knots[segment], c1, c2, self.knots[segment + 1], local);
        if derivative.length_squared() > DIRECTION_EPSILON {
            return derivative.normalize();
        }
        let step = 1e-4;
        let secant = self.point((t + step).min(1.0)) - self.point((t - step).max(0.0));
        if secant.length_squared() > DIRECTION_EPSILON {
            return secant.normalize();
        }
        let chord = (self.knots[self.knots.len() - 1] - self.knots[0]).normalize_or_zero();
        if chord == DVec3::ZERO {
            DVec3::Z
        } else {
            chord
        }
    }

    /// Samples positions and directions every `resolution` units of length.
    ///
    /// Produces `ceil(length / resolution) + 1` tangents including both ends.
    /// A non-positive resolution falls back to the default.
    pub fn sample_tangents(&self, resolution: f64) -> Vec<Tangent> {
        let resolution = if resolution > 0.0 {
            resolution
        } else {
            warn!(resolution, "non-positive path resolution, using default");
            DEFAULT_U_RESOLUTION
        };
        let steps = ((self.length / resolution - 1e-6).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                Tangent::new(self.point(t), self.tangent(t))
            })
            .collect()
    }

    /// Maps an arc-length fraction to `(segment, local parameter)`.
    fn locate(&self, t: f64) -> (usize, f64) {
        let last = self.controls.len() - 1;
        if self.length <= 0.0 {
            let scaled = t * self.controls.len() as f64;
            let segment = (scaled.floor() as usize).min(last);
            return (segment, (scaled - segment as f64).clamp(0.0, 1.0));
        }
        let target = t * self.length;
        let mut start = 0.0;
        for (segment, &len) in self.segment_lengths.iter().enumerate() {
            if target <= start + len || segment == last {
                let local = if len > 0.0 { (target - start) / len } else { 0.0 };
                return (segment, local.clamp(0.0, 1.0));
            }
            start += len;
        }
        (last, 1.0)
    }
}

/// Drops points closer than `min_distance` to the previously kept point.
///
/// The first and last points are always kept, so the last kept interior point
/// may sit closer than `min_distance` to the end.
pub fn decimate(points: &[DVec3], min_distance: f64) -> Vec<DVec3> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() == 1 {
        return vec![first];
    }
    let mut kept = vec![first];
    for &p in &points[1..points.len() - 1] {
        if kept.last().is_some_and(|prev| prev.distance(p) >= min_distance) {
            kept.push(p);
        }
    }
    kept.push(last);
    kept
}

// =============================================================================
// CONTROL POINT SOLVER
// =============================================================================

/// Inner control points `[first, second]` for each segment.
fn solve_controls(knots: &[DVec3]) -> Vec<[DVec3; 2]> {
    let n = knots.len() - 1;
    if n == 1 {
        let first = (knots[0] * 2.0 + knots[1]) / 3.0;
        return vec![[first, first * 2.0 - knots[0]]];
    }

    let mut rhs = vec![DVec3::ZERO; n];
    rhs[0] = knots[0] + knots[1] * 2.0;
    for i in 1..n - 1 {
        rhs[i] = knots[i] * 4.0 + knots[i + 1] * 2.0;
    }
    rhs[n - 1] = (knots[n - 1] * 8.0 + knots[n]) / 2.0;

    let xs = solve_tridiagonal(&rhs.iter().map(|v| v.x).collect::<Vec<_>>());
    let ys = solve_tridiagonal(&rhs.iter().map(|v| v.y).collect::<Vec<_>>());
    let zs = solve_tridiagonal(&rhs.iter().map(|v| v.z).collect::<Vec<_>>());
    let first: Vec<DVec3> = (0..n).map(|i| DVec3::new(xs[i], ys[i], zs[i])).collect();

    (0..n)
        .map(|i| {
            let second = if i < n - 1 {
                knots[i + 1] * 2.0 - first[i + 1]
            } else {
                (knots[n] + first[n - 1]) / 2.0
            };
            [first[i], second]
        })
        .collect()
}

/// Thomas algorithm for the first-control system: sub/super diagonals of 1,
/// a main diagonal of `2, 4, ..., 4, 3.5`.
fn solve_tridiagonal(rhs: &[f64]) -> Vec<f64> {
    let n = rhs.len();
    let mut x = vec![0.0; n];
    let mut tmp = vec![0.0; n];
    let mut b = 2.0;
    x[0] = rhs[0] / b;
    for i in 1..n {
        tmp[i] = 1.0 / b;
        b = if i < n - 1 { 4.0 } else { 3.5 } - tmp[i];
        x[i] = (rhs[i] - x[i - 1]) / b;
    }
    for i in 1..n {
        x[n - i - 1] -= tmp[n - i] * x[n - i];
    }
    x
}

// =============================================================================
// CUBIC EVALUATION
// =============================================================================

fn cubic(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

fn cubic_derivative(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let u = 1.0 - t;
    (p1 - p0) * (3.0 * u * u) + (p2 - p1) * (6.0 * u * t) + (p3 - p2) * (3.0 * t * t)
}

fn polyline_length(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> f64 {
    let mut length = 0.0;
    let mut prev = p0;
    for i in 1..=BEZIER_LENGTH_SAMPLES {
        let next = cubic(p0, p1, p2, p3, i as f64 / BEZIER_LENGTH_SAMPLES as f64);
        length += prev.distance(next);
        prev = next;
    }
    length
}
