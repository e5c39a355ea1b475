//! # Tolerant Geometry Primitives
//!
//! Tolerance-based point identity shared by every structural comparison in
//! the kernel.
//!
//! Two points are identical when their squared distance is below `ε²`. The
//! predicate is an explicit function taking the tolerance, never an operator
//! overload, so callers always state which ε they compare under.
//!
//! ## Hashing
//!
//! [`PointKey`] quantizes each component to a bucket of size ε. Two points
//! within ε of each other can straddle a bucket boundary and get different
//! keys, so a key alone only approximates tolerance equality. [`SpatialIndex`]
//! compensates by probing the 27 buckets around a query and confirming with
//! [`points_equal`]; widening ε instead would trade false negatives for false
//! positive merges.

use glam::DVec3;
use std::collections::HashMap;

/// Returns true when `a` and `b` are the same point under `epsilon`.
///
/// # Example
///
/// ```rust
/// use shape_kernel::tolerance::points_equal;
/// use glam::DVec3;
///
/// assert!(points_equal(DVec3::ZERO, DVec3::splat(0.0004), 1.0e-3));
/// assert!(!points_equal(DVec3::ZERO, DVec3::X, 1.0e-3));
/// ```
#[inline]
pub fn points_equal(a: DVec3, b: DVec3, epsilon: f64) -> bool {
    a.distance_squared(b) < epsilon * epsilon
}

/// Component-wise hash bucket of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(pub [i64; 3]);

impl PointKey {
    /// Quantizes `point` into buckets of size `epsilon`.
    pub fn new(point: DVec3, epsilon: f64) -> Self {
        let q = |v: f64| (v / epsilon).floor() as i64;
        Self([q(point.x), q(point.y), q(point.z)])
    }

    /// Iterates this key and its 26 neighbouring keys.
    pub fn neighborhood(self) -> impl Iterator<Item = PointKey> {
        let [x, y, z] = self.0;
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| PointKey([x + dx, y + dy, z + dz])))
        })
    }
}

/// Bucketed lookup from positions to values under a fixed tolerance.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    epsilon: f64,
    buckets: HashMap<PointKey, Vec<(DVec3, T)>>,
}

impl<T: Copy + PartialEq> SpatialIndex<T> {
    /// Creates an empty index comparing under `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            buckets: HashMap::new(),
        }
    }

    /// The tolerance this index compares under.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the value stored for a point within ε of `point`, if any.
    ///
    /// When several stored points are within ε the closest one wins.
    pub fn find(&self, point: DVec3) -> Option<T> {
        let mut best: Option<(f64, T)> = None;
        for key in PointKey::new(point, self.epsilon).neighborhood() {
            let Some(bucket) = self.buckets.get(&key) else {
                continue;
            };
            for (stored, value) in bucket {
                if !points_equal(*stored, point, self.epsilon) {
                    continue;
                }
                let d = stored.distance_squared(point);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, *value));
                }
            }
        }
        best.map(|(_, value)| value)
    }

    /// Stores `value` at `point` without checking for an existing match.
    pub fn insert(&mut self, point: DVec3, value: T) {
        self.buckets
            .entry(PointKey::new(point, self.epsilon))
            .or_default()
            .push((point, value));
    }

    /// Removes the entry holding `value` at `point`. Returns true if found.
    pub fn remove(&mut self, point: DVec3, value: T) -> bool {
        let key = PointKey::new(point, self.epsilon);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|(_, v)| *v != value);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        removed
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Largest interior angle of triangle `(a, b, c)` in degrees.
///
/// Degenerate triangles with a zero-length edge report 180°.
pub fn max_interior_angle_degrees(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let corner = |p: DVec3, q: DVec3, r: DVec3| -> f64 {
        let u = q - p;
        let v = r - p;
        let len = u.length() * v.length();
        if len <= f64::EPSILON {
            return 180.0;
        }
        (u.dot(v) / len).clamp(-1.0, 1.0).acos().to_degrees()
    };
    corner(a, b, c).max(corner(b, c, a)).max(corner(c, a, b))
}

/// Angle between two vectors in degrees; zero-length inputs report 180°.
pub fn angle_between_degrees(u: DVec3, v: DVec3) -> f64 {
    let len = u.length() * v.length();
    if len <= f64::EPSILON {
        return 180.0;
    }
    (u.dot(v) / len).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests;
