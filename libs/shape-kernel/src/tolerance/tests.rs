//! Tests for tolerance predicates and the spatial index.

use super::*;
use approx::assert_relative_eq;

const EPS: f64 = 1.0e-3;

#[test]
fn points_equal_uses_squared_distance() {
    assert!(points_equal(DVec3::ZERO, DVec3::new(0.0009, 0.0, 0.0), EPS));
    assert!(!points_equal(DVec3::ZERO, DVec3::new(0.0011, 0.0, 0.0), EPS));
    // 0.0006 on each axis is ~0.00104 away
    assert!(!points_equal(DVec3::ZERO, DVec3::splat(0.0006), EPS));
}

#[test]
fn point_key_buckets_by_epsilon() {
    assert_eq!(PointKey::new(DVec3::new(0.0015, 0.0, -0.0005), EPS).0, [1, 0, -1]);
    assert_eq!(PointKey::new(DVec3::ZERO, EPS).neighborhood().count(), 27);
}

#[test]
fn index_finds_points_across_bucket_boundaries() {
    let mut index = SpatialIndex::new(EPS);
    // Sits just below a bucket boundary on every axis.
    let stored = DVec3::splat(0.00099);
    index.insert(stored, 7u32);

    let probe = DVec3::splat(0.00101);
    assert_ne!(PointKey::new(stored, EPS), PointKey::new(probe, EPS));
    assert_eq!(index.find(probe), Some(7));
}

#[test]
fn index_prefers_closest_match() {
    let mut index = SpatialIndex::new(EPS);
    index.insert(DVec3::new(0.0008, 0.0, 0.0), 1u32);
    index.insert(DVec3::new(0.0001, 0.0, 0.0), 2u32);
    assert_eq!(index.find(DVec3::ZERO), Some(2));
}

#[test]
fn index_remove_is_exact() {
    let mut index = SpatialIndex::new(EPS);
    index.insert(DVec3::X, 1u32);
    assert!(!index.remove(DVec3::X, 2));
    assert!(index.remove(DVec3::X, 1));
    assert!(index.is_empty());
    assert_eq!(index.find(DVec3::X), None);
}

#[test]
fn max_interior_angle_of_right_triangle() {
    let angle = max_interior_angle_degrees(DVec3::ZERO, DVec3::X, DVec3::Y);
    assert_relative_eq!(angle, 90.0, epsilon = 1e-9);
}

#[test]
fn max_interior_angle_of_sliver() {
    let angle = max_interior_angle_degrees(
        DVec3::ZERO,
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(5.0, 0.1, 0.0),
    );
    assert!(angle > 170.0);
}

#[test]
fn angle_between_opposite_vectors() {
    assert_relative_eq!(angle_between_degrees(DVec3::X, -DVec3::X), 180.0, epsilon = 1e-9);
    assert_relative_eq!(angle_between_degrees(DVec3::X, DVec3::Y), 90.0, epsilon = 1e-9);
}
