use super::*;
use crate::config::KernelConfig;
use crate::error::GeometryError;
use approx::assert_relative_eq;

/// A `w x h` wall in z = 0 with corners a..d as bottom-left..bottom-right.
fn wall(w: f64, h: f64) -> Face {
    Face::quad(
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, h, 0.0),
        DVec3::new(w, h, 0.0),
        DVec3::new(w, 0.0, 0.0),
    )
}

fn total_area(faces: &[Face]) -> f64 {
    faces.iter().map(Face::area).sum()
}

// =============================================================================
// FACE
// =============================================================================

#[test]
fn test_face_frame() {
    let face = wall(4.0, 2.0);

    assert_eq!(face.right(), DVec3::X);
    assert_eq!(face.up(), DVec3::Y);
    assert_relative_eq!(face.width(), 4.0);
    assert_relative_eq!(face.height(), 2.0);
    assert_relative_eq!(face.area(), 8.0);
    assert_eq!(face.normal(), -DVec3::Z);
    assert_eq!(face.center(), DVec3::new(2.0, 1.0, 0.0));
    assert_eq!(face.local_point(1.0, 0.5), DVec3::new(1.0, 0.5, 0.0));
}

#[test]
fn test_rectangle_matches_quad() {
    let face = Face::rectangle(DVec3::ZERO, DVec3::X, DVec3::Y, 4.0, 2.0);
    assert_eq!(face.points(), wall(4.0, 2.0).points());
}

#[test]
fn test_inverted_flips_normal_and_keeps_first_corner() {
    let face = wall(1.0, 1.0).inverted();
    assert_eq!(face.normal(), DVec3::Z);
    assert_eq!(face.points()[0], DVec3::ZERO);
    assert_eq!(face.uv_points()[1], DVec2::new(1.0, 0.0));

    let tri = Face::triangle(DVec3::ZERO, DVec3::X, DVec3::Y).inverted();
    assert_eq!(tri.points(), &[DVec3::ZERO, DVec3::Y, DVec3::X]);
}

#[test]
fn test_tags_and_transforms() {
    let face = wall(1.0, 1.0)
        .with_tag(FaceTag::Cutout)
        .with_tag(FaceTag::Reveal)
        .without_tag(FaceTag::Cutout)
        .translated(DVec3::Z);

    assert!(face.has_tag(FaceTag::Reveal));
    assert!(!face.has_tag(FaceTag::Cutout));
    assert_eq!(face.center().z, 1.0);

    let turned = wall(2.0, 2.0).rotated(glam::DQuat::from_rotation_y(std::f64::consts::PI), DVec3::new(1.0, 1.0, 0.0));
    assert!(turned.normal().distance(DVec3::Z) < 1e-12);
}

// =============================================================================
// SLICING
// =============================================================================

#[test]
fn test_vertical_slice() {
    let (left, right) = slice_face(&wall(4.0, 2.0), SliceAxis::Vertical, 1.0).unwrap();

    assert_relative_eq!(left.width(), 1.0);
    assert_relative_eq!(right.width(), 3.0);
    assert_eq!(right.points()[0], DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(left.uv_points()[2], DVec2::new(0.25, 1.0));
    assert_eq!(right.uv_points()[0], DVec2::new(0.25, 0.0));
}

#[test]
fn test_horizontal_slice() {
    let (bottom, top) = slice_face(&wall(4.0, 2.0), SliceAxis::Horizontal, 0.5).unwrap();

    assert_relative_eq!(bottom.height(), 0.5);
    assert_relative_eq!(top.height(), 1.5);
    assert_eq!(top.points()[0], DVec3::new(0.0, 0.5, 0.0));
    assert_eq!(bottom.normal(), top.normal());
}

#[test]
fn test_slices_rejoin_into_the_original_face() {
    let face = wall(4.0, 2.0).with_uvs([
        DVec2::new(0.1, 0.2),
        DVec2::new(0.1, 0.9),
        DVec2::new(0.8, 0.9),
        DVec2::new(0.8, 0.2),
    ]);

    let (left, right) = slice_face(&face, SliceAxis::Vertical, 1.3).unwrap();
    let (l, r) = (left.points(), right.points());
    assert_eq!([l[0], l[1], r[2], r[3]], [face.points()[0], face.points()[1], face.points()[2], face.points()[3]]);
    assert_eq!((l[3], l[2]), (r[0], r[1]));
    let (lu, ru) = (left.uv_points(), right.uv_points());
    assert_eq!((lu[3], lu[2]), (ru[0], ru[1]));

    let (bottom, top) = slice_face(&face, SliceAxis::Horizontal, 0.7).unwrap();
    let (b, t) = (bottom.points(), top.points());
    assert_eq!([b[0], t[1], t[2], b[3]], [face.points()[0], face.points()[1], face.points()[2], face.points()[3]]);
    assert_eq!((b[1], b[2]), (t[0], t[3]));
    let (bu, tu) = (bottom.uv_points(), top.uv_points());
    assert_eq!((bu[1], bu[2]), (tu[0], tu[3]));
    assert_relative_eq!(bottom.area() + top.area(), face.area(), epsilon = 1e-12);
}

#[test]
fn test_slice_at_edge_is_rejected() {
    let face = wall(4.0, 2.0);
    assert!(slice_face(&face, SliceAxis::Vertical, 0.0).is_none());
    assert!(slice_face(&face, SliceAxis::Vertical, 4.0).is_none());
    assert!(slice_face(&Face::triangle(DVec3::ZERO, DVec3::Y, DVec3::X), SliceAxis::Vertical, 0.5).is_none());
}

// =============================================================================
// CUTOUTS
// =============================================================================

#[test]
fn test_cut_front_makes_nine_pieces() {
    let face = wall(10.0, 6.0);
    let pieces = cut_front(&face, LocalRect::new(3.0, 2.0, 4.0, 2.0));

    assert_eq!(pieces.len(), 9);
    assert_relative_eq!(total_area(&pieces), 60.0, epsilon = 1e-9);
    let cutouts: Vec<&Face> = pieces.iter().filter(|f| f.has_tag(FaceTag::Cutout)).collect();
    assert_eq!(cutouts.len(), 1);
    assert_relative_eq!(cutouts[0].area(), 8.0, epsilon = 1e-9);
    assert!(cutouts[0].center().distance(DVec3::new(5.0, 3.0, 0.0)) < 1e-9);
}

#[test]
fn test_cut_front_accepts_negative_extent() {
    let pieces = cut_front(&wall(10.0, 6.0), LocalRect::new(7.0, 4.0, -4.0, -2.0));
    let cutout = pieces.iter().find(|f| f.has_tag(FaceTag::Cutout)).unwrap();
    assert!(cutout.center().distance(DVec3::new(5.0, 3.0, 0.0)) < 1e-9);
}

#[test]
fn test_cut_front_outside_face_is_untouched() {
    let face = wall(10.0, 6.0);
    for rect in [
        LocalRect::new(0.0, 2.0, 4.0, 2.0),
        LocalRect::new(8.0, 2.0, 4.0, 2.0),
        LocalRect::new(3.0, -1.0, 4.0, 2.0),
    ] {
        assert_eq!(cut_front(&face, rect), vec![face.clone()]);
    }
}

#[test]
fn test_cut_front_drops_thin_margins() {
    let pieces = cut_front(&wall(10.0, 6.0), LocalRect::new(0.00005, 2.0, 4.0, 2.0));
    assert_eq!(pieces.len(), 6);
    assert_relative_eq!(total_area(&pieces), 60.0, epsilon = 1e-9);
}

// =============================================================================
// INDENT
// =============================================================================

#[test]
fn test_indent_face_builds_recess() {
    let face = wall(2.0, 2.0).with_tag(FaceTag::Cutout);
    let depth = DVec3::new(0.0, 0.0, 0.5);
    let faces = indent_face(&face, depth);

    assert_eq!(faces.len(), 5);
    assert!(faces[0].has_tag(FaceTag::Indented));
    assert!(faces[0].has_tag(FaceTag::Cutout));
    assert_eq!(faces[0].center(), DVec3::new(1.0, 1.0, 0.5));

    let recess_center = DVec3::new(1.0, 1.0, 0.25);
    for side in &faces[1..] {
        assert!(side.has_tag(FaceTag::Reveal));
        assert_relative_eq!(side.area(), 1.0, epsilon = 1e-12);
        assert!(side.normal().dot(recess_center - side.center()) > 0.0);
    }
}

#[test]
fn test_indent_sides_use_world_unit_uvs() {
    let faces = indent_face(&wall(2.0, 3.0), DVec3::new(0.0, 0.0, 0.5));

    // First edge runs up the left side, 3 units long.
    assert_eq!(faces[1].uv_points()[2], DVec2::new(3.0, 0.5));
    assert_eq!(faces[2].uv_points()[1], DVec2::new(2.0, 0.0));
}

#[test]
fn test_indented_cutout_keeps_wall_area() {
    let face = wall(8.0, 4.0);
    let pieces = cut_front(&face, LocalRect::new(2.0, 1.0, 3.0, 2.0));
    assert_eq!(pieces.iter().filter(|f| f.has_tag(FaceTag::Cutout)).count(), 1);

    let result = indent_tagged(&pieces, FaceTag::Cutout, DVec3::new(0.0, 0.0, 0.4));
    let surface: Vec<Face> = result
        .iter()
        .filter(|f| !f.has_tag(FaceTag::Indented) && !f.has_tag(FaceTag::Reveal))
        .cloned()
        .collect();
    assert_relative_eq!(total_area(&surface), 32.0 - 6.0, epsilon = 1e-9);

    // Sides add no area seen along the wall normal; the cap replaces the opening.
    let projected = |f: &Face| f.area() * f.normal().dot(DVec3::Z).abs();
    let reveal: f64 = result.iter().filter(|f| f.has_tag(FaceTag::Reveal)).map(projected).sum();
    assert_relative_eq!(reveal, 0.0, epsilon = 1e-9);
    let cap: f64 = result.iter().filter(|f| f.has_tag(FaceTag::Indented)).map(Face::area).sum();
    assert_relative_eq!(cap, 6.0, epsilon = 1e-9);
}

#[test]
fn test_indent_tagged_only_touches_tagged_faces() {
    let pieces = cut_front(&wall(10.0, 6.0), LocalRect::new(3.0, 2.0, 4.0, 2.0));
    let result = indent_tagged(&pieces, FaceTag::Cutout, DVec3::Z);

    assert_eq!(result.len(), 9 + 4);
    assert_eq!(result.iter().filter(|f| f.has_tag(FaceTag::Indented)).count(), 1);
}

// =============================================================================
// CLIPPING
// =============================================================================

#[test]
fn test_plane_classification() {
    let plane = Plane::from_point_normal(DVec3::new(1.0, 0.0, 0.0), DVec3::X);

    assert_eq!(plane.classify_point(DVec3::new(2.0, 0.0, 0.0), 1e-3), Classification::Front);
    assert_eq!(plane.classify_point(DVec3::ZERO, 1e-3), Classification::Back);
    assert_eq!(plane.classify_point(DVec3::new(1.0, 5.0, 0.0), 1e-3), Classification::Coplanar);
    assert_eq!(plane.classify_face(&wall(4.0, 1.0), 1e-3), Classification::Spanning);
    assert_relative_eq!(plane.flip().signed_distance(DVec3::ZERO), 1.0);
}

#[test]
fn test_split_face_into_quads() {
    let plane = Plane::from_point_normal(DVec3::new(1.0, 0.0, 0.0), DVec3::X);
    let (front, back) = split_face(&wall(4.0, 2.0), &plane, 1e-3);

    assert_eq!(front.len(), 1);
    assert_eq!(back.len(), 1);
    assert_relative_eq!(front[0].area(), 6.0, epsilon = 1e-12);
    assert_relative_eq!(back[0].area(), 2.0, epsilon = 1e-12);
    assert_eq!(front[0].points()[0], DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(back[0].points()[0], DVec3::ZERO);
}

#[test]
fn test_diagonal_split_yields_triangle_and_fan() {
    let plane = Plane::from_point_normal(DVec3::new(1.0, 0.0, 0.0), DVec3::new(1.0, 1.0, 0.0));
    let (front, back) = split_face(&wall(2.0, 2.0), &plane, 1e-3);

    assert_eq!(back.len(), 1);
    assert!(back[0].is_triangle());
    assert_eq!(front.len(), 2);
    assert!(!front[0].is_triangle());
    assert!(front[1].is_triangle());
    assert_relative_eq!(total_area(&front) + total_area(&back), 4.0, epsilon = 1e-12);
}

// =============================================================================
// HOLES
// =============================================================================

#[test]
fn test_hole_through_single_wall() {
    let ray = HoleRay::new(DVec3::new(5.0, 5.0, -5.0), DVec3::Z, DVec3::Y, 2.0, 2.0);
    let faces = make_hole(vec![wall(10.0, 10.0)], &ray);

    assert_eq!(faces.len(), 9);
    let (cutouts, rest): (Vec<Face>, Vec<Face>) = faces.into_iter().partition(|f| f.has_tag(FaceTag::Cutout));
    assert_eq!(cutouts.len(), 1);
    assert_relative_eq!(cutouts[0].area(), 4.0, epsilon = 1e-9);
    assert_eq!(rest.len(), 8);
    assert_relative_eq!(total_area(&rest), 96.0, epsilon = 1e-9);
}

#[test]
fn test_hole_through_two_walls_is_bridged() {
    let front = wall(10.0, 10.0);
    let back = wall(10.0, 10.0).inverted().translated(DVec3::new(0.0, 0.0, 2.0));
    let ray = HoleRay::new(DVec3::new(5.0, 5.0, -5.0), DVec3::Z, DVec3::Y, 2.0, 2.0);
    let faces = make_hole(vec![front, back], &ray);

    assert_eq!(faces.len(), 20);
    assert!(faces.iter().all(|f| !f.has_tag(FaceTag::Cutout)));
    let reveals: Vec<&Face> = faces.iter().filter(|f| f.has_tag(FaceTag::Reveal)).collect();
    assert_eq!(reveals.len(), 4);
    for reveal in reveals {
        assert_relative_eq!(reveal.area(), 4.0, epsilon = 1e-9);
        let axis = DVec3::new(5.0, 5.0, reveal.center().z);
        assert!(reveal.normal().dot(axis - reveal.center()) > 0.0);
    }
}

#[test]
fn test_hole_respects_max_distance() {
    let front = wall(10.0, 10.0);
    let back = wall(10.0, 10.0).translated(DVec3::new(0.0, 0.0, 2.0));
    let ray = HoleRay::new(DVec3::new(5.0, 5.0, -5.0), DVec3::Z, DVec3::Y, 2.0, 2.0).with_max_distance(6.0);
    let faces = make_hole(vec![front, back.clone()], &ray);

    assert_eq!(faces.len(), 10);
    assert_eq!(faces.iter().filter(|f| f.has_tag(FaceTag::Cutout)).count(), 1);
    assert!(faces.contains(&back));
}

#[test]
fn test_hole_missing_every_face_changes_nothing() {
    let face = wall(10.0, 10.0);
    let ray = HoleRay::new(DVec3::new(50.0, 50.0, -5.0), DVec3::Z, DVec3::Y, 2.0, 2.0);
    assert_eq!(make_hole(vec![face.clone()], &ray), vec![face]);

    let parallel = HoleRay::new(DVec3::new(5.0, 5.0, -5.0), DVec3::X, DVec3::Y, 2.0, 2.0);
    assert_eq!(make_hole(vec![wall(10.0, 10.0)], &parallel).len(), 1);
}

// =============================================================================
// BRIDGING
// =============================================================================

#[test]
fn test_bridge_edges() {
    let face = bridge_edges(Edge::new(DVec3::ZERO, DVec3::X), Edge::new(DVec3::Z, DVec3::new(1.0, 0.0, 1.0)));
    assert_eq!(
        face.points(),
        &[DVec3::ZERO, DVec3::X, DVec3::new(1.0, 0.0, 1.0), DVec3::Z]
    );
}

#[test]
fn test_bridge_loops_makes_one_quad_per_edge() {
    let square = |z: f64| {
        vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(1.0, 1.0, z),
            DVec3::new(0.0, 1.0, z),
        ]
    };
    let faces = bridge_edge_loops(&square(0.0), &square(1.0)).unwrap();

    assert_eq!(faces.len(), 4);
    assert!(faces.iter().all(|f| !f.is_triangle()));
    assert_relative_eq!(total_area(&faces), 4.0, epsilon = 1e-12);
    assert_eq!(faces[3].uv_points()[1], DVec2::new(1.0, 0.0));
}

#[test]
fn test_bridge_loops_collapses_coincident_points() {
    let front = vec![DVec3::ZERO, DVec3::X, DVec3::X, DVec3::Y];
    let back: Vec<DVec3> = front.iter().map(|p| *p + DVec3::Z).collect();
    let faces = bridge_edge_loops(&front, &back).unwrap();

    assert_eq!(faces.len(), 3);
}

#[test]
fn test_bridge_loops_collapse_within_configured_tolerance() {
    let front = vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 0.01, 0.0), DVec3::Y];
    let back: Vec<DVec3> = front.iter().map(|p| *p + DVec3::Z).collect();

    assert_eq!(bridge_edge_loops(&front, &back).unwrap().len(), 4);
    let loose = KernelConfig::default().with_tolerance(0.05).unwrap();
    assert_eq!(bridge_edge_loops_with_config(&front, &back, &loose).unwrap().len(), 3);
}

#[test]
fn test_bridge_loops_rejects_mismatched_rings() {
    let result = bridge_edge_loops(&[DVec3::ZERO, DVec3::X, DVec3::Y], &[DVec3::ZERO, DVec3::X]);
    assert_eq!(result, Err(GeometryError::RingLengthMismatch { front: 3, back: 2 }));
}

#[test]
fn test_circular_view_wraps() {
    let items = [1, 2, 3];
    let ring = Circular::new(&items);

    assert_eq!(ring.get(4), Some(&2));
    assert_eq!(ring.pairs().collect::<Vec<_>>(), vec![(&1, &2), (&2, &3), (&3, &1)]);
    assert_eq!(Circular::<i32>::new(&[]).get(0), None);
}
