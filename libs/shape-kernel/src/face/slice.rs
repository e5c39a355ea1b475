//! Slicing faces along their own axes, cutouts and indents.

use super::{bridge_edges, Edge, Face, FaceTag};
use config::constants::MIN_SLICE_EXTENT;
use glam::{DVec2, DVec3};
use tracing::debug;

/// Direction of a slice line in face-local space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceAxis {
    /// A line parallel to `up`, measured from the left edge.
    Vertical,
    /// A line parallel to `right`, measured from the bottom edge.
    Horizontal,
}

/// A rectangle in a face's own right/up frame, origin at corner `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRect {
    /// Offset from the left edge.
    pub x: f64,
    /// Offset from the bottom edge.
    pub y: f64,
    /// Extent along `right`.
    pub width: f64,
    /// Extent along `up`.
    pub height: f64,
}

impl LocalRect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Same rectangle with non-negative extents.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self { x, y, width, height }
    }
}

// =============================================================================
// SLICING
// =============================================================================

/// Splits a quad at `offset` along `axis`.
///
/// Returns `(left, right)` for vertical and `(bottom, top)` for horizontal
/// slices, or `None` for triangles and offsets within the minimum extent of
/// either edge. UVs are interpolated; tags and material are inherited.
pub fn slice_face(face: &Face, axis: SliceAxis, offset: f64) -> Option<(Face, Face)> {
    if face.is_triangle() {
        return None;
    }
    let extent = match axis {
        SliceAxis::Vertical => face.width(),
        SliceAxis::Horizontal => face.height(),
    };
    if offset <= MIN_SLICE_EXTENT || offset >= extent - MIN_SLICE_EXTENT {
        return None;
    }
    let t = offset / extent;
    let [a, b, c, d]: [DVec3; 4] = face.points().try_into().ok()?;
    let [ua, ub, uc, ud]: [DVec2; 4] = face.uv_points().try_into().ok()?;

    let (first, second) = match axis {
        SliceAxis::Vertical => {
            let (pb, pt) = (a.lerp(d, t), b.lerp(c, t));
            let (uv_bottom, uv_top) = (ua.lerp(ud, t), ub.lerp(uc, t));
            (
                ([a, b, pt, pb], [ua, ub, uv_top, uv_bottom]),
                ([pb, pt, c, d], [uv_bottom, uv_top, uc, ud]),
            )
        }
        SliceAxis::Horizontal => {
            let (ql, qr) = (a.lerp(b, t), d.lerp(c, t));
            let (ul, ur) = (ua.lerp(ub, t), ud.lerp(uc, t));
            (
                ([a, ql, qr, d], [ua, ul, ur, ud]),
                ([ql, b, c, qr], [ul, ub, uc, ur]),
            )
        }
    };
    Some((
        Face::from_parts(&first.0, &first.1, face)?,
        Face::from_parts(&second.0, &second.1, face)?,
    ))
}

/// Slices without failing; thin remainders come back as `None`.
fn split_at(face: &Face, axis: SliceAxis, offset: f64) -> (Option<Face>, Option<Face>) {
    let extent = match axis {
        SliceAxis::Vertical => face.width(),
        SliceAxis::Horizontal => face.height(),
    };
    if offset <= MIN_SLICE_EXTENT {
        return (None, Some(face.clone()));
    }
    if offset >= extent - MIN_SLICE_EXTENT {
        return (Some(face.clone()), None);
    }
    match slice_face(face, axis, offset) {
        Some((first, second)) => (Some(first), Some(second)),
        None => (None, Some(face.clone())),
    }
}

/// Cuts a rectangular opening into a face.
///
/// A rectangle strictly inside the face yields up to nine pieces with the
/// centre one tagged [`FaceTag::Cutout`]. Pieces thinner than the minimum
/// extent are dropped. A rectangle touching or crossing the boundary leaves
/// the face untouched.
pub fn cut_front(face: &Face, rect: LocalRect) -> Vec<Face> {
    let rect = rect.normalized();
    let inside = rect.x > 0.0
        && rect.y > 0.0
        && rect.x + rect.width < face.width()
        && rect.y + rect.height < face.height();
    if face.is_triangle() || !inside {
        debug!(?rect, "cutout does not fit inside face, skipping");
        return vec![face.clone()];
    }
    if rect.width < MIN_SLICE_EXTENT || rect.height < MIN_SLICE_EXTENT {
        debug!(?rect, "cutout is degenerate, skipping");
        return vec![face.clone()];
    }

    let (left, rest) = split_at(face, SliceAxis::Vertical, rect.x);
    let (middle, right) = match rest {
        Some(rest) => split_at(&rest, SliceAxis::Vertical, rect.width),
        None => (None, None),
    };

    let mut pieces = Vec::with_capacity(9);
    for (column, is_middle) in [(left, false), (middle, true), (right, false)] {
        let Some(column) = column else {
            continue;
        };
        let (bottom, rest) = split_at(&column, SliceAxis::Horizontal, rect.y);
        let (center, top) = match rest {
            Some(rest) => split_at(&rest, SliceAxis::Horizontal, rect.height),
            None => (None, None),
        };
        pieces.extend(bottom);
        pieces.extend(center.map(|f| if is_middle { f.with_tag(FaceTag::Cutout) } else { f }));
        pieces.extend(top);
    }
    pieces
}

// =============================================================================
// INDENT
// =============================================================================

/// Translates a face by `direction` and walls the gap to its old outline.
///
/// Returns the moved cap (tagged [`FaceTag::Indented`]) followed by one side
/// quad per edge (tagged [`FaceTag::Reveal`]). Side quads face the recess and
/// carry world-unit UVs: `u` along the edge, `v` along the depth.
pub fn indent_face(face: &Face, direction: DVec3) -> Vec<Face> {
    let cap = face.clone().translated(direction).with_tag(FaceTag::Indented);
    let depth = direction.length();

    let mut faces = Vec::with_capacity(face.corner_count() + 1);
    faces.push(cap);
    for edge in face.edges() {
        let moved = Edge::new(edge.a + direction, edge.b + direction);
        let run = edge.length();
        let side = bridge_edges(edge, moved)
            .with_uvs([
                DVec2::new(0.0, 0.0),
                DVec2::new(run, 0.0),
                DVec2::new(run, depth),
                DVec2::new(0.0, depth),
            ])
            .with_material(face.material())
            .with_tag(FaceTag::Reveal);
        faces.push(side);
    }
    faces
}

/// Indents every face carrying `tag`; other faces pass through.
pub fn indent_tagged(faces: &[Face], tag: FaceTag, direction: DVec3) -> Vec<Face> {
    faces
        .iter()
        .flat_map(|face| {
            if face.has_tag(tag) {
                indent_face(face, direction)
            } else {
                vec![face.clone()]
            }
        })
        .collect()
}
