//! # Quad Faces
//!
//! Planar quads (or triangles) used as the editing unit for building shells.
//!
//! ## Corner Convention
//!
//! Corners `a, b, c, d` are bottom-left, top-left, top-right, bottom-right.
//! The face's right direction runs `a -> d`, its up direction `a -> b`, and
//! default UVs are `(0,0), (0,1), (1,1), (1,0)`. A face triangulates as
//! `A,B,C` and `A,C,D`.
//!
//! ## Operations
//!
//! - [`slice_face`] / [`cut_front`]: split a face along its own axes
//! - [`indent_face`]: push a face back and wall the gap
//! - [`make_hole`]: cut a rectangular prism through stacked faces
//! - [`bridge_edge_loops`]: skin two rings of points

mod bridge;
mod clip;
mod hole;
mod slice;

#[cfg(test)]
mod tests;

pub use bridge::{
    bridge_edge_loops, bridge_edge_loops_with_config, bridge_edges, bridge_textured_loops, Circular, Edge,
};
pub use clip::{split_face, Classification, Plane};
pub use hole::{make_hole, make_hole_with_config, HoleRay};
pub use slice::{cut_front, indent_face, indent_tagged, slice_face, LocalRect, SliceAxis};

use crate::output::MaterialId;
use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

// =============================================================================
// TAGS
// =============================================================================

/// A marker attached to faces by editing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaceTag {
    /// The face is the opening of a cutout or hole.
    Cutout = 1,
    /// The face was pushed back by an indent.
    Indented = 2,
    /// A wall joining an opening to its recessed or opposite side.
    Reveal = 4,
}

/// A small set of [`FaceTag`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceTags(u8);

impl FaceTags {
    /// The empty set.
    pub const EMPTY: FaceTags = FaceTags(0);

    /// Returns true if `tag` is present.
    #[inline]
    pub fn contains(self, tag: FaceTag) -> bool {
        self.0 & tag as u8 != 0
    }

    /// Adds `tag`.
    #[inline]
    pub fn insert(&mut self, tag: FaceTag) {
        self.0 |= tag as u8;
    }

    /// Removes `tag`.
    #[inline]
    pub fn remove(&mut self, tag: FaceTag) {
        self.0 &= !(tag as u8);
    }

    /// Returns true if no tags are present.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// FACE
// =============================================================================

const DEFAULT_UVS: [DVec2; 4] = [
    DVec2::new(0.0, 0.0),
    DVec2::new(0.0, 1.0),
    DVec2::new(1.0, 1.0),
    DVec2::new(1.0, 0.0),
];

/// A planar quad or triangle with UVs, tags and a material.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    corners: [DVec3; 4],
    uvs: [DVec2; 4],
    corner_count: usize,
    tags: FaceTags,
    material: MaterialId,
}

impl Face {
    /// Creates a quad from corners `a, b, c, d` with default UVs.
    pub fn quad(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> Self {
        Self {
            corners: [a, b, c, d],
            uvs: DEFAULT_UVS,
            corner_count: 4,
            tags: FaceTags::EMPTY,
            material: MaterialId::default(),
        }
    }

    /// Creates a triangle face.
    pub fn triangle(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self {
            corners: [a, b, c, c],
            uvs: [DEFAULT_UVS[0], DEFAULT_UVS[1], DEFAULT_UVS[2], DEFAULT_UVS[2]],
            corner_count: 3,
            tags: FaceTags::EMPTY,
            material: MaterialId::default(),
        }
    }

    /// Creates an axis-aligned rectangle spanning `width` along `right` and
    /// `height` along `up` from its bottom-left `origin`.
    pub fn rectangle(origin: DVec3, right: DVec3, up: DVec3, width: f64, height: f64) -> Self {
        let r = right.normalize_or_zero() * width;
        let u = up.normalize_or_zero() * height;
        Self::quad(origin, origin + u, origin + u + r, origin + r)
    }

    /// Builds a face from 3 or 4 points with matching UVs, copying
    /// tags and material from `template`.
    pub(crate) fn from_parts(points: &[DVec3], uvs: &[DVec2], template: &Face) -> Option<Self> {
        let mut face = match points {
            [a, b, c] => Self::triangle(*a, *b, *c),
            [a, b, c, d] => Self::quad(*a, *b, *c, *d),
            _ => return None,
        };
        for (slot, uv) in uvs.iter().take(points.len()).enumerate() {
            face.uvs[slot] = *uv;
        }
        if face.corner_count == 3 {
            face.uvs[3] = face.uvs[2];
        }
        face.tags = template.tags;
        face.material = template.material;
        Some(face)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// True for triangle faces.
    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.corner_count == 3
    }

    /// Number of corners: 3 or 4.
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.corner_count
    }

    /// Corner positions in winding order.
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.corners[..self.corner_count]
    }

    /// Corner UVs in winding order.
    #[inline]
    pub fn uv_points(&self) -> &[DVec2] {
        &self.uvs[..self.corner_count]
    }

    /// Tags on this face.
    #[inline]
    pub fn tags(&self) -> FaceTags {
        self.tags
    }

    /// Returns true if `tag` is set.
    #[inline]
    pub fn has_tag(&self, tag: FaceTag) -> bool {
        self.tags.contains(tag)
    }

    /// Material group.
    #[inline]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Local index triples: `[0,1,2]` and `[0,2,3]` for quads.
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        if self.is_triangle() {
            vec![[0, 1, 2]]
        } else {
            vec![[0, 1, 2], [0, 2, 3]]
        }
    }

    /// Boundary edges in winding order.
    pub fn edges(&self) -> Vec<Edge> {
        let pts = self.points();
        (0..pts.len())
            .map(|i| Edge::new(pts[i], pts[(i + 1) % pts.len()]))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Derived geometry
    // -------------------------------------------------------------------------

    /// Unit normal; zero for degenerate faces.
    pub fn normal(&self) -> DVec3 {
        let [a, b, c, d] = self.corners;
        if self.is_triangle() {
            (b - a).cross(c - a).normalize_or_zero()
        } else {
            (c - a).cross(d - b).normalize_or_zero()
        }
    }

    /// Average of the corners.
    pub fn center(&self) -> DVec3 {
        self.points().iter().copied().sum::<DVec3>() / self.corner_count as f64
    }

    /// Surface area.
    pub fn area(&self) -> f64 {
        let [a, b, c, d] = self.corners;
        if self.is_triangle() {
            0.5 * (b - a).cross(c - a).length()
        } else {
            0.5 * (c - a).cross(d - b).length()
        }
    }

    /// Unit direction from `a` toward `d` (toward `c` for triangles).
    pub fn right(&self) -> DVec3 {
        (self.right_edge_end() - self.corners[0]).normalize_or_zero()
    }

    /// Unit direction from `a` toward `b`.
    pub fn up(&self) -> DVec3 {
        (self.corners[1] - self.corners[0]).normalize_or_zero()
    }

    /// Length of the bottom edge.
    pub fn width(&self) -> f64 {
        (self.right_edge_end() - self.corners[0]).length()
    }

    /// Length of the left edge.
    pub fn height(&self) -> f64 {
        (self.corners[1] - self.corners[0]).length()
    }

    /// Point at `(x, y)` in the face's own right/up frame.
    pub fn local_point(&self, x: f64, y: f64) -> DVec3 {
        self.corners[0] + self.right() * x + self.up() * y
    }

    /// Plane through the face, front side along its normal.
    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.corners[0], self.normal())
    }

    fn right_edge_end(&self) -> DVec3 {
        if self.is_triangle() {
            self.corners[2]
        } else {
            self.corners[3]
        }
    }

    // -------------------------------------------------------------------------
    // Transforms
    // -------------------------------------------------------------------------

    /// Copy with `tag` added.
    pub fn with_tag(mut self, tag: FaceTag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Copy with `tag` removed.
    pub fn without_tag(mut self, tag: FaceTag) -> Self {
        self.tags.remove(tag);
        self
    }

    /// Copy assigned to `material`.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }

    /// Copy with explicit UVs; the fourth is ignored for triangles.
    pub fn with_uvs(mut self, uvs: [DVec2; 4]) -> Self {
        self.uvs = uvs;
        if self.is_triangle() {
            self.uvs[3] = self.uvs[2];
        }
        self
    }

    /// Copy moved by `offset`.
    pub fn translated(mut self, offset: DVec3) -> Self {
        for p in &mut self.corners {
            *p += offset;
        }
        self
    }

    /// Copy rotated by `rotation` around `pivot`.
    pub fn rotated(mut self, rotation: DQuat, pivot: DVec3) -> Self {
        for p in &mut self.corners {
            *p = pivot + rotation * (*p - pivot);
        }
        self
    }

    /// Copy with reversed winding; the first corner stays first.
    pub fn inverted(mut self) -> Self {
        let last = self.corner_count - 1;
        self.corners[1..=last].reverse();
        self.uvs[1..=last].reverse();
        if self.is_triangle() {
            self.corners[3] = self.corners[2];
            self.uvs[3] = self.uvs[2];
        }
        self
    }
}
