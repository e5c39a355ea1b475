//! Skinning between edges and edge loops.

use super::Face;
use crate::config::KernelConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::tolerance::points_equal;
use glam::{DVec2, DVec3};

/// A directed segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Start point.
    pub a: DVec3,
    /// End point.
    pub b: DVec3,
}

impl Edge {
    /// Creates an edge.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self { a, b }
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

/// Read-only view of a slice whose indices wrap around.
#[derive(Debug, Clone, Copy)]
pub struct Circular<'a, T> {
    items: &'a [T],
}

impl<'a, T> Circular<'a, T> {
    /// Wraps `items`.
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Item at `index` modulo the length; `None` when empty.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if self.items.is_empty() {
            None
        } else {
            self.items.get(index % self.items.len())
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consecutive pairs including the closing pair `(last, first)`.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a T, &'a T)> + '_ {
        (0..self.items.len()).filter_map(move |i| Some((self.get(i)?, self.get(i + 1)?)))
    }
}

/// Joins two edges with the quad `(front.a, front.b, back.b, back.a)`.
pub fn bridge_edges(front: Edge, back: Edge) -> Face {
    Face::quad(front.a, front.b, back.b, back.a)
}

/// Skins two rings with the default configuration.
pub fn bridge_edge_loops(front: &[DVec3], back: &[DVec3]) -> GeometryResult<Vec<Face>> {
    bridge_edge_loops_with_config(front, back, &KernelConfig::default())
}

/// Skins two equal-length closed rings with quads.
///
/// Quad `i` joins `front[i], front[i+1], back[i+1], back[i]`. Where two
/// consecutive points of a ring coincide within `config.tolerance` the quad
/// collapses to a triangle. UVs run `u = i / n` around the ring and `v = 0`
/// front, `1` back.
pub fn bridge_edge_loops_with_config(
    front: &[DVec3],
    back: &[DVec3],
    config: &KernelConfig,
) -> GeometryResult<Vec<Face>> {
    let n = front.len() as f64;
    bridge_textured_loops(front, back, config, |side, i| DVec2::new(i as f64 / n, side as f64))
}

/// Like [`bridge_edge_loops_with_config`] with caller-supplied UVs.
///
/// `uv(side, i)` receives `side = 0` for the front ring, `1` for the back,
/// and `i` in `0..=n`, where `i = n` is the wrapped copy of point `0` on the
/// closing quad so seams can be given their own coordinate.
pub fn bridge_textured_loops<F>(
    front: &[DVec3],
    back: &[DVec3],
    config: &KernelConfig,
    uv: F,
) -> GeometryResult<Vec<Face>>
where
    F: Fn(usize, usize) -> DVec2,
{
    if front.len() != back.len() {
        return Err(GeometryError::RingLengthMismatch {
            front: front.len(),
            back: back.len(),
        });
    }
    let n = front.len();
    let front_ring = Circular::new(front);
    let back_ring = Circular::new(back);

    let mut faces = Vec::with_capacity(n);
    for (i, ((f0, f1), (b0, b1))) in front_ring.pairs().zip(back_ring.pairs()).enumerate() {
        let (f0, f1, b0, b1) = (*f0, *f1, *b0, *b1);
        let front_collapsed = points_equal(f0, f1, config.tolerance);
        let back_collapsed = points_equal(b0, b1, config.tolerance);
        let (uf0, uf1, ub0, ub1) = (uv(0, i), uv(0, i + 1), uv(1, i), uv(1, i + 1));

        let face = match (front_collapsed, back_collapsed) {
            (true, true) => continue,
            (true, false) => Face::triangle(f0, b1, b0).with_uvs([uf0, ub1, ub0, ub0]),
            (false, true) => Face::triangle(f0, f1, b0).with_uvs([uf0, uf1, ub0, ub0]),
            (false, false) => Face::quad(f0, f1, b1, b0).with_uvs([uf0, uf1, ub1, ub0]),
        };
        faces.push(face);
    }
    Ok(faces)
}
