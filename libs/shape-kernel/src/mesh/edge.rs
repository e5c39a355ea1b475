//! Undirected edges and canonical edge loops.

use super::{MeshObject, TriangleId, VertexId};
use std::hash::{Hash, Hasher};

// =============================================================================
// TEDGE
// =============================================================================

/// An undirected vertex pair with the triangles that own it.
///
/// Equality and hashing ignore direction and ownership.
#[derive(Debug, Clone)]
pub struct TEdge {
    a: VertexId,
    b: VertexId,
    owners: Vec<TriangleId>,
}

impl TEdge {
    /// Creates an edge with no owners.
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            a,
            b,
            owners: Vec::new(),
        }
    }

    /// First endpoint as constructed.
    #[inline]
    pub fn a(&self) -> VertexId {
        self.a
    }

    /// Second endpoint as constructed.
    #[inline]
    pub fn b(&self) -> VertexId {
        self.b
    }

    /// Triangles owning this edge.
    #[inline]
    pub fn owners(&self) -> &[TriangleId] {
        &self.owners
    }

    /// Records `triangle` as an owner.
    pub fn add_owner(&mut self, triangle: TriangleId) {
        if !self.owners.contains(&triangle) {
            self.owners.push(triangle);
        }
    }

    /// True if the edge joins `x` and `y` in either direction.
    #[inline]
    pub fn matches(&self, x: VertexId, y: VertexId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Owned by exactly one triangle.
    pub fn is_open(&self) -> bool {
        self.owners.len() == 1
    }

    /// Owned by exactly two triangles.
    pub fn is_manifold(&self) -> bool {
        self.owners.len() == 2
    }

    fn key(&self) -> (VertexId, VertexId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl PartialEq for TEdge {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.a, other.b)
    }
}

impl Eq for TEdge {}

impl Hash for TEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

// =============================================================================
// EDGE LOOP
// =============================================================================

/// A closed vertex ring stored in canonical order.
///
/// The ring starts at the vertex with the smallest coordinate sum (ties
/// broken by handle) and continues toward its lower-handle neighbour, so the
/// same loop read from any start or in either direction compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeLoop {
    vertices: Vec<VertexId>,
}

impl EdgeLoop {
    /// Canonicalises `ring`; returns `None` if any vertex is not live.
    pub fn new(mesh: &MeshObject, ring: &[VertexId]) -> Option<Self> {
        let sums = ring
            .iter()
            .map(|&v| mesh.position(v).map(|p| p.x + p.y + p.z))
            .collect::<Option<Vec<f64>>>()?;
        if ring.is_empty() {
            return Some(Self { vertices: Vec::new() });
        }

        let start = (0..ring.len())
            .min_by(|&i, &j| sums[i].total_cmp(&sums[j]).then(ring[i].cmp(&ring[j])))
            .unwrap_or(0);
        let n = ring.len();
        let next = ring[(start + 1) % n];
        let prev = ring[(start + n - 1) % n];

        let vertices = if n > 2 && prev < next {
            (0..n).map(|k| ring[(start + n - k) % n]).collect()
        } else {
            (0..n).map(|k| ring[(start + k) % n]).collect()
        };
        Some(Self { vertices })
    }

    /// Vertices in canonical order.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if the loop has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
