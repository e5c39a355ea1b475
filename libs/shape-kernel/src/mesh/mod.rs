//! # Mesh Data Model
//!
//! Arena-indexed triangle mesh with bidirectional vertex/triangle adjacency.
//!
//! Vertices and triangles live in tombstoned arrays addressed by stable
//! [`VertexId`]/[`TriangleId`] handles. Every vertex keeps the list of
//! triangles that reference it; every structural edit keeps that list exact.
//!
//! ## Invariants
//!
//! - Every live triangle references three live vertices
//! - A vertex's triangle list is exactly the set of live triangles using it
//! - Vertex positions are unique within the configured tolerance
//!
//! ## Example
//!
//! ```rust
//! use shape_kernel::MeshObject;
//! use glam::DVec3;
//!
//! let mut mesh = MeshObject::new();
//! let a = mesh.add(DVec3::ZERO);
//! let b = mesh.add(DVec3::X);
//! let c = mesh.add(DVec3::Y);
//! mesh.add_triangle(a, b, c).unwrap();
//! assert_eq!(mesh.add(DVec3::new(0.0002, 0.0, 0.0)), a);
//! ```

mod edge;
mod render;


pub use edge::{EdgeLoop, TEdge};

use crate::config::KernelConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::face::Face;
use crate::tolerance::{max_interior_angle_degrees, SpatialIndex};
use config::constants::MAX_SUBDIVISION_PASSES;
use glam::{DVec2, DVec3};
use std::collections::HashMap;
use tracing::warn;

// =============================================================================
// HANDLES
// =============================================================================

/// Stable handle of a vertex inside a [`MeshObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Stable handle of a triangle inside a [`MeshObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(pub u32);

impl VertexId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl TriangleId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// VERTEX / TRIANGLE
// =============================================================================

/// A point owned by the mesh plus the triangles incident to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    position: DVec3,
    triangles: Vec<TriangleId>,
}

impl Vertex {
    /// Position in space.
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Triangles referencing this vertex.
    #[inline]
    pub fn triangles(&self) -> &[TriangleId] {
        &self.triangles
    }

    fn link(&mut self, triangle: TriangleId) {
        if !self.triangles.contains(&triangle) {
            self.triangles.push(triangle);
        }
    }

    fn unlink(&mut self, triangle: TriangleId) {
        self.triangles.retain(|&t| t != triangle);
    }
}

/// An ordered vertex triple; winding defines the outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [VertexId; 3],
    uvs: [DVec2; 3],
}

impl Triangle {
    /// Corner vertices in winding order.
    #[inline]
    pub fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }

    /// Per-corner texture coordinates.
    #[inline]
    pub fn uvs(&self) -> [DVec2; 3] {
        self.uvs
    }

    /// Returns true if `vertex` is one of the corners.
    #[inline]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Number of corners shared with `other`.
    pub fn shared_vertex_count(&self, other: &Triangle) -> usize {
        self.vertices.iter().filter(|v| other.contains(**v)).count()
    }

    /// Same three vertices regardless of order.
    pub fn same_vertices(&self, other: &Triangle) -> bool {
        self.shared_vertex_count(other) == 3
    }

    /// Exactly two shared vertices.
    pub fn shares_edge(&self, other: &Triangle) -> bool {
        self.shared_vertex_count(other) == 2
    }

    /// Directed edges in winding order.
    pub fn edges(&self) -> [(VertexId, VertexId); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// The corner that is neither `a` nor `b`.
    pub fn opposite(&self, a: VertexId, b: VertexId) -> Option<VertexId> {
        self.vertices.iter().copied().find(|&v| v != a && v != b)
    }

    /// Texture coordinate stored for `vertex`.
    pub fn uv_of(&self, vertex: VertexId) -> Option<DVec2> {
        self.vertices
            .iter()
            .position(|&v| v == vertex)
            .map(|slot| self.uvs[slot])
    }
}

// =============================================================================
// MESH OBJECT
// =============================================================================

/// The owning aggregate of all vertices and triangles of one logical solid.
#[derive(Debug, Clone)]
pub struct MeshObject {
    config: KernelConfig,
    vertices: Vec<Option<Vertex>>,
    triangles: Vec<Option<Triangle>>,
    index: SpatialIndex<VertexId>,
    vertex_count: usize,
    triangle_count: usize,
}

impl Default for MeshObject {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshObject {
    /// Creates an empty mesh with the default tolerance.
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    /// Creates an empty mesh comparing points under `config.tolerance`.
    pub fn with_config(config: KernelConfig) -> Self {
        Self {
            config,
            vertices: Vec::new(),
            triangles: Vec::new(),
            index: SpatialIndex::new(config.tolerance),
            vertex_count: 0,
            triangle_count: 0,
        }
    }

    /// The configuration this mesh was built with.
    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Returns the number of live vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the number of live triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Returns true if the mesh holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Returns the vertex behind `id` if it is live.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns the position of vertex `id` if it is live.
    pub fn position(&self, id: VertexId) -> Option<DVec3> {
        self.vertex(id).map(Vertex::position)
    }

    /// Returns the triangle behind `id` if it is live.
    pub fn triangle(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.get(id.index()).and_then(Option::as_ref)
    }

    /// Iterates live vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (VertexId(i as u32), v)))
    }

    /// Iterates live triangles.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (TriangleId(i as u32), t)))
    }

    /// Handles of all live triangles.
    pub fn triangle_ids(&self) -> Vec<TriangleId> {
        self.triangles().map(|(id, _)| id).collect()
    }

    /// Finds the vertex within tolerance of `point`.
    pub fn find(&self, point: DVec3) -> Option<VertexId> {
        self.index.find(point)
    }

    /// Corner positions of triangle `id`.
    pub fn triangle_positions(&self, id: TriangleId) -> Option<[DVec3; 3]> {
        let tri = self.triangle(id)?;
        let [a, b, c] = tri.vertices;
        Some([self.position(a)?, self.position(b)?, self.position(c)?])
    }

    /// Unit normal `cross(v1 - v0, v2 - v0)`; zero for degenerate triangles.
    pub fn triangle_normal(&self, id: TriangleId) -> Option<DVec3> {
        self.triangle_positions(id)
            .map(|[a, b, c]| (b - a).cross(c - a).normalize_or_zero())
    }

    /// Area of triangle `id`.
    pub fn triangle_area(&self, id: TriangleId) -> Option<f64> {
        self.triangle_positions(id)
            .map(|[a, b, c]| 0.5 * (b - a).cross(c - a).length())
    }

    /// Signed distance of `point` from the plane of triangle `id`.
    pub fn signed_distance(&self, id: TriangleId, point: DVec3) -> Option<f64> {
        let [a, b, c] = self.triangle_positions(id)?;
        Some((b - a).cross(c - a).normalize_or_zero().dot(point - a))
    }

    /// Returns true if the largest interior angle reaches the sliver threshold.
    pub fn is_sliver(&self, id: TriangleId) -> bool {
        self.triangle_positions(id).is_some_and(|[a, b, c]| {
            max_interior_angle_degrees(a, b, c) >= self.config.sliver_angle_degrees
        })
    }

    /// Mean of all live vertex positions.
    pub fn centroid(&self) -> Option<DVec3> {
        if self.vertex_count == 0 {
            return None;
        }
        let sum: DVec3 = self.vertices().map(|(_, v)| v.position).sum();
        Some(sum / self.vertex_count as f64)
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Adds a point, returning the existing vertex if one lies within tolerance.
    pub fn add(&mut self, point: DVec3) -> VertexId {
        if let Some(existing) = self.index.find(point) {
            return existing;
        }
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex {
            position: point,
            triangles: Vec::new(),
        }));
        self.index.insert(point, id);
        self.vertex_count += 1;
        id
    }

    /// Creates a triangle over three live vertices with zero UVs.
    ///
    /// A new triangle is always created, even when an identical one exists.
    pub fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) -> GeometryResult<TriangleId> {
        self.add_triangle_with_uvs([a, b, c], [DVec2::ZERO; 3])
    }

    /// Creates a triangle with per-corner UVs.
    pub fn add_triangle_with_uvs(
        &mut self,
        vertices: [VertexId; 3],
        uvs: [DVec2; 3],
    ) -> GeometryResult<TriangleId> {
        for v in vertices {
            if self.vertex(v).is_none() {
                return Err(GeometryError::UnknownVertex(v.0));
            }
        }
        let id = TriangleId(self.triangles.len() as u32);
        self.triangles.push(Some(Triangle { vertices, uvs }));
        self.triangle_count += 1;
        self.reset_triangle_links(id);
        Ok(id)
    }

    /// Adds three points (deduplicated) and a triangle over them.
    pub fn add_triangle_points(&mut self, p0: DVec3, p1: DVec3, p2: DVec3) -> GeometryResult<TriangleId> {
        let a = self.add(p0);
        let b = self.add(p1);
        let c = self.add(p2);
        self.add_triangle(a, b, c)
    }

    /// Inserts a quad or triangle face as triangles `A,B,C` / `A,C,D`.
    pub fn add_face(&mut self, face: &Face) -> GeometryResult<Vec<TriangleId>> {
        let ids: Vec<VertexId> = face.points().iter().map(|p| self.add(*p)).collect();
        let uvs = face.uv_points();
        face.triangulate()
            .iter()
            .map(|&[i, j, k]| self.add_triangle_with_uvs([ids[i], ids[j], ids[k]], [uvs[i], uvs[j], uvs[k]]))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Adjacency bracketing
    // -------------------------------------------------------------------------

    /// Deregisters `id` from its vertices' triangle lists.
    ///
    /// Must precede any reassignment of the triangle's vertices; pair with
    /// [`MeshObject::reset_triangle_links`] afterwards.
    pub fn remove_triangle_links(&mut self, id: TriangleId) -> bool {
        let Some(tri) = self.triangle(id).copied() else {
            return false;
        };
        for v in tri.vertices {
            if let Some(vertex) = self.vertices.get_mut(v.index()).and_then(Option::as_mut) {
                vertex.unlink(id);
            }
        }
        true
    }

    /// Registers `id` in its vertices' triangle lists.
    pub fn reset_triangle_links(&mut self, id: TriangleId) -> bool {
        let Some(tri) = self.triangle(id).copied() else {
            return false;
        };
        for v in tri.vertices {
            if let Some(vertex) = self.vertices.get_mut(v.index()).and_then(Option::as_mut) {
                vertex.link(id);
            }
        }
        true
    }

    /// Replaces one corner of a triangle, keeping adjacency exact.
    ///
    /// `slot` outside `[0, 2]` is a hard error.
    pub fn set_triangle_vertex(&mut self, id: TriangleId, slot: usize, vertex: VertexId) -> GeometryResult<()> {
        if slot > 2 {
            return Err(GeometryError::VertexSlotOutOfRange { slot });
        }
        let mut vertices = self
            .triangle(id)
            .ok_or(GeometryError::UnknownTriangle(id.0))?
            .vertices;
        vertices[slot] = vertex;
        self.reassign_triangle(id, vertices)
    }

    /// Replaces all three corners of a triangle in place, keeping its handle.
    ///
    /// UVs follow their vertices; corners new to the triangle get zero UVs.
    pub fn reassign_triangle(&mut self, id: TriangleId, vertices: [VertexId; 3]) -> GeometryResult<()> {
        for v in vertices {
            if self.vertex(v).is_none() {
                return Err(GeometryError::UnknownVertex(v.0));
            }
        }
        let old = *self.triangle(id).ok_or(GeometryError::UnknownTriangle(id.0))?;
        let uvs = vertices.map(|v| old.uv_of(v).unwrap_or(DVec2::ZERO));
        self.remove_triangle_links(id);
        if let Some(slot) = self.triangles.get_mut(id.index()).and_then(Option::as_mut) {
            slot.vertices = vertices;
            slot.uvs = uvs;
        }
        self.reset_triangle_links(id);
        Ok(())
    }

    /// Reverses the winding of triangle `id`.
    pub fn flip_triangle(&mut self, id: TriangleId) -> bool {
        match self.triangles.get_mut(id.index()).and_then(Option::as_mut) {
            Some(tri) => {
                tri.vertices.swap(1, 2);
                tri.uvs.swap(1, 2);
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Removes a triangle. Removing an absent triangle logs and does nothing.
    pub fn remove_triangle(&mut self, id: TriangleId) -> bool {
        if !self.remove_triangle_links(id) {
            warn!(triangle = id.0, "attempted to remove a triangle that is not in the mesh");
            return false;
        }
        self.triangles[id.index()] = None;
        self.triangle_count -= 1;
        true
    }

    /// Removes a vertex and every triangle using it.
    ///
    /// Removing an absent vertex logs and does nothing.
    pub fn remove_vertex(&mut self, id: VertexId) -> bool {
        let Some(vertex) = self.vertex(id).cloned() else {
            warn!(vertex = id.0, "attempted to remove a vertex that is not in the mesh");
            return false;
        };
        for t in vertex.triangles {
            self.remove_triangle(t);
        }
        self.index.remove(vertex.position, id);
        self.vertices[id.index()] = None;
        self.vertex_count -= 1;
        true
    }

    // -------------------------------------------------------------------------
    // Neighbourhoods
    // -------------------------------------------------------------------------

    /// Triangles sharing at least two vertices with `id`.
    pub fn neighbors(&self, id: TriangleId) -> Vec<TriangleId> {
        let Some(tri) = self.triangle(id) else {
            return Vec::new();
        };
        let mut counts: HashMap<TriangleId, usize> = HashMap::new();
        for v in tri.vertices {
            if let Some(vertex) = self.vertex(v) {
                for &t in &vertex.triangles {
                    if t != id {
                        *counts.entry(t).or_default() += 1;
                    }
                }
            }
        }
        let mut result: Vec<TriangleId> = counts
            .into_iter()
            .filter(|&(_, n)| n >= 2)
            .map(|(t, _)| t)
            .collect();
        result.sort();
        result
    }

    /// Vertices connected to `id` by a triangle edge.
    pub fn vertex_neighbors(&self, id: VertexId) -> Vec<VertexId> {
        let Some(vertex) = self.vertex(id) else {
            return Vec::new();
        };
        let mut result: Vec<VertexId> = vertex
            .triangles
            .iter()
            .filter_map(|&t| self.triangle(t))
            .flat_map(|t| t.vertices)
            .filter(|&v| v != id)
            .collect();
        result.sort();
        result.dedup();
        result
    }

    // -------------------------------------------------------------------------
    // Structural edits
    // -------------------------------------------------------------------------

    /// Replaces triangle `id` with three triangles meeting at `vertex`.
    ///
    /// The outer boundary and winding are preserved. The new vertex's UV is
    /// interpolated from the triangle's corners.
    pub fn split_triangle(&mut self, id: TriangleId, vertex: VertexId) -> GeometryResult<[TriangleId; 3]> {
        let tri = *self.triangle(id).ok_or(GeometryError::UnknownTriangle(id.0))?;
        let point = self.position(vertex).ok_or(GeometryError::UnknownVertex(vertex.0))?;
        let [pa, pb, pc] = self
            .triangle_positions(id)
            .ok_or(GeometryError::UnknownTriangle(id.0))?;
        let uv = interpolate_uv([pa, pb, pc], tri.uvs, point);

        let [a, b, c] = tri.vertices;
        let [ua, ub, uc] = tri.uvs;
        self.remove_triangle(id);
        Ok([
            self.add_triangle_with_uvs([a, b, vertex], [ua, ub, uv])?,
            self.add_triangle_with_uvs([b, c, vertex], [ub, uc, uv])?,
            self.add_triangle_with_uvs([c, a, vertex], [uc, ua, uv])?,
        ])
    }

    /// Adds three side triangles joining each edge of `id` to `apex`.
    ///
    /// The base triangle is kept. It closes the pyramid when it faces away
    /// from the apex.
    pub fn fill_pyramid(&mut self, id: TriangleId, apex: VertexId) -> GeometryResult<[TriangleId; 3]> {
        let tri = *self.triangle(id).ok_or(GeometryError::UnknownTriangle(id.0))?;
        let [(a0, b0), (a1, b1), (a2, b2)] = tri.edges();
        Ok([
            self.add_triangle(b0, a0, apex)?,
            self.add_triangle(b1, a1, apex)?,
            self.add_triangle(b2, a2, apex)?,
        ])
    }

    /// Swaps the diagonal shared by two consistently wound triangles.
    ///
    /// For `first = (a, b, c)` and `second = (b, a, d)` the pair becomes
    /// `(c, a, d)` and `(c, d, b)`; both handles are kept. Returns `Ok(false)`
    /// when the triangles do not share a consistently oriented edge.
    pub fn swap_edge(&mut self, first: TriangleId, second: TriangleId) -> GeometryResult<bool> {
        let t1 = *self.triangle(first).ok_or(GeometryError::UnknownTriangle(first.0))?;
        let t2 = *self.triangle(second).ok_or(GeometryError::UnknownTriangle(second.0))?;
        let Some([a, b, c, d]) = diagonal_quad(&t1, &t2) else {
            return Ok(false);
        };
        let uv = |v: VertexId| t1.uv_of(v).or_else(|| t2.uv_of(v)).unwrap_or(DVec2::ZERO);

        self.remove_triangle_links(first);
        self.remove_triangle_links(second);
        if let Some(tri) = self.triangles.get_mut(first.index()).and_then(Option::as_mut) {
            tri.vertices = [c, a, d];
            tri.uvs = [uv(c), uv(a), uv(d)];
        }
        if let Some(tri) = self.triangles.get_mut(second.index()).and_then(Option::as_mut) {
            tri.vertices = [c, d, b];
            tri.uvs = [uv(c), uv(d), uv(b)];
        }
        self.reset_triangle_links(first);
        self.reset_triangle_links(second);
        Ok(true)
    }

    /// Splits every triangle larger than `max_area` at its centroid, repeating
    /// until none remain or the pass limit is hit. Returns the split count.
    pub fn subdivide_large_triangles(&mut self, max_area: f64) -> usize {
        let mut splits = 0;
        for _ in 0..MAX_SUBDIVISION_PASSES {
            let oversized: Vec<TriangleId> = self
                .triangle_ids()
                .into_iter()
                .filter(|&t| self.triangle_area(t).is_some_and(|a| a > max_area))
                .collect();
            if oversized.is_empty() {
                break;
            }
            for t in oversized {
                let Some([a, b, c]) = self.triangle_positions(t) else {
                    continue;
                };
                let center = self.add((a + b + c) / 3.0);
                if self.split_triangle(t, center).is_ok() {
                    splits += 1;
                }
            }
        }
        splits
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Pairs of distinct triangles over the same three vertices.
    pub fn duplicate_triangles(&self) -> Vec<(TriangleId, TriangleId)> {
        let mut seen: HashMap<[VertexId; 3], TriangleId> = HashMap::new();
        let mut duplicates = Vec::new();
        for (id, tri) in self.triangles() {
            let mut key = tri.vertices;
            key.sort();
            match seen.get(&key) {
                Some(&first) => duplicates.push((first, id)),
                None => {
                    seen.insert(key, id);
                }
            }
        }
        duplicates
    }

    /// All undirected edges with their owning triangles.
    pub fn edges(&self) -> Vec<TEdge> {
        let mut lookup: HashMap<(VertexId, VertexId), usize> = HashMap::new();
        let mut edges: Vec<TEdge> = Vec::new();
        for (id, tri) in self.triangles() {
            for (a, b) in tri.edges() {
                let key = if a < b { (a, b) } else { (b, a) };
                let slot = *lookup.entry(key).or_insert_with(|| {
                    edges.push(TEdge::new(a, b));
                    edges.len() - 1
                });
                edges[slot].add_owner(id);
            }
        }
        edges
    }

    /// Edges owned by exactly one triangle.
    pub fn open_edges(&self) -> Vec<TEdge> {
        self.edges().into_iter().filter(TEdge::is_open).collect()
    }

    /// True when every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        self.triangle_count > 0 && self.edges().iter().all(TEdge::is_manifold)
    }

    /// Canonical loops formed by the open edges.
    pub fn boundary_loops(&self) -> Vec<EdgeLoop> {
        let mut next: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        for edge in self.open_edges() {
            let Some(owner) = edge.owners().first().and_then(|&t| self.triangle(t)) else {
                continue;
            };
            // Follow the owner's winding so loops stay consistently directed.
            let (from, to) = owner
                .edges()
                .into_iter()
                .find(|&(x, y)| edge.matches(x, y))
                .unwrap_or((edge.a(), edge.b()));
            next.entry(from).or_default().push(to);
        }

        let mut starts: Vec<VertexId> = next.keys().copied().collect();
        starts.sort();
        let mut loops = Vec::new();
        for start in starts {
            while next.get(&start).is_some_and(|n| !n.is_empty()) {
                let mut ring = vec![start];
                let mut current = start;
                while let Some(to) = next.get_mut(&current).and_then(Vec::pop) {
                    if to == start {
                        break;
                    }
                    ring.push(to);
                    current = to;
                }
                if let Some(edge_loop) = EdgeLoop::new(self, &ring) {
                    loops.push(edge_loop);
                }
            }
        }
        loops
    }
}

/// Returns `[a, b, c, d]` where `first = (a, b, c)` and `second` holds the
/// edge `b -> a` with far corner `d`.
fn diagonal_quad(first: &Triangle, second: &Triangle) -> Option<[VertexId; 4]> {
    let (a, b) = first
        .edges()
        .into_iter()
        .find(|&(x, y)| second.edges().contains(&(y, x)))?;
    let c = first.opposite(a, b)?;
    let d = second.opposite(a, b)?;
    Some([a, b, c, d])
}

/// Barycentric UV interpolation of `point` projected onto a triangle.
fn interpolate_uv(corners: [DVec3; 3], uvs: [DVec2; 3], point: DVec3) -> DVec2 {
    let [a, b, c] = corners;
    let v0 = b - a;
    let v1 = c - a;
    let v2 = point - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= f64::EPSILON {
        return (uvs[0] + uvs[1] + uvs[2]) / 3.0;
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;
    uvs[0] * u + uvs[1] * v + uvs[2] * w
}
