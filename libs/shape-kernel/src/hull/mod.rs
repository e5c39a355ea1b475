//! # Incremental Convex Hull
//!
//! Grows a closed convex triangle mesh one point at a time.
//!
//! ## Algorithm
//!
//! 1. Buffer points until three non-collinear ones seed a triangle
//! 2. The first point off the seed's plane raises a tetrahedron; points
//!    coplanar with the seed wait until then
//! 3. Every later point removes the triangles it sees (strictly in front of
//!    their plane), walks the horizon into a ring, and fans the ring to the
//!    new point
//! 4. New sliver triangles are queued; one edge swap is attempted per
//!    insertion against a near-coplanar neighbour
//!
//! Horizon failures restore the removed triangles and report
//! [`HullInsert::Lost`] instead of leaving the hull open.


use crate::config::KernelConfig;
use crate::mesh::{MeshObject, TriangleId, VertexId};
use crate::tolerance::{angle_between_degrees, max_interior_angle_degrees, points_equal};
use glam::{DVec2, DVec3};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of [`HullBuilder::add_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullInsert {
    /// Buffered until the hull has enough points to grow.
    Pending,
    /// Formed the seed triangle.
    Seeded,
    /// Became a hull vertex.
    Extended,
    /// Inside the current hull; dropped.
    Interior,
    /// Coincides with a known point; dropped.
    Duplicate,
    /// The horizon could not be walked; the hull was left unchanged.
    Lost,
}

/// Builds a convex hull mesh incrementally.
#[derive(Debug, Clone)]
pub struct HullBuilder {
    mesh: MeshObject,
    pending: Vec<DVec3>,
    deferred: Vec<DVec3>,
    slivers: Vec<TriangleId>,
    centroid: DVec3,
}

impl Default for HullBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HullBuilder {
    /// Creates an empty builder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    /// Creates an empty builder.
    pub fn with_config(config: KernelConfig) -> Self {
        Self {
            mesh: MeshObject::with_config(config),
            pending: Vec::new(),
            deferred: Vec::new(),
            slivers: Vec::new(),
            centroid: DVec3::ZERO,
        }
    }

    /// Builds a hull from `points` in order with the default configuration.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        Self::from_points_with_config(points, KernelConfig::default())
    }

    /// Builds a hull from `points` in order.
    pub fn from_points_with_config(points: impl IntoIterator<Item = DVec3>, config: KernelConfig) -> Self {
        let mut builder = Self::with_config(config);
        for p in points {
            builder.add_point(p);
        }
        builder
    }

    /// The hull mesh built so far.
    pub fn mesh(&self) -> &MeshObject {
        &self.mesh
    }

    /// Consumes the builder, returning its mesh.
    pub fn into_mesh(self) -> MeshObject {
        self.mesh
    }

    /// Mean of the hull's vertices.
    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    /// Sliver triangles queued for repair.
    pub fn pending_slivers(&self) -> &[TriangleId] {
        &self.slivers
    }

    /// Adds one point to the hull.
    pub fn add_point(&mut self, point: DVec3) -> HullInsert {
        let eps = self.mesh.config().tolerance;
        let known = self.mesh.find(point).is_some()
            || self
                .pending
                .iter()
                .chain(&self.deferred)
                .any(|p| points_equal(*p, point, eps));
        if known {
            debug!(?point, "hull point duplicates an existing point");
            return HullInsert::Duplicate;
        }

        let outcome = match self.mesh.triangle_count() {
            0 => self.seed(point),
            1 => self.raise(point),
            _ => self.extend(point),
        };
        self.repair_one_sliver();
        outcome
    }

    // -------------------------------------------------------------------------
    // Growth
    // -------------------------------------------------------------------------

    fn seed(&mut self, point: DVec3) -> HullInsert {
        self.pending.push(point);
        if self.pending.len() < 3 {
            return HullInsert::Pending;
        }
        let eps = self.mesh.config().tolerance;
        let (a, b) = (self.pending[0], self.pending[1]);
        let Some(k) = (2..self.pending.len()).find(|&k| (b - a).cross(self.pending[k] - a).length() > eps) else {
            return HullInsert::Pending;
        };

        let c = self.pending.remove(k);
        let va = self.mesh.add(a);
        let vb = self.mesh.add(b);
        let vc = self.mesh.add(c);
        if let Err(err) = self.mesh.add_triangle(va, vb, vc) {
            warn!(%err, "failed to create hull seed");
            return HullInsert::Lost;
        }
        // Everything else buffered so far is collinear with the seed edge.
        self.deferred.extend(self.pending.drain(2..));
        self.pending.clear();
        self.refresh_centroid();
        HullInsert::Seeded
    }

    fn raise(&mut self, apex: DVec3) -> HullInsert {
        let Some(seed) = self.mesh.triangle_ids().first().copied() else {
            return HullInsert::Lost;
        };
        let eps = self.mesh.config().tolerance;
        let distance = self.mesh.signed_distance(seed, apex).unwrap_or(0.0);
        if distance.abs() <= eps {
            self.deferred.push(apex);
            return HullInsert::Pending;
        }
        if distance > 0.0 {
            self.mesh.flip_triangle(seed);
        }

        let top = self.mesh.add(apex);
        match self.mesh.fill_pyramid(seed, top) {
            Ok(sides) => self.queue_slivers(&sides),
            Err(err) => {
                warn!(%err, "failed to raise hull pyramid");
                return HullInsert::Lost;
            }
        }
        self.refresh_centroid();

        for p in std::mem::take(&mut self.deferred) {
            self.extend(p);
        }
        HullInsert::Extended
    }

    fn extend(&mut self, point: DVec3) -> HullInsert {
        let visible: Vec<TriangleId> = self
            .mesh
            .triangles()
            .filter(|&(id, _)| self.mesh.signed_distance(id, point).is_some_and(|d| d > 0.0))
            .map(|(id, _)| id)
            .collect();
        if visible.is_empty() {
            debug!(?point, "hull point is interior");
            return HullInsert::Interior;
        }

        let removed: Vec<([VertexId; 3], [DVec2; 3])> = visible
            .iter()
            .filter_map(|&t| self.mesh.triangle(t).map(|tri| (tri.vertices(), tri.uvs())))
            .collect();
        for &t in &visible {
            self.mesh.remove_triangle(t);
        }

        let Some(ring) = self.horizon_ring(&removed, point) else {
            for (vertices, uvs) in removed {
                if let Err(err) = self.mesh.add_triangle_with_uvs(vertices, uvs) {
                    warn!(%err, "failed to restore hull triangle");
                }
            }
            warn!(?point, "could not walk hull horizon, point dropped");
            return HullInsert::Lost;
        };

        let orphans: Vec<VertexId> = removed
            .iter()
            .flat_map(|(vertices, _)| *vertices)
            .filter(|&v| self.mesh.vertex(v).is_some_and(|vx| vx.triangles().is_empty()))
            .collect();
        for v in orphans {
            if self.mesh.vertex(v).is_some() {
                self.mesh.remove_vertex(v);
            }
        }

        let apex = self.mesh.add(point);
        let mut fan = Vec::with_capacity(ring.len());
        for i in 0..ring.len() {
            match self.mesh.add_triangle(ring[i], ring[(i + 1) % ring.len()], apex) {
                Ok(t) => fan.push(t),
                Err(err) => warn!(%err, "failed to add hull fan triangle"),
            }
        }
        self.queue_slivers(&fan);
        self.refresh_centroid();
        HullInsert::Extended
    }

    /// Orders the horizon left by `removed` into a ring wound so that the
    /// fan `(ring[i], ring[i+1], point)` faces away from the centroid.
    fn horizon_ring(&self, removed: &[([VertexId; 3], [DVec2; 3])], point: DVec3) -> Option<Vec<VertexId>> {
        let mut next: HashMap<VertexId, VertexId> = HashMap::new();
        for (vertices, _) in removed {
            let [a, b, c] = *vertices;
            for (from, to) in [(a, b), (b, c), (c, a)] {
                if self.has_directed_edge(to, from) && next.insert(from, to).is_some() {
                    debug!("hull horizon is not a simple loop");
                    return None;
                }
            }
        }
        let Some(&start) = next.keys().min() else {
            debug!("hull horizon has no boundary vertices");
            return None;
        };

        let mut ring = vec![start];
        let mut current = start;
        loop {
            let to = *next.get(&current)?;
            if to == start {
                break;
            }
            if ring.len() >= next.len() {
                return None;
            }
            ring.push(to);
            current = to;
        }
        if ring.len() != next.len() || ring.len() < 3 {
            return None;
        }

        let p0 = self.mesh.position(ring[0])?;
        let p1 = self.mesh.position(ring[1])?;
        let normal = (p1 - p0).cross(point - p0).normalize_or_zero();
        if normal.dot(self.centroid - p0) > self.mesh.config().tolerance {
            ring.reverse();
        }
        Some(ring)
    }

    /// True if a live triangle holds the directed edge `from -> to`.
    fn has_directed_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.mesh.vertex(from).is_some_and(|v| {
            v.triangles()
                .iter()
                .filter_map(|&t| self.mesh.triangle(t))
                .any(|tri| tri.edges().contains(&(from, to)))
        })
    }

    fn refresh_centroid(&mut self) {
        self.centroid = self.mesh.centroid().unwrap_or(DVec3::ZERO);
    }

    // -------------------------------------------------------------------------
    // Sliver repair
    // -------------------------------------------------------------------------

    fn queue_slivers(&mut self, triangles: &[TriangleId]) {
        for &t in triangles {
            if self.mesh.is_sliver(t) {
                self.slivers.push(t);
            }
        }
    }

    /// Attempts one edge swap on the most recently queued live sliver.
    fn repair_one_sliver(&mut self) {
        while let Some(sliver) = self.slivers.pop() {
            if !self.mesh.is_sliver(sliver) {
                continue;
            }
            match self.best_swap_partner(sliver) {
                Some(partner) => {
                    if let Err(err) = self.mesh.swap_edge(sliver, partner) {
                        warn!(%err, "hull sliver swap failed");
                    }
                }
                None => debug!(triangle = sliver.0, "no valid swap for hull sliver"),
            }
            return;
        }
    }

    /// The near-coplanar neighbour whose diagonal swap lowers the largest
    /// angle while keeping the hull convex.
    fn best_swap_partner(&self, sliver: TriangleId) -> Option<TriangleId> {
        let config = *self.mesh.config();
        let sliver_normal = self.mesh.triangle_normal(sliver)?;
        let sliver_tri = *self.mesh.triangle(sliver)?;

        let mut best: Option<(f64, TriangleId)> = None;
        for partner in self.mesh.neighbors(sliver) {
            let Some(partner_tri) = self.mesh.triangle(partner) else {
                continue;
            };
            if !sliver_tri.shares_edge(partner_tri) {
                continue;
            }
            let Some(partner_normal) = self.mesh.triangle_normal(partner) else {
                continue;
            };
            let angle = angle_between_degrees(sliver_normal, partner_normal);
            if angle > config.sliver_normal_tolerance_degrees {
                continue;
            }
            if !self.swap_improves(sliver, partner) {
                continue;
            }
            if best.map_or(true, |(a, _)| angle < a) {
                best = Some((angle, partner));
            }
        }
        best.map(|(_, t)| t)
    }

    fn swap_improves(&self, first: TriangleId, second: TriangleId) -> bool {
        let (Some(t1), Some(t2)) = (self.mesh.triangle(first), self.mesh.triangle(second)) else {
            return false;
        };
        let Some((a, b)) = t1
            .edges()
            .into_iter()
            .find(|&(x, y)| t2.edges().contains(&(y, x)))
        else {
            return false;
        };
        let (Some(c), Some(d)) = (t1.opposite(a, b), t2.opposite(a, b)) else {
            return false;
        };
        // The new diagonal must not already be an edge.
        if self.mesh.vertex_neighbors(c).contains(&d) {
            return false;
        }
        let pos = |v: VertexId| self.mesh.position(v);
        let (Some(pa), Some(pb), Some(pc), Some(pd)) = (pos(a), pos(b), pos(c), pos(d)) else {
            return false;
        };

        let before = max_interior_angle_degrees(pa, pb, pc).max(max_interior_angle_degrees(pb, pa, pd));
        let after = max_interior_angle_degrees(pc, pa, pd).max(max_interior_angle_degrees(pc, pd, pb));
        if after >= before {
            return false;
        }

        let eps = self.mesh.config().tolerance;
        let n1 = (pa - pc).cross(pd - pc).normalize_or_zero();
        let n2 = (pd - pc).cross(pb - pc).normalize_or_zero();
        if n1 == DVec3::ZERO || n2 == DVec3::ZERO {
            return false;
        }
        n1.dot(pb - pc) <= eps && n2.dot(pa - pc) <= eps
    }
}
