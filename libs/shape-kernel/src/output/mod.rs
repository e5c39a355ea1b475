//! # Output Buffers
//!
//! Render-ready vertex/UV/index/normal buffers and material grouping.
//!
//! Faces are grouped by [`MaterialId`] into one [`MeshBuffers`] per group.
//! Every quad becomes triangles `A,B,C` and `A,C,D`.

#[cfg(test)]
mod tests;

use crate::config::KernelConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::face::Face;
use crate::tolerance::{angle_between_degrees, SpatialIndex};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// SHADING
// =============================================================================

/// How per-vertex normals are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Each corner takes its triangle's normal.
    #[default]
    Flat,
    /// Normals averaged over every triangle meeting at a position.
    Smooth,
    /// Averaged only across edges sharper than the auto-smooth angle.
    Auto,
}

// =============================================================================
// MATERIALS
// =============================================================================

/// Identifier of a material group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Interns material names into stable [`MaterialId`]s.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    names: Vec<String>,
    ids: HashMap<String, MaterialId>,
}

impl MaterialRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, returning the existing id for a known name.
    pub fn register(&mut self, name: &str) -> GeometryResult<MaterialId> {
        if name.is_empty() {
            return Err(GeometryError::EmptyMaterialKey);
        }
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = MaterialId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Looks up a registered name.
    pub fn get(&self, name: &str) -> Option<MaterialId> {
        self.ids.get(name).copied()
    }

    /// Name registered for `id`.
    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// MESH BUFFERS
// =============================================================================

/// Flat triangle buffers in double precision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Texture coordinates, one per vertex.
    pub uvs: Vec<DVec2>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
    /// Per-vertex normals once computed.
    pub normals: Option<Vec<DVec3>>,
}

impl MeshBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if no triangles are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a triangle with its own three vertices.
    pub fn push_triangle(&mut self, corners: [DVec3; 3], uvs: [DVec2; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(corners);
        self.uvs.extend(uvs);
        self.indices.extend([base, base + 1, base + 2]);
    }

    /// Appends a face: four shared vertices for quads, three for triangles.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(face.points());
        self.uvs.extend_from_slice(face.uv_points());
        for [i, j, k] in face.triangulate() {
            self.indices.extend([base + i as u32, base + j as u32, base + k as u32]);
        }
    }

    /// Appends `other`, offsetting its indices.
    pub fn merge(&mut self, other: &MeshBuffers) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.normals = match (self.normals.take(), &other.normals) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            _ => None,
        };
    }

    /// Returns vertices as f32 for GPU upload.
    pub fn vertices_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Returns UVs as f32 for GPU upload.
    pub fn uvs_f32(&self) -> Vec<f32> {
        self.uvs.iter().flat_map(|uv| [uv.x as f32, uv.y as f32]).collect()
    }

    /// Returns normals as f32, empty when not computed.
    pub fn normals_f32(&self) -> Vec<f32> {
        self.normals
            .iter()
            .flatten()
            .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
            .collect()
    }

    /// Triangle normals in index order; zero for degenerate triangles.
    fn triangle_normals(&self) -> Vec<DVec3> {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let a = self.vertices[tri[0] as usize];
                let b = self.vertices[tri[1] as usize];
                let c = self.vertices[tri[2] as usize];
                (b - a).cross(c - a).normalize_or_zero()
            })
            .collect()
    }
}

// =============================================================================
// NORMALS
// =============================================================================

/// Computes per-vertex normals in place.
///
/// Vertices sharing a position (within tolerance) are smoothed together even
/// when the buffers store them separately. Each triangle touching a position
/// contributes its unit normal once.
pub fn compute_normals(buffers: &mut MeshBuffers, mode: ShadingMode, config: &KernelConfig) {
    let tri_normals = buffers.triangle_normals();

    let mut first_triangle: Vec<Option<usize>> = vec![None; buffers.vertices.len()];
    for (t, tri) in buffers.indices.chunks_exact(3).enumerate() {
        for &i in tri {
            first_triangle[i as usize].get_or_insert(t);
        }
    }
    let own: Vec<DVec3> = first_triangle
        .iter()
        .map(|t| t.map_or(DVec3::ZERO, |t| tri_normals[t]))
        .collect();

    if mode == ShadingMode::Flat {
        buffers.normals = Some(own);
        return;
    }

    let mut index: SpatialIndex<usize> = SpatialIndex::new(config.tolerance);
    let mut group_of = Vec::with_capacity(buffers.vertices.len());
    let mut group_count = 0;
    for p in &buffers.vertices {
        let group = match index.find(*p) {
            Some(g) => g,
            None => {
                index.insert(*p, group_count);
                group_count += 1;
                group_count - 1
            }
        };
        group_of.push(group);
    }

    // Every triangle touching each position.
    let mut group_members: Vec<Vec<usize>> = vec![Vec::new(); group_count];
    for (t, tri) in buffers.indices.chunks_exact(3).enumerate() {
        for &i in tri {
            let members = &mut group_members[group_of[i as usize]];
            if !members.contains(&t) {
                members.push(t);
            }
        }
    }

    let limit = match mode {
        ShadingMode::Auto => Some(config.auto_smooth_angle_degrees),
        _ => None,
    };
    let normals = (0..buffers.vertices.len())
        .map(|i| {
            let mine = own[i];
            let sum: DVec3 = group_members[group_of[i]]
                .iter()
                .map(|&t| tri_normals[t])
                .filter(|n| limit.map_or(true, |l| angle_between_degrees(*n, mine) < l))
                .sum();
            let blended = sum.normalize_or_zero();
            if blended == DVec3::ZERO {
                mine
            } else {
                blended
            }
        })
        .collect();
    buffers.normals = Some(normals);
}

/// Groups faces by material into buffers with computed normals.
pub fn face_buffers(faces: &[Face], mode: ShadingMode, config: &KernelConfig) -> BTreeMap<MaterialId, MeshBuffers> {
    let mut groups: BTreeMap<MaterialId, MeshBuffers> = BTreeMap::new();
    for face in faces {
        groups.entry(face.material()).or_default().push_face(face);
    }
    for buffers in groups.values_mut() {
        compute_normals(buffers, mode, config);
    }
    groups
}
