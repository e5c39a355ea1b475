//! Flattening a mesh into render buffers.

use super::{MeshObject, VertexId};
use crate::output::{MeshBuffers, ShadingMode};
use crate::tolerance::angle_between_degrees;
use glam::DVec3;

impl MeshObject {
    /// Flattens the mesh to one buffer vertex per triangle corner.
    ///
    /// `Smooth` averages the normals of every triangle incident to a corner's
    /// vertex; `Auto` only averages those within the auto-smooth angle of the
    /// corner's own triangle.
    pub fn to_buffers(&self, mode: ShadingMode) -> MeshBuffers {
        let mut buffers = MeshBuffers::new();
        let mut normals = Vec::with_capacity(self.triangle_count * 3);

        for (id, tri) in self.triangles() {
            let Some(corners) = self.triangle_positions(id) else {
                continue;
            };
            let face_normal = self.triangle_normal(id).unwrap_or(DVec3::ZERO);
            buffers.push_triangle(corners, tri.uvs());
            for v in tri.vertices() {
                let normal = match mode {
                    ShadingMode::Flat => face_normal,
                    ShadingMode::Smooth => self.blended_normal(v, face_normal, None),
                    ShadingMode::Auto => {
                        self.blended_normal(v, face_normal, Some(self.config.auto_smooth_angle_degrees))
                    }
                };
                normals.push(normal);
            }
        }

        buffers.normals = Some(normals);
        buffers
    }

    fn blended_normal(&self, vertex: VertexId, own: DVec3, max_angle: Option<f64>) -> DVec3 {
        let Some(v) = self.vertex(vertex) else {
            return own;
        };
        let sum: DVec3 = v
            .triangles()
            .iter()
            .filter_map(|&t| self.triangle_normal(t))
            .filter(|n| max_angle.map_or(true, |limit| angle_between_degrees(*n, own) < limit))
            .sum();
        let blended = sum.normalize_or_zero();
        if blended == DVec3::ZERO {
            own
        } else {
            blended
        }
    }
}
