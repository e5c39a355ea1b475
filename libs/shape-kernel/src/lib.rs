//! # Shape Kernel
//!
//! Procedural geometry for architectural surfaces and tubes.
//! Turns point clouds, wall rectangles, openings and path way-points into
//! watertight triangle meshes with winding, normals and UVs.
//!
//! ## Architecture
//!
//! ```text
//! points ──────────► HullBuilder ──► MeshObject ──┐
//! rectangles ──────► Face slicing / holes ────────┼──► MeshBuffers per material
//! way-points ──────► BezierPath ──► extrude ──────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use shape_kernel::{extrude_path, BezierPath, CrossSection, ExtrudeParams};
//! use glam::DVec3;
//!
//! let path = BezierPath::new(vec![DVec3::ZERO, DVec3::new(0.0, 0.0, 5.0)]).unwrap();
//! let tunnel = extrude_path(&CrossSection::tunnel(4.0, 4.0), &path, 1.0, &ExtrudeParams::default()).unwrap();
//! assert_eq!(tunnel.triangle_count(), 120);
//! ```

pub mod config;
pub mod error;
pub mod extrude;
pub mod face;
pub mod hull;
pub mod mesh;
pub mod output;
pub mod path;
pub mod tolerance;

pub use config::KernelConfig;
pub use error::{GeometryError, GeometryResult};
pub use extrude::{extrude, extrude_path, CrossSection, ExtrudeParams, Extrusion};
pub use face::{
    bridge_edge_loops, cut_front, indent_face, make_hole, slice_face, Face, FaceTag, HoleRay, LocalRect,
    SliceAxis,
};
pub use hull::{HullBuilder, HullInsert};
pub use mesh::{EdgeLoop, MeshObject, TEdge, Triangle, TriangleId, Vertex, VertexId};
pub use output::{compute_normals, face_buffers, MaterialId, MaterialRegistry, MeshBuffers, ShadingMode};
pub use path::{decimate, BezierPath, Tangent};
