use super::*;
use approx::assert_relative_eq;

fn unit_quad(z: f64) -> Face {
    Face::quad(
        DVec3::new(0.0, 0.0, z),
        DVec3::new(0.0, 1.0, z),
        DVec3::new(1.0, 1.0, z),
        DVec3::new(1.0, 0.0, z),
    )
}

/// Two quads meeting at a right angle along the x = 1 edge.
fn folded() -> Vec<Face> {
    vec![
        unit_quad(0.0),
        Face::quad(
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
        ),
    ]
}

#[test]
fn test_registry_interns_names() {
    let mut registry = MaterialRegistry::new();
    let wall = registry.register("wall").unwrap();
    let floor = registry.register("floor").unwrap();

    assert_ne!(wall, floor);
    assert_eq!(registry.register("wall").unwrap(), wall);
    assert_eq!(registry.get("floor"), Some(floor));
    assert_eq!(registry.name(wall), Some("wall"));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.register(""), Err(GeometryError::EmptyMaterialKey));
}

#[test]
fn test_push_face_shares_quad_vertices() {
    let mut buffers = MeshBuffers::new();
    buffers.push_face(&unit_quad(0.0));

    assert_eq!(buffers.vertex_count(), 4);
    assert_eq!(buffers.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(buffers.uvs[2], DVec2::new(1.0, 1.0));
}

#[test]
fn test_merge_offsets_indices() {
    let mut a = MeshBuffers::new();
    a.push_face(&unit_quad(0.0));
    let mut b = MeshBuffers::new();
    b.push_triangle([DVec3::ZERO, DVec3::X, DVec3::Y], [DVec2::ZERO; 3]);
    a.merge(&b);

    assert_eq!(a.triangle_count(), 3);
    assert_eq!(&a.indices[6..], &[4, 5, 6]);
    assert!(a.normals.is_none());
}

#[test]
fn test_f32_exports() {
    let mut buffers = MeshBuffers::new();
    buffers.push_triangle([DVec3::ZERO, DVec3::X, DVec3::Y], [DVec2::ZERO, DVec2::X, DVec2::Y]);
    compute_normals(&mut buffers, ShadingMode::Flat, &KernelConfig::default());

    assert_eq!(buffers.vertices_f32(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assert_eq!(buffers.uvs_f32(), vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    assert_eq!(buffers.normals_f32()[2], 1.0);
    assert!(MeshBuffers::new().normals_f32().is_empty());
}

#[test]
fn test_flat_normals_follow_faces() {
    let groups = face_buffers(&folded(), ShadingMode::Flat, &KernelConfig::default());
    let buffers = &groups[&MaterialId::default()];
    let normals = buffers.normals.as_ref().unwrap();

    assert_eq!(normals.len(), 8);
    assert!(normals[..4].iter().all(|n| n.distance(-DVec3::Z) < 1e-12));
    assert!(normals[4..].iter().all(|n| n.distance(DVec3::X) < 1e-12));
}

#[test]
fn test_smooth_normals_blend_across_positions() {
    let groups = face_buffers(&folded(), ShadingMode::Smooth, &KernelConfig::default());
    let buffers = &groups[&MaterialId::default()];
    let normals = buffers.normals.as_ref().unwrap();

    // Along the shared edge each incident triangle counts once: (1, 1, 0)
    // touches both floor triangles but one wall triangle, (1, 0, 0) the reverse.
    assert!(normals[2].distance((DVec3::X - 2.0 * DVec3::Z).normalize()) < 1e-12);
    assert!(normals[5].distance(normals[2]) < 1e-12);
    assert!(normals[4].distance((2.0 * DVec3::X - DVec3::Z).normalize()) < 1e-12);
    assert!(normals[0].distance(-DVec3::Z) < 1e-12);
}

#[test]
fn test_smooth_normal_is_plain_average_at_cube_corner() {
    let mut buffers = MeshBuffers::new();
    let uv = [DVec2::ZERO; 3];
    // Floor split in two, then one triangle each on the x = 0 and y = 0 walls.
    buffers.push_triangle([DVec3::ZERO, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)], uv);
    buffers.push_triangle([DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0), DVec3::X], uv);
    buffers.push_triangle([DVec3::ZERO, DVec3::Z, DVec3::Y], uv);
    buffers.push_triangle([DVec3::ZERO, DVec3::X, DVec3::Z], uv);
    compute_normals(&mut buffers, ShadingMode::Smooth, &KernelConfig::default());

    let normals = buffers.normals.unwrap();
    let expected = DVec3::new(-1.0, -1.0, -2.0).normalize();
    for i in [0, 3, 6, 9] {
        assert!(normals[i].distance(expected) < 1e-12);
    }
}

#[test]
fn test_auto_normals_keep_right_angles_sharp() {
    let groups = face_buffers(&folded(), ShadingMode::Auto, &KernelConfig::default());
    let normals = groups[&MaterialId::default()].normals.clone().unwrap();

    assert!(normals[2].distance(-DVec3::Z) < 1e-12);
    assert!(normals[4].distance(DVec3::X) < 1e-12);
}

#[test]
fn test_auto_normals_blend_shallow_bends() {
    let bent = Face::quad(
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(2.0, 1.0, 0.2),
        DVec3::new(2.0, 0.0, 0.2),
    );
    let groups = face_buffers(&[unit_quad(0.0), bent], ShadingMode::Auto, &KernelConfig::default());
    let normals = groups[&MaterialId::default()].normals.clone().unwrap();

    // Vertices 2 and 5 share the position (1, 1, 0).
    assert_relative_eq!(normals[2].dot(normals[5]), 1.0, epsilon = 1e-12);
    assert!(normals[2].distance(-DVec3::Z) > 1e-3);
}

#[test]
fn test_faces_grouped_by_material() {
    let mut registry = MaterialRegistry::new();
    let glass = registry.register("glass").unwrap();
    let brick = registry.register("brick").unwrap();
    let faces = vec![
        unit_quad(0.0).with_material(brick),
        unit_quad(1.0).with_material(glass),
        unit_quad(2.0).with_material(brick),
    ];
    let groups = face_buffers(&faces, ShadingMode::Flat, &KernelConfig::default());

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&brick].triangle_count(), 4);
    assert_eq!(groups[&glass].triangle_count(), 2);
}

#[test]
fn test_buffers_serialize() {
    let mut buffers = MeshBuffers::new();
    buffers.push_face(&unit_quad(0.0));
    let value = serde_json::to_value(&buffers).unwrap();
    assert_eq!(value["indices"].as_array().unwrap().len(), 6);
}
