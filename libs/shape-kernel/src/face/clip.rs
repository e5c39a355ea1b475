//! Plane classification and face splitting.

use super::Face;
use crate::tolerance::points_equal;
use glam::{DVec2, DVec3};

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Position of a point or face relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// On the positive side.
    Front,
    /// On the negative side.
    Back,
    /// Within tolerance of the plane.
    Coplanar,
    /// Corners on both sides.
    Spanning,
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane `normal . p = w` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Creates a plane from a normal and offset.
    pub fn new(normal: DVec3, w: f64) -> Self {
        Self { normal, w }
    }

    /// Plane through `point` facing along `normal`.
    pub fn from_point_normal(point: DVec3, normal: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            w: normal.dot(point),
        }
    }

    /// Unit normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Offset from the origin along the normal.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Reverses the plane's facing.
    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Positive in front, negative behind.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classifies a point with tolerance `epsilon`.
    pub fn classify_point(&self, point: DVec3, epsilon: f64) -> Classification {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            Classification::Front
        } else if dist < -epsilon {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Classifies every corner of `face` and combines the result.
    pub fn classify_face(&self, face: &Face, epsilon: f64) -> Classification {
        let mut front = 0;
        let mut back = 0;
        for p in face.points() {
            match self.classify_point(*p, epsilon) {
                Classification::Front => front += 1,
                Classification::Back => back += 1,
                _ => {}
            }
        }
        match (front > 0, back > 0) {
            (true, true) => Classification::Spanning,
            (true, false) => Classification::Front,
            (false, true) => Classification::Back,
            (false, false) => Classification::Coplanar,
        }
    }
}

// =============================================================================
// SPLITTING
// =============================================================================

/// Splits `face` by `plane` into `(front, back)` pieces.
///
/// Faces that do not span the plane land whole on one side; coplanar faces
/// count as front. Clipped polygons come back as a quad, a triangle, or a
/// quad followed by a fan of triangles, carrying the source's tags and
/// material with interpolated UVs.
pub fn split_face(face: &Face, plane: &Plane, epsilon: f64) -> (Vec<Face>, Vec<Face>) {
    match plane.classify_face(face, epsilon) {
        Classification::Front | Classification::Coplanar => (vec![face.clone()], Vec::new()),
        Classification::Back => (Vec::new(), vec![face.clone()]),
        Classification::Spanning => {
            let mut front: Vec<(DVec3, DVec2)> = Vec::new();
            let mut back: Vec<(DVec3, DVec2)> = Vec::new();
            let pts = face.points();
            let uvs = face.uv_points();
            let n = pts.len();

            for i in 0..n {
                let j = (i + 1) % n;
                let ti = plane.classify_point(pts[i], epsilon);
                let tj = plane.classify_point(pts[j], epsilon);

                if ti != Classification::Back {
                    front.push((pts[i], uvs[i]));
                }
                if ti != Classification::Front {
                    back.push((pts[i], uvs[i]));
                }

                if (ti == Classification::Front && tj == Classification::Back)
                    || (ti == Classification::Back && tj == Classification::Front)
                {
                    let di = plane.signed_distance(pts[i]);
                    let dj = plane.signed_distance(pts[j]);
                    let t = di / (di - dj);
                    let cut = (pts[i].lerp(pts[j], t), uvs[i].lerp(uvs[j], t));
                    front.push(cut);
                    back.push(cut);
                }
            }

            (
                polygon_faces(front, face, epsilon),
                polygon_faces(back, face, epsilon),
            )
        }
    }
}

/// Turns a clipped polygon back into faces.
fn polygon_faces(mut polygon: Vec<(DVec3, DVec2)>, template: &Face, epsilon: f64) -> Vec<Face> {
    polygon.dedup_by(|a, b| points_equal(a.0, b.0, epsilon));
    while polygon.len() > 1 && points_equal(polygon[0].0, polygon[polygon.len() - 1].0, epsilon) {
        polygon.pop();
    }
    if polygon.len() < 3 {
        return Vec::new();
    }

    if polygon.len() == 4 {
        // Start at the corner nearest the source's bottom-left.
        let diagonal = template.right() + template.up();
        let start = (0..4)
            .min_by(|&i, &j| polygon[i].0.dot(diagonal).total_cmp(&polygon[j].0.dot(diagonal)))
            .unwrap_or(0);
        polygon.rotate_left(start);
    }

    let (points, uvs): (Vec<DVec3>, Vec<DVec2>) = polygon.into_iter().unzip();
    if points.len() <= 4 {
        return Face::from_parts(&points, &uvs, template).into_iter().collect();
    }

    let mut faces: Vec<Face> = Face::from_parts(&points[..4], &uvs[..4], template)
        .into_iter()
        .collect();
    for k in 4..points.len() {
        let tri_points = [points[0], points[k - 1], points[k]];
        let tri_uvs = [uvs[0], uvs[k - 1], uvs[k]];
        faces.extend(Face::from_parts(&tri_points, &tri_uvs, template));
    }
    faces
}
