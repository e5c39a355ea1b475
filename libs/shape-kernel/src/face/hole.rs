//! Cutting a rectangular prism through stacked faces.

use super::{bridge_edge_loops_with_config, split_face, Face, FaceTag, Plane};
use crate::config::KernelConfig;
use glam::DVec3;
use tracing::{debug, warn};

/// A rectangular ray: the prism cut by [`make_hole`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleRay {
    /// A point on the hole's axis.
    pub origin: DVec3,
    /// Axis direction.
    pub direction: DVec3,
    /// Approximate up vector for the cross-section.
    pub up: DVec3,
    /// Extent along the cross-section's right axis.
    pub width: f64,
    /// Extent along the cross-section's up axis.
    pub height: f64,
    /// Faces hit further than this along the axis are ignored.
    pub max_distance: Option<f64>,
}

impl HoleRay {
    /// Creates an unbounded ray.
    pub fn new(origin: DVec3, direction: DVec3, up: DVec3, width: f64, height: f64) -> Self {
        Self {
            origin,
            direction,
            up,
            width,
            height,
            max_distance: None,
        }
    }

    /// Limits the ray to `distance` along its axis.
    pub fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = Some(distance);
        self
    }
}

/// Orthonormal frame of a hole's cross-section.
struct HoleFrame {
    origin: DVec3,
    forward: DVec3,
    right: DVec3,
    up: DVec3,
}

impl HoleFrame {
    fn new(ray: &HoleRay) -> Option<Self> {
        let forward = ray.direction.normalize_or_zero();
        let right = forward.cross(ray.up).normalize_or_zero();
        if forward == DVec3::ZERO || right == DVec3::ZERO {
            return None;
        }
        Some(Self {
            origin: ray.origin,
            forward,
            right,
            up: right.cross(forward),
        })
    }

    /// The four side planes, each facing into the prism.
    fn side_planes(&self, width: f64, height: f64) -> [Plane; 4] {
        let hw = width * 0.5;
        let hh = height * 0.5;
        [
            Plane::from_point_normal(self.origin - self.right * hw, self.right),
            Plane::from_point_normal(self.origin + self.right * hw, -self.right),
            Plane::from_point_normal(self.origin - self.up * hh, self.up),
            Plane::from_point_normal(self.origin + self.up * hh, -self.up),
        ]
    }

    /// Distance along the axis at which the ray meets the face's plane.
    fn hit_distance(&self, face: &Face) -> Option<f64> {
        let normal = face.normal();
        let denom = normal.dot(self.forward);
        if denom.abs() < 1e-9 {
            return None;
        }
        Some(normal.dot(face.points()[0] - self.origin) / denom)
    }

    fn angle_of(&self, point: DVec3) -> f64 {
        let local = point - self.origin;
        local.dot(self.up).atan2(local.dot(self.right))
    }

    fn axis_point(&self, point: DVec3) -> DVec3 {
        self.origin + self.forward * (point - self.origin).dot(self.forward)
    }
}

/// Cuts a hole through `faces` with the default configuration.
pub fn make_hole(faces: Vec<Face>, ray: &HoleRay) -> Vec<Face> {
    make_hole_with_config(faces, ray, &KernelConfig::default())
}

/// Cuts a rectangular hole through every face the prism crosses.
///
/// Each crossed face is clipped against the prism's four side planes; the
/// piece inside the prism is tagged [`FaceTag::Cutout`]. Crossed faces are
/// grouped into layers by hit distance; consecutive layer pairs holding one
/// hole piece each with matching corner counts are joined by inward-facing
/// [`FaceTag::Reveal`] walls and their hole pieces removed. Unmatched hole
/// pieces stay in place, still tagged.
pub fn make_hole_with_config(faces: Vec<Face>, ray: &HoleRay, config: &KernelConfig) -> Vec<Face> {
    let eps = config.tolerance;
    let Some(frame) = HoleFrame::new(ray) else {
        warn!(direction = ?ray.direction, up = ?ray.up, "hole ray has no usable frame, skipping");
        return faces;
    };
    let planes = frame.side_planes(ray.width, ray.height);

    let mut output: Vec<Option<Face>> = Vec::with_capacity(faces.len() + 8);
    // (hit distance, output slot) of every hole piece.
    let mut hole_pieces: Vec<(f64, usize)> = Vec::new();

    for face in faces {
        let hit = frame.hit_distance(&face).filter(|&t| {
            t >= -eps && ray.max_distance.map_or(true, |max| t <= max + eps)
        });
        let Some(t) = hit else {
            output.push(Some(face));
            continue;
        };

        let mut pieces = vec![face.clone()];
        for plane in &planes {
            pieces = pieces
                .iter()
                .flat_map(|piece| {
                    let (front, back) = split_face(piece, plane, eps);
                    front.into_iter().chain(back)
                })
                .collect();
        }

        let inside = |f: &Face| planes.iter().all(|p| p.signed_distance(f.center()) >= -eps);
        if !pieces.iter().any(inside) {
            output.push(Some(face));
            continue;
        }
        for piece in pieces {
            if inside(&piece) {
                hole_pieces.push((t, output.len()));
                output.push(Some(piece.with_tag(FaceTag::Cutout)));
            } else {
                output.push(Some(piece));
            }
        }
    }

    if hole_pieces.is_empty() {
        debug!("hole ray crossed no faces");
    }

    let mut reveals = Vec::new();
    let layers = group_layers(hole_pieces, eps);
    for pair in layers.chunks_exact(2) {
        let ([front_slot], [back_slot]) = (pair[0].as_slice(), pair[1].as_slice()) else {
            debug!("hole layer holds several pieces, leaving them open");
            continue;
        };
        let (Some(front), Some(back)) = (&output[*front_slot], &output[*back_slot]) else {
            continue;
        };
        if front.corner_count() != back.corner_count() {
            debug!("hole layers differ in corner count, leaving them open");
            continue;
        }
        let Some(walls) = bridge_hole(&frame, front, back, config) else {
            continue;
        };
        reveals.extend(walls);
        output[*front_slot] = None;
        output[*back_slot] = None;
    }

    output.into_iter().flatten().chain(reveals).collect()
}

/// Groups hole-piece slots into layers of equal hit distance, nearest first.
fn group_layers(mut pieces: Vec<(f64, usize)>, eps: f64) -> Vec<Vec<usize>> {
    pieces.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut layers: Vec<(f64, Vec<usize>)> = Vec::new();
    for (t, slot) in pieces {
        match layers.last_mut() {
            Some((depth, slots)) if (t - *depth).abs() <= eps => slots.push(slot),
            _ => layers.push((t, vec![slot])),
        }
    }
    layers.into_iter().map(|(_, slots)| slots).collect()
}

/// Reveal walls joining two hole pieces, facing the hole's axis.
fn bridge_hole(frame: &HoleFrame, front: &Face, back: &Face, config: &KernelConfig) -> Option<Vec<Face>> {
    let ring = |face: &Face| {
        let mut points = face.points().to_vec();
        points.sort_by(|a, b| frame.angle_of(*a).total_cmp(&frame.angle_of(*b)));
        points
    };
    let walls = bridge_edge_loops_with_config(&ring(front), &ring(back), config).ok()?;
    let first = walls.first()?;
    let facing_axis = first.normal().dot(frame.axis_point(first.center()) - first.center()) > 0.0;

    Some(
        walls
            .into_iter()
            .map(|wall| {
                let wall = if facing_axis { wall } else { wall.inverted() };
                wall.with_material(front.material()).with_tag(FaceTag::Reveal)
            })
            .collect(),
    )
}
