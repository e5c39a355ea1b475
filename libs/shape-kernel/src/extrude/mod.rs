//! # Path Extrusion
//!
//! Sweeps a 2D cross-section along sampled path tangents.
//!
//! Each tangent gets an orthonormal frame (`right = forward x up`,
//! `up' = right x forward`); the profile is placed in that frame and
//! consecutive rings are skinned with quads. On sharp turns the inner side
//! of consecutive rings would cross; such ring pairs are clamped onto the
//! plane bisecting the turn.
//!
//! A counter-clockwise profile produces walls facing the path (a tunnel);
//! set [`ExtrudeParams::outward`] for a solid tube.


use crate::error::GeometryResult;
use crate::face::{bridge_textured_loops, Face};
use crate::output::{face_buffers, MaterialId, MeshBuffers, ShadingMode};
use crate::path::{BezierPath, Tangent};
use crate::config::KernelConfig;
use glam::{DVec2, DVec3};
use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};
use tracing::{debug, warn};

/// Arch points of a tunnel profile, excluding both springing points.
const TUNNEL_ARCH_STEPS: usize = 9;

// =============================================================================
// CROSS SECTION
// =============================================================================

/// A closed 2D profile; `x` maps to the frame's right, `y` to its up.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    points: Vec<DVec2>,
}

impl CrossSection {
    /// Creates a profile from points in order.
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    /// A `width x height` rectangle centred on `x = 0`, standing on `y = 0`.
    pub fn rectangle(width: f64, height: f64) -> Self {
        let hw = width * 0.5;
        Self::new(vec![
            DVec2::new(-hw, 0.0),
            DVec2::new(hw, 0.0),
            DVec2::new(hw, height),
            DVec2::new(-hw, height),
        ])
    }

    /// A flat-floored arched tunnel profile of 12 points.
    ///
    /// Straight walls rise to `height - width / 2` and an elliptic arch
    /// closes the top at `height`.
    pub fn tunnel(width: f64, height: f64) -> Self {
        let r = width * 0.5;
        let wall = (height - r).max(0.0);
        let rise = height - wall;
        let mut points = vec![DVec2::new(-r, 0.0), DVec2::new(r, 0.0), DVec2::new(r, wall)];
        for k in 1..TUNNEL_ARCH_STEPS {
            let theta = PI * k as f64 / TUNNEL_ARCH_STEPS as f64;
            points.push(DVec2::new(r * theta.cos(), wall + rise * theta.sin()));
        }
        points.push(DVec2::new(-r, wall));
        Self::new(points)
    }

    /// Chaikin corner cutting, `iterations` times.
    pub fn smoothed(&self, iterations: usize) -> Self {
        let mut points = self.points.clone();
        for _ in 0..iterations {
            let n = points.len();
            if n < 3 {
                break;
            }
            points = (0..n)
                .flat_map(|i| {
                    let p = points[i];
                    let q = points[(i + 1) % n];
                    [p * 0.75 + q * 0.25, p * 0.25 + q * 0.75]
                })
                .collect();
        }
        Self::new(points)
    }

    /// Profile points.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the profile has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest horizontal distance from the path.
    pub fn half_width(&self) -> f64 {
        self.points.iter().map(|p| p.x.abs()).fold(0.0, f64::max)
    }

    /// Average of the points.
    pub fn centroid(&self) -> DVec2 {
        if self.points.is_empty() {
            return DVec2::ZERO;
        }
        self.points.iter().copied().sum::<DVec2>() / self.points.len() as f64
    }

    /// Shoelace orientation test.
    pub fn is_counter_clockwise(&self) -> bool {
        let n = self.points.len();
        let twice_area: f64 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x * q.y - q.x * p.y
            })
            .sum();
        twice_area > 0.0
    }

    /// `v` texture coordinate per point and for the wrapped seam copy.
    ///
    /// Each point's angle around the centroid, measured from straight down as
    /// a fraction of a full turn, is unwrapped so it keeps running in the
    /// profile's direction; the seam copy of point 0 lands one turn later.
    fn angular_v(&self) -> (Vec<f64>, f64) {
        let c = self.centroid();
        let ccw = self.is_counter_clockwise();
        let mut v: Vec<f64> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            let d = *p - c;
            let mut turn = (d.y.atan2(d.x) + PI * 0.5).rem_euclid(TAU) / TAU;
            if let Some(&prev) = v.last() {
                if ccw {
                    while turn < prev {
                        turn += 1.0;
                    }
                } else {
                    while turn > prev {
                        turn -= 1.0;
                    }
                }
            }
            v.push(turn);
        }
        let seam = v
            .first()
            .map_or(0.0, |&first| if ccw { first + 1.0 } else { first - 1.0 });
        (v, seam)
    }
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Parameters for [`extrude`].
#[derive(Debug, Clone)]
pub struct ExtrudeParams {
    /// Close both ends with fans.
    pub caps: bool,
    /// Face walls away from the path instead of toward it.
    pub outward: bool,
    /// World units to texture `u` multiplier.
    pub uv_scale: f64,
    /// Reference up vector for ring frames.
    pub up: DVec3,
    /// Material assigned to every generated face.
    pub material: MaterialId,
    /// Tolerance for collapsing coincident profile points.
    pub config: KernelConfig,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            caps: false,
            outward: false,
            uv_scale: 1.0,
            up: DVec3::Y,
            material: MaterialId::default(),
            config: KernelConfig::default(),
        }
    }
}

/// Result of an extrusion.
#[derive(Debug, Clone, Default)]
pub struct Extrusion {
    /// Placed profile rings, one per tangent, after clamping.
    pub rings: Vec<Vec<DVec3>>,
    /// Wall faces, then caps.
    pub faces: Vec<Face>,
    /// Number of consecutive ring pairs clamped at sharp turns.
    pub clamped_pairs: usize,
}

impl Extrusion {
    /// Number of triangles the faces expand to.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.corner_count() - 2).sum()
    }

    /// Render buffers grouped by material.
    pub fn buffers(&self, mode: ShadingMode, config: &KernelConfig) -> BTreeMap<MaterialId, MeshBuffers> {
        face_buffers(&self.faces, mode, config)
    }
}

// =============================================================================
// EXTRUSION
// =============================================================================

/// Extrudes `section` along `path`, sampled every `resolution` units.
pub fn extrude_path(
    section: &CrossSection,
    path: &BezierPath,
    resolution: f64,
    params: &ExtrudeParams,
) -> GeometryResult<Extrusion> {
    extrude(section, &path.sample_tangents(resolution), params)
}

/// Places `section` at every tangent and skins consecutive rings.
///
/// Fewer than two tangents or three profile points yield an empty result.
pub fn extrude(section: &CrossSection, tangents: &[Tangent], params: &ExtrudeParams) -> GeometryResult<Extrusion> {
    if section.len() < 3 || tangents.len() < 2 {
        warn!(
            points = section.len(),
            tangents = tangents.len(),
            "extrusion needs at least 3 profile points and 2 tangents"
        );
        return Ok(Extrusion::default());
    }

    let frames = ring_frames(tangents, params.up);
    let mut rings: Vec<Vec<DVec3>> = tangents
        .iter()
        .zip(&frames)
        .map(|(tangent, &(right, up))| place_ring(section, tangent, right, up))
        .collect();

    let half_width = section.half_width();
    let mut clamped_pairs = 0;
    for i in 0..rings.len() - 1 {
        let (t0, t1) = (&tangents[i], &tangents[i + 1]);
        let turn = (frames[i].0 - frames[i + 1].0).length();
        let reach = half_width * t0.width_scale.max(t1.width_scale) * turn;
        if t0.position.distance(t1.position) >= reach {
            continue;
        }
        let (head, tail) = rings.split_at_mut(i + 1);
        if clamp_ring_pair(&mut head[i], &mut tail[0], t0, t1) {
            clamped_pairs += 1;
        }
    }
    if clamped_pairs > 0 {
        debug!(clamped_pairs, "clamped rings at sharp turns");
    }

    // u runs along the path, v around the profile.
    let mut distances = Vec::with_capacity(tangents.len());
    let mut travelled = 0.0;
    for (i, tangent) in tangents.iter().enumerate() {
        if i > 0 {
            travelled += tangents[i - 1].position.distance(tangent.position);
        }
        distances.push(travelled * params.uv_scale);
    }
    let (v, seam_v) = section.angular_v();
    let n = section.len();

    let mut faces = Vec::with_capacity((rings.len() - 1) * n + 2 * n);
    for i in 0..rings.len() - 1 {
        let uv = |side: usize, j: usize| {
            let vj = if j == n { seam_v } else { v[j] };
            DVec2::new(distances[i + side], vj)
        };
        for wall in bridge_textured_loops(&rings[i], &rings[i + 1], &params.config, uv)? {
            let wall = if params.outward { wall.inverted() } else { wall };
            faces.push(wall.with_material(params.material));
        }
    }

    if params.caps {
        let first = tangents[0].direction;
        let last = tangents[tangents.len() - 1].direction;
        let sign = if params.outward { -1.0 } else { 1.0 };
        faces.extend(cap(&rings[0], section, first * sign, params));
        faces.extend(cap(&rings[rings.len() - 1], section, -last * sign, params));
    }

    Ok(Extrusion {
        rings,
        faces,
        clamped_pairs,
    })
}

/// `(right, up)` frame per tangent.
fn ring_frames(tangents: &[Tangent], reference_up: DVec3) -> Vec<(DVec3, DVec3)> {
    let mut frames = Vec::with_capacity(tangents.len());
    let mut previous_right = DVec3::X;
    for tangent in tangents {
        let forward = tangent.direction;
        let mut right = forward.cross(reference_up).normalize_or_zero();
        if right == DVec3::ZERO {
            // Travelling along the up axis: keep the last sideways direction.
            right = (previous_right - forward * previous_right.dot(forward)).normalize_or_zero();
            if right == DVec3::ZERO {
                right = forward.any_orthonormal_vector();
            }
        }
        let up = right.cross(forward);
        previous_right = right;
        frames.push((right, up));
    }
    frames
}

fn place_ring(section: &CrossSection, tangent: &Tangent, right: DVec3, up: DVec3) -> Vec<DVec3> {
    section
        .points()
        .iter()
        .map(|p| tangent.position + right * (p.x * tangent.width_scale) + up * (p.y * tangent.height_scale))
        .collect()
}

/// Pulls both rings back to the plane bisecting the turn between them.
///
/// Front points past the plane and back points before it are projected onto
/// it; a pair that crossed each other collapses to their crossing point.
fn clamp_ring_pair(front: &mut [DVec3], back: &mut [DVec3], t0: &Tangent, t1: &Tangent) -> bool {
    let mid = (t0.position + t1.position) * 0.5;
    let mut normal = (t0.direction + t1.direction).normalize_or_zero();
    if normal == DVec3::ZERO {
        normal = t0.direction;
    }

    let mut changed = false;
    for (f, b) in front.iter_mut().zip(back.iter_mut()) {
        let df = normal.dot(*f - mid);
        let db = normal.dot(*b - mid);
        if df > 0.0 && db < 0.0 {
            let crossing = *f + (*b - *f) * (df / (df - db));
            *f = crossing;
            *b = crossing;
            changed = true;
        } else {
            if df > 0.0 {
                *f -= normal * df;
                changed = true;
            }
            if db < 0.0 {
                *b -= normal * db;
                changed = true;
            }
        }
    }
    changed
}

/// Fan of triangles closing `ring`, facing along `facing`.
fn cap(ring: &[DVec3], section: &CrossSection, facing: DVec3, params: &ExtrudeParams) -> Vec<Face> {
    let n = ring.len();
    let center = ring.iter().copied().sum::<DVec3>() / n as f64;
    let uv_center = section.centroid() * params.uv_scale;
    let profile = section.points();

    (0..n)
        .filter_map(|j| {
            let k = (j + 1) % n;
            let face = Face::triangle(center, ring[j], ring[k])
                .with_uvs([
                    uv_center,
                    profile[j] * params.uv_scale,
                    profile[k] * params.uv_scale,
                    profile[k] * params.uv_scale,
                ])
                .with_material(params.material);
            if face.area() <= f64::EPSILON {
                return None;
            }
            Some(if face.normal().dot(facing) < 0.0 { face.inverted() } else { face })
        })
        .collect()
}
