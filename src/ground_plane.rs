//! Ground-plane corridor: per foot row, where the top of a standing object
//! projects in the image.
//!
//! The corridor can be supplied directly or estimated from a calibrated
//! camera and a ground plane. Rows whose viewing ray does not hit the ground
//! in front of the camera (above the horizon) hold a negative entry.
use crate::error::ConfigError;
use crate::types::Pose;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One object-top row per input row, negative above the horizon.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroundPlaneCorridor(Vec<i32>);

impl GroundPlaneCorridor {
    pub fn new(rows: Vec<i32>) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First row with a usable entry.
    pub fn horizon_row(&self) -> Option<usize> {
        self.0.iter().position(|&top| top >= 0)
    }
}

impl From<Vec<i32>> for GroundPlaneCorridor {
    fn from(rows: Vec<i32>) -> Self {
        Self(rows)
    }
}

/// Pinhole camera: intrinsics plus world-to-camera pose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraModel {
    pub kmtx: Matrix3<f32>,
    #[serde(default)]
    pub pose: Pose,
}

impl CameraModel {
    fn center(&self) -> Point3<f32> {
        Point3::from(-(self.pose.r.transpose() * self.pose.t))
    }

    fn project(&self, world: &Point3<f32>) -> Option<(f32, f32)> {
        let cam = self.pose.r * world.coords + self.pose.t;
        if cam.z <= f32::EPSILON {
            return None;
        }
        let p = self.kmtx * cam;
        Some((p.x / p.z, p.y / p.z))
    }
}

/// Plane `normal · X = offset` in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    pub normal: Vector3<f32>,
    pub offset: f32,
}

/// Estimates the corridor by casting the ray of every row through the
/// image centre column onto the ground and lifting the hit by
/// `object_height` (world units) away from the ground towards the camera
/// side.
pub fn estimate_corridor(
    camera: &CameraModel,
    plane: &GroundPlane,
    image_width: usize,
    image_height: usize,
    object_height: f32,
) -> Result<GroundPlaneCorridor, ConfigError> {
    if !(object_height.is_finite() && object_height > 0.0) {
        return Err(ConfigError::InvalidObjectHeight {
            height: object_height,
        });
    }
    let norm = plane.normal.norm();
    if !(norm.is_finite() && norm > f32::EPSILON) {
        return Err(ConfigError::DegenerateGroundPlane);
    }
    let k_inv = camera
        .kmtx
        .try_inverse()
        .ok_or(ConfigError::SingularIntrinsics)?;

    let normal = plane.normal / norm;
    let offset = plane.offset / norm;
    let center = camera.center();
    let center_side = normal.dot(&center.coords) - offset;
    let up = if center_side >= 0.0 { normal } else { -normal };
    let r_t = camera.pose.r.transpose();
    let u = image_width as f32 * 0.5;

    let rows = (0..image_height)
        .map(|v| {
            let dir = r_t * (k_inv * Vector3::new(u, v as f32, 1.0));
            let denom = normal.dot(&dir);
            if denom.abs() <= f32::EPSILON {
                return -1;
            }
            let s = (offset - normal.dot(&center.coords)) / denom;
            if s <= 0.0 {
                return -1;
            }
            let foot = center + dir * s;
            let head = foot + up * object_height;
            match camera.project(&head) {
                Some((_, top)) if top.is_finite() && top < v as f32 => top.round().max(0.0) as i32,
                _ => -1,
            }
        })
        .collect();
    Ok(GroundPlaneCorridor::new(rows))
}
