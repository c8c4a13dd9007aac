use crate::geometry::BoundingBox;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// World-to-camera rigid transform: `X_cam = r * X_world + t`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pose {
    pub r: Matrix3<f32>,
    pub t: Vector3<f32>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            r: Matrix3::identity(),
            t: Vector3::zeros(),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    #[default]
    Pedestrian,
}

/// Classifier hit mapped to original-image coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub score: f32,
    pub object_class: ObjectClass,
}

/// One stixel per image column: the estimated object extent standing on the
/// ground at that column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stixel {
    pub x: i32,
    pub bottom_y: i32,
    pub top_y: i32,
}

impl Stixel {
    pub fn height(&self) -> i32 {
        self.bottom_y - self.top_y
    }
}
