use nalgebra::{Matrix3, Vector3};
use pedestrian_detector::ground_plane::{CameraModel, GroundPlane};
use pedestrian_detector::types::Pose;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Corridor of a camera looking level over flat ground: object height grows
/// by one pixel per row below `horizon`.
pub fn linear_corridor(rows: usize, horizon: usize) -> Vec<i32> {
    (0..rows)
        .map(|v| if v > horizon { horizon as i32 } else { -1 })
        .collect()
}

/// Constant object height for every foot row at or below `first_row`.
pub fn constant_corridor(rows: usize, first_row: usize, object_height: i32) -> Vec<i32> {
    (0..rows)
        .map(|v| {
            if v >= first_row {
                v as i32 - object_height
            } else {
                -1
            }
        })
        .collect()
}

/// 500 px focal length camera at the origin, principal point at the centre
/// of a 640x480 image.
pub fn level_camera() -> CameraModel {
    CameraModel {
        kmtx: Matrix3::new(500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0),
        pose: Pose::default(),
    }
}

/// Ground 1.5 units below the camera (camera y axis points down).
pub fn flat_ground() -> GroundPlane {
    GroundPlane {
        normal: Vector3::new(0.0, -1.0, 0.0),
        offset: -1.5,
    }
}
