//! Integer geometry primitives shared by the scale table, the corridor
//! pruner and the detection emitter.
//!
//! - [`DetectionWindowSize`] / [`ImageSize`] / [`Stride`]: plain sizes.
//! - [`SearchRange`]: top-left window positions evaluated at one scale, with
//!   the cumulative scaling needed to map back to original-image pixels.
//!
//! Rescaling always rounds to the nearest integer (half away from zero).
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round-to-nearest conversion used by every rescale in the crate.
#[inline]
pub fn iround(v: f32) -> i32 {
    v.round() as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Width/height of a detection window, in whatever pixel space the owner
/// documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionWindowSize {
    pub width: i32,
    pub height: i32,
}

impl DetectionWindowSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Scales `width` by `scale_x` and `height` by `scale_y`, rounding each.
    pub fn rescaled(&self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            width: iround(self.width as f32 * scale_x),
            height: iround(self.height as f32 * scale_y),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Size in channel pixels for a given shrinking factor (truncating).
    pub fn shrunk(&self, shrinking_factor: u32) -> Self {
        let factor = shrinking_factor.max(1) as usize;
        Self {
            width: self.width / factor,
            height: self.height / factor,
        }
    }
}

/// Step between evaluated window positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stride {
    pub x: i32,
    pub y: i32,
}

impl Stride {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Scales both axes, rounding and flooring each at one pixel.
    pub fn rescaled(&self, scaling: f32) -> Self {
        Self {
            x: iround(self.x as f32 * scaling).max(1),
            y: iround(self.y as f32 * scaling).max(1),
        }
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self { x: 1, y: 1 }
    }
}

/// Axis-aligned set of top-left window positions evaluated at one scale.
///
/// Bounds are inclusive. A range with `max_x == 0 && max_y == 0` is *null*:
/// nothing is searched at that scale. `range_scaling`/`range_ratio`
/// accumulate every [`SearchRange::rescaled`] call so that a position can be
/// mapped back to the space the range was first expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRange {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    /// Nominal scale factor of the detection window (>= 0).
    pub detection_window_scale: f32,
    /// Width/height adjustment of the detection window.
    pub detection_window_ratio: f32,
    pub range_scaling: f32,
    pub range_ratio: f32,
}

impl SearchRange {
    pub fn new(
        detection_window_scale: f32,
        detection_window_ratio: f32,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    ) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            detection_window_scale,
            detection_window_ratio,
            range_scaling: 1.0,
            range_ratio: 1.0,
        }
    }

    /// Range that searches nothing at the given scale.
    pub fn null(detection_window_scale: f32, detection_window_ratio: f32) -> Self {
        Self::new(detection_window_scale, detection_window_ratio, 0, 0, 0, 0)
    }

    pub fn is_null(&self) -> bool {
        self.max_x == 0 && self.max_y == 0
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Number of candidate positions counted the way the pruning report does
    /// (`width * height`, zero for inverted ranges).
    pub fn area(&self) -> i64 {
        (self.width().max(0) as i64) * (self.height().max(0) as i64)
    }

    /// Rescales the bounds: y by `scaling`, x by `scaling * ratio`.
    ///
    /// The nominal window scale and ratio are kept; the cumulative
    /// `range_scaling` and `range_ratio` are multiplied in.
    pub fn rescaled(&self, scaling: f32, ratio: f32) -> Self {
        let scaling_x = scaling * ratio;
        Self {
            min_x: iround(self.min_x as f32 * scaling_x),
            min_y: iround(self.min_y as f32 * scaling),
            max_x: iround(self.max_x as f32 * scaling_x),
            max_y: iround(self.max_y as f32 * scaling),
            detection_window_scale: self.detection_window_scale,
            detection_window_ratio: self.detection_window_ratio,
            range_scaling: self.range_scaling * scaling,
            range_ratio: self.range_ratio * ratio,
        }
    }
}

/// Integer rectangle with exclusive max corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> i64 {
        (self.width().max(0) as i64) * (self.height().max(0) as i64)
    }
}
