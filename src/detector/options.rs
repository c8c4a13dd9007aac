//! Parameter types configuring the detector.
//!
//! Strides and margins are expressed in input-image pixels; the scale table
//! maps them into channel pixels per scale.

use super::consistency::WindowAnchor;
use crate::error::ConfigError;
use crate::geometry::Stride;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Horizontal step between evaluated windows at scale one.
    pub x_stride: i32,
    /// Vertical step between evaluated windows at scale one.
    pub y_stride: i32,
    /// Extra border added around the input; negative values clamp to zero.
    pub additional_border: i32,
    /// Vertical margin around the ground plane corridor band.
    pub stixels_vertical_margin: i32,
    /// Scales evaluated on each side of the stixel scale; `<= 0` keeps all.
    pub stixels_scales_margin: i32,
    /// Minimum cascade score the evaluation loop keeps.
    pub score_threshold: f32,
    /// Run every stage even if the model carries a soft cascade.
    pub ignore_soft_cascade: bool,
    pub window_anchor: WindowAnchor,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            x_stride: 8,
            y_stride: 8,
            additional_border: 0,
            stixels_vertical_margin: 30,
            stixels_scales_margin: 5,
            score_threshold: 0.0,
            ignore_soft_cascade: false,
            window_anchor: WindowAnchor::TopLeft,
        }
    }
}

impl DetectorOptions {
    pub fn stride(&self) -> Stride {
        Stride::new(self.x_stride, self.y_stride)
    }

    pub fn border(&self) -> i32 {
        self.additional_border.max(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_stride <= 0 || self.y_stride <= 0 {
            return Err(ConfigError::InvalidStride {
                x: self.x_stride,
                y: self.y_stride,
            });
        }
        Ok(())
    }
}
