//! Per-scale geometry derived from the configured search ranges.
//!
//! Images are rescaled, not the cascade: at scale `s` and ratio `r` the input
//! is resized by `1/s` vertically and `1/(s*r)` horizontally, then shrunk by
//! the channel shrinking factor. Search ranges and strides are configured in
//! input pixels and mapped into that channel space here; detection windows are
//! mapped the other way, from the model window to input pixels.
use crate::error::GeometryFault;
use crate::geometry::{iround, DetectionWindowSize, ImageSize, SearchRange, Stride};
use log::debug;
use serde::Serialize;

/// Nominal window the cascade evaluates at one scale, and the factor its
/// stages were rescaled by.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTemplate {
    pub window_size: DetectionWindowSize,
    pub relative_scale: f32,
}

impl ScaleTemplate {
    pub fn new(window_size: DetectionWindowSize) -> Self {
        Self {
            window_size,
            relative_scale: 1.0,
        }
    }

    /// Window footprint in channel pixels (truncating).
    pub fn channel_window_size(&self, shrinking_factor: u32) -> DetectionWindowSize {
        let channels_resizing_factor = 1.0 / shrinking_factor.max(1) as f32;
        let factor = self.relative_scale * channels_resizing_factor;
        DetectionWindowSize::new(
            (self.window_size.width as f32 * factor) as i32,
            (self.window_size.height as f32 * factor) as i32,
        )
    }
}

/// Derived state for one scale; index `i` matches search range `i`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleData {
    /// Input size after the per-scale resize, before shrinking.
    pub scaled_input_image_size: ImageSize,
    /// Search range in channel pixels.
    pub scaled_search_range: SearchRange,
    /// Detection window in original-image pixels.
    pub scaled_detection_window_size: DetectionWindowSize,
    /// Stride in channel pixels.
    pub stride: Stride,
}

impl ScaleData {
    /// Scaled input expressed in channel pixels.
    pub fn channel_image_size(&self, shrinking_factor: u32) -> ImageSize {
        self.scaled_input_image_size.shrunk(shrinking_factor)
    }
}

/// Input size after resizing by `1/scale` (y) and `1/(scale*ratio)` (x).
pub fn scaled_input_size(input: ImageSize, scale: f32, ratio: f32) -> ImageSize {
    let input_to_input_scaled = 1.0 / scale;
    let input_to_input_scaled_ratio = 1.0 / ratio;
    let input_to_input_scaled_x = input_to_input_scaled * input_to_input_scaled_ratio;
    ImageSize {
        width: iround(input.width as f32 * input_to_input_scaled_x).max(0) as usize,
        height: iround(input.height as f32 * input_to_input_scaled).max(0) as usize,
    }
}

/// Computes one [`ScaleData`] per search range.
///
/// `log_strides` prints the per-scale stride table at debug level; the
/// detector enables it once per instance.
pub fn build_scale_table(
    input: ImageSize,
    search_ranges: &[SearchRange],
    templates: &[ScaleTemplate],
    base_stride: Stride,
    shrinking_factor: u32,
    log_strides: bool,
) -> Result<Vec<ScaleData>, GeometryFault> {
    if templates.len() != search_ranges.len() {
        return Err(GeometryFault::TableLengthMismatch {
            scale_data: templates.len(),
            search_ranges: search_ranges.len(),
        });
    }
    let channels_resizing_factor = 1.0 / shrinking_factor.max(1) as f32;

    let table = search_ranges
        .iter()
        .zip(templates)
        .map(|(range, template)| {
            let scale = range.detection_window_scale;
            let ratio = range.detection_window_ratio;
            let input_to_input_scaled = 1.0 / scale;
            let input_to_input_scaled_ratio = 1.0 / ratio;

            let input_to_channel_scale = input_to_input_scaled * channels_resizing_factor;
            let stride_scaling = scale * input_to_channel_scale;
            let stride = base_stride.rescaled(stride_scaling);
            if log_strides {
                debug!(
                    "scale {:.3} stride (x,y) = ({:.3}, {:.3}) input px -> ({}, {}) channel px",
                    scale,
                    base_stride.x as f32 * stride_scaling,
                    base_stride.y as f32 * stride_scaling,
                    stride.x,
                    stride.y
                );
            }

            ScaleData {
                scaled_input_image_size: scaled_input_size(input, scale, ratio),
                scaled_search_range: range
                    .rescaled(input_to_channel_scale, input_to_input_scaled_ratio),
                scaled_detection_window_size: template
                    .window_size
                    .rescaled(scale * ratio, scale),
                stride,
            }
        })
        .collect();
    Ok(table)
}
