use crate::detector::ScaleGeometry;
use crate::geometry::{DetectionWindowSize, ImageSize, SearchRange, Stride};
use serde::Serialize;

/// One row of the scale table, flattened for JSON output.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReport {
    pub scale_index: usize,
    pub scale: f32,
    pub ratio: f32,
    pub scaled_input: ImageSize,
    pub channel_search_range: SearchRange,
    pub stride: Stride,
    pub detection_window: DetectionWindowSize,
    pub positions: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTableReport {
    pub generation: u64,
    pub input: ImageSize,
    pub corridor_applied: bool,
    pub build_ms: f64,
    /// Scale indices from smallest to largest window.
    pub order: Vec<usize>,
    pub scales: Vec<ScaleReport>,
}

impl ScaleTableReport {
    pub fn from_geometry(geometry: &ScaleGeometry) -> Self {
        let scales = geometry
            .scales()
            .iter()
            .zip(geometry.search_ranges())
            .enumerate()
            .map(|(scale_index, (data, range))| {
                let r = &data.scaled_search_range;
                let positions = if r.is_null() {
                    0
                } else {
                    let cols = (r.width() / data.stride.x + 1).max(0) as i64;
                    let rows = (r.height() / data.stride.y + 1).max(0) as i64;
                    cols * rows
                };
                ScaleReport {
                    scale_index,
                    scale: range.detection_window_scale,
                    ratio: range.detection_window_ratio,
                    scaled_input: data.scaled_input_image_size,
                    channel_search_range: *r,
                    stride: data.stride,
                    detection_window: data.scaled_detection_window_size,
                    positions,
                }
            })
            .collect();
        Self {
            generation: geometry.generation(),
            input: geometry.input_size(),
            corridor_applied: geometry.corridor_applied(),
            build_ms: geometry.build_ms(),
            order: geometry.scale_order(),
            scales,
        }
    }

    pub fn total_positions(&self) -> i64 {
        self.scales.iter().map(|s| s.positions).sum()
    }
}
