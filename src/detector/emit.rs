//! Conversion of classifier hits into [`Detection`]s.
use super::scaling::ScaleData;
use crate::geometry::{iround, BoundingBox, DetectionWindowSize};
use crate::types::{Detection, ObjectClass};

/// Appends a detection whose box starts at (`col`, `row`) and spans at least
/// one pixel per axis.
pub fn push_detection(
    col: i32,
    row: i32,
    width: i32,
    height: i32,
    score: f32,
    detections: &mut Vec<Detection>,
) {
    detections.push(Detection {
        bounding_box: BoundingBox::from_origin_size(col, row, width.max(1), height.max(1)),
        score,
        object_class: ObjectClass::Pedestrian,
    });
}

/// Maps a hit at channel position (`col`, `row`) of one scale back to
/// original-image coordinates.
pub fn add_detection(
    col: u16,
    row: u16,
    score: f32,
    scale_data: &ScaleData,
    detections: &mut Vec<Detection>,
) {
    let range = &scale_data.scaled_search_range;
    let window = &scale_data.scaled_detection_window_size;
    let original_col = iround(col as f32 / (range.range_scaling * range.range_ratio));
    let original_row = iround(row as f32 / range.range_scaling);
    push_detection(
        original_col,
        original_row,
        window.width,
        window.height,
        score,
        detections,
    );
}

/// Bootstrapping variant: keeps (`col`, `row`) in shrunk channel space and
/// sizes the box as the nominal window divided by the shrinking factor,
/// ignoring scale and ratio.
pub fn add_detection_for_bootstrapping(
    col: u16,
    row: u16,
    score: f32,
    nominal_window: DetectionWindowSize,
    shrinking_factor: u32,
    detections: &mut Vec<Detection>,
) {
    let factor = shrinking_factor.max(1) as i32;
    push_detection(
        col as i32,
        row as i32,
        nominal_window.width / factor,
        nominal_window.height / factor,
        score,
        detections,
    );
}
