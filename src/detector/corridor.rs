//! Vertical search band pruning from a ground-plane corridor.
//!
//! The corridor gives, for every image row `v` taken as an object's foot
//! row, the row where the top of a standard object standing there would
//! project (negative above the horizon). For each scale we pick the foot row
//! whose corridor height best matches the scale's window height and keep only
//! the top-left positions within `vertical_margin` of that placement.
//!
//! Search ranges here are in input pixels, before the scale table maps them
//! into channel space.
use super::scaling::ScaleData;
use crate::diagnostics::{PruningReport, ScalePruning};
use crate::error::GeometryFault;
use crate::geometry::{Axis, SearchRange};
use log::{debug, warn};

/// Larger pruned extents indicate a corridor or geometry bug upstream.
pub const MAX_REASONABLE_EXTENT: i32 = 5000;

/// Foot row whose corridor height is closest to `detection_height`.
///
/// Ties keep the first row in scan order. `None` when every entry lies above
/// the horizon.
pub fn best_matching_row(corridor: &[i32], detection_height: i32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (bottom_v, &object_top_v) in corridor.iter().enumerate() {
        if object_top_v < 0 {
            continue;
        }
        let corridor_height = bottom_v as i32 - object_top_v;
        let margin = detection_height.abs_diff(corridor_height);
        if best.map_or(true, |(_, m)| margin < m) {
            best = Some((bottom_v, margin));
        }
    }
    best.map(|(v, _)| v)
}

/// Narrows every non-null search range to the corridor band of its scale.
///
/// Ranges are only ever shrunk. A degenerate band collapses to a single row;
/// a corridor without any usable row leaves the range untouched. `verbose`
/// enables the per-scale summary and the degenerate-band warnings.
pub fn prune_search_ranges(
    corridor: &[i32],
    vertical_margin: i32,
    table: &[ScaleData],
    search_ranges: &mut [SearchRange],
    verbose: bool,
) -> Result<PruningReport, GeometryFault> {
    if table.len() != search_ranges.len() {
        return Err(GeometryFault::TableLengthMismatch {
            scale_data: table.len(),
            search_ranges: search_ranges.len(),
        });
    }

    let mut report = PruningReport::default();
    for (scale_index, (range, data)) in search_ranges.iter_mut().zip(table).enumerate() {
        if range.is_null() {
            continue;
        }
        let original = *range;
        let detection_height = data.scaled_detection_window_size.height;

        match best_matching_row(corridor, detection_height) {
            Some(bottom_v) => {
                // positions are top-left corners: top - bottom ~= 2 * margin
                let corridor_top = corridor[bottom_v] - vertical_margin;
                let corridor_bottom = bottom_v as i32 - detection_height + vertical_margin;
                range.min_y = original.min_y.max(corridor_top);
                range.max_y = original.max_y.min(corridor_bottom);

                if range.min_y > range.max_y {
                    if verbose {
                        warn!(
                            "scale {}: detection window ({} px) does not fit the ground plane corridor, searching a single row",
                            scale_index, detection_height
                        );
                    }
                    let row = if original.min_y == 0 && original.max_y == 0 {
                        0
                    } else {
                        (original.max_y - 1).max(0).max(original.min_y)
                    };
                    range.min_y = row;
                    range.max_y = row;
                    if row > original.max_y {
                        return Err(GeometryFault::EmptyRange {
                            scale_index,
                            min_y: row,
                            max_y: original.max_y,
                        });
                    }
                }
            }
            None => {
                debug!(
                    "scale {}: ground plane corridor has no row below the horizon, keeping the search range",
                    scale_index
                );
            }
        }

        let updated_width = range.width();
        let updated_height = range.height();
        if updated_width > MAX_REASONABLE_EXTENT {
            return Err(GeometryFault::UnreasonableExtent {
                scale_index,
                axis: Axis::X,
                extent: updated_width,
                limit: MAX_REASONABLE_EXTENT,
            });
        }
        if updated_height > MAX_REASONABLE_EXTENT {
            return Err(GeometryFault::UnreasonableExtent {
                scale_index,
                axis: Axis::Y,
                extent: updated_height,
                limit: MAX_REASONABLE_EXTENT,
            });
        }

        if verbose {
            debug!(
                "scale {}: original height {}, updated height {}",
                scale_index,
                original.height(),
                updated_height
            );
        }
        report.push(ScalePruning {
            scale_index,
            original_min_y: original.min_y,
            original_max_y: original.max_y,
            min_y: range.min_y,
            max_y: range.max_y,
            width: original.width(),
        });
    }

    if verbose {
        debug!(
            "expected speed gain {:.2}x (num pixels original/updated)",
            report.expected_speed_gain()
        );
    }
    Ok(report)
}
