//! Sanity checks run after every scale table rebuild.
//!
//! For each non-null scale the channel-space search range plus the channel
//! window must fit inside the scaled input shrunk to channel pixels. Overflow
//! on either axis means out-of-bounds channel reads downstream and is fatal.
//! A large vertical gap between the last window and the image border is only
//! suspicious; it is reported through a bounded [`WarningBudget`] and skipped
//! while a ground-plane corridor is in use.
use super::scaling::{ScaleData, ScaleTemplate};
use crate::diagnostics::WarningBudget;
use crate::error::GeometryFault;
use crate::geometry::{Axis, SearchRange};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Largest tolerated gap (channel pixels) between the far window edge and
/// the image border before a warning is logged.
pub const MAX_BORDER_MARGIN: i32 = 10;

/// Where a search-range position sits relative to the evaluated window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// Positions are the window's top-left corner.
    #[default]
    TopLeft,
    /// Positions are the window centre; the bounds check does not apply.
    Centered,
}

pub struct ConsistencyCheck<'a> {
    pub search_ranges: &'a [SearchRange],
    pub templates: &'a [ScaleTemplate],
    pub shrinking_factor: u32,
    pub anchor: WindowAnchor,
    pub corridor_in_use: bool,
}

impl ConsistencyCheck<'_> {
    pub fn run(
        &self,
        table: &[ScaleData],
        warnings: &mut WarningBudget,
    ) -> Result<(), GeometryFault> {
        if self.anchor == WindowAnchor::Centered {
            debug!("consistency check skipped for centered detection windows");
            return Ok(());
        }
        if table.len() != self.search_ranges.len() || self.templates.len() != table.len() {
            return Err(GeometryFault::TableLengthMismatch {
                scale_data: table.len(),
                search_ranges: self.search_ranges.len(),
            });
        }

        for (scale_index, (data, template)) in table.iter().zip(self.templates).enumerate() {
            let range = &data.scaled_search_range;
            if range.is_null() {
                continue;
            }
            let channel_size = data.channel_image_size(self.shrinking_factor);
            let window = template.channel_window_size(self.shrinking_factor);
            let scale = self.search_ranges[scale_index].detection_window_scale;

            let required_y = range.max_y + window.height;
            let available_y = channel_size.height as i32;
            if available_y < required_y {
                return Err(GeometryFault::WindowOverflow {
                    scale_index,
                    scale,
                    axis: Axis::Y,
                    required: required_y,
                    available: available_y,
                });
            }
            let required_x = range.max_x + window.width;
            let available_x = channel_size.width as i32;
            if available_x < required_x {
                return Err(GeometryFault::WindowOverflow {
                    scale_index,
                    scale,
                    axis: Axis::X,
                    required: required_x,
                    available: available_x,
                });
            }

            let delta_y = available_y - required_y;
            if !self.corridor_in_use && delta_y > MAX_BORDER_MARGIN && warnings.try_take() {
                warn!(
                    "scale {} ({:.3}): y-margin between search range + window and the image border is suspiciously large ({} channel pixels)",
                    scale_index, scale, delta_y
                );
            }
        }
        Ok(())
    }
}
