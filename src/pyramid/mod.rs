//! Base search ranges for a logarithmic scale/ratio pyramid.
//!
//! For every (scale, ratio) pair the input is conceptually resized by
//! `1/scale` (and `1/ratio` horizontally) and shrunk into channel space. The
//! search range is the set of top-left window positions, in input pixels,
//! such that the nominal window stays inside that channel image. Ranges are
//! computed in channel pixels first and mapped back by flooring, so the scale
//! table built from them always passes the consistency check.
//!
//! Scales whose window does not fit get a null range rather than being
//! dropped; scale indices stay stable across resolutions.

mod options;

pub use options::ScalePyramidOptions;

use crate::detector::scaling::{scaled_input_size, ScaleTemplate};
use crate::error::ConfigError;
use crate::geometry::{DetectionWindowSize, ImageSize, SearchRange};
use log::debug;

/// Search ranges for every (scale, ratio) pair, scales outermost.
pub fn build_search_ranges(
    options: &ScalePyramidOptions,
    input: ImageSize,
    model_window: DetectionWindowSize,
    shrinking_factor: u32,
    border: i32,
) -> Result<Vec<SearchRange>, ConfigError> {
    options.validate()?;
    if !model_window.is_positive() {
        return Err(ConfigError::InvalidWindow {
            width: model_window.width,
            height: model_window.height,
        });
    }
    if shrinking_factor == 0 {
        return Err(ConfigError::InvalidShrinkingFactor);
    }
    if input.width == 0 || input.height == 0 {
        return Err(ConfigError::InvalidInputSize {
            width: input.width,
            height: input.height,
        });
    }

    let border = border.max(0);
    let channel_window = ScaleTemplate::new(model_window).channel_window_size(shrinking_factor);
    let ratios = options.ratios();
    let mut ranges = Vec::with_capacity(options.num_scales * ratios.len());
    for scale in options.scales() {
        for &ratio in &ratios {
            let range = search_range_for(
                input,
                scale,
                ratio,
                channel_window,
                shrinking_factor,
                border,
            );
            if range.is_null() {
                debug!(
                    "scale {:.3} ratio {:.3}: window does not fit a {}x{} input",
                    scale, ratio, input.width, input.height
                );
            }
            ranges.push(range);
        }
    }
    Ok(ranges)
}

fn search_range_for(
    input: ImageSize,
    scale: f32,
    ratio: f32,
    channel_window: DetectionWindowSize,
    shrinking_factor: u32,
    border: i32,
) -> SearchRange {
    let channel = scaled_input_size(input, scale, ratio).shrunk(shrinking_factor);
    let free_x = channel.width as i32 - channel_window.width;
    let free_y = channel.height as i32 - channel_window.height;
    if free_x < 0 || free_y < 0 {
        return SearchRange::null(scale, ratio);
    }

    let channel_to_input_y = scale * shrinking_factor as f32;
    let channel_to_input_x = channel_to_input_y * ratio;
    let max_x = (free_x as f32 * channel_to_input_x).floor() as i32 - border;
    let max_y = (free_y as f32 * channel_to_input_y).floor() as i32 - border;
    if max_x < border || max_y < border {
        return SearchRange::null(scale, ratio);
    }
    SearchRange::new(scale, ratio, border, border, max_x, max_y)
}
