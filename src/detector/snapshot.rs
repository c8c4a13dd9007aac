//! Immutable per-scale geometry published by the detector.
//!
//! Every rebuild produces a new [`ScaleGeometry`] and the detector swaps its
//! `Arc` only after the consistency check passed, so a reader holding a
//! snapshot never observes a partially rebuilt table.
use super::ordering::scale_indices_by_size;
use super::scaling::ScaleData;
use crate::error::{ConfigError, GeometryFault};
use crate::geometry::{ImageSize, SearchRange};

#[derive(Clone, Debug, PartialEq)]
pub struct ScaleGeometry {
    generation: u64,
    input_size: ImageSize,
    search_ranges: Vec<SearchRange>,
    scales: Vec<ScaleData>,
    corridor_applied: bool,
    build_ms: f64,
}

impl ScaleGeometry {
    pub(crate) fn new(
        generation: u64,
        input_size: ImageSize,
        search_ranges: Vec<SearchRange>,
        scales: Vec<ScaleData>,
        corridor_applied: bool,
        build_ms: f64,
    ) -> Result<Self, GeometryFault> {
        if scales.len() != search_ranges.len() {
            return Err(GeometryFault::TableLengthMismatch {
                scale_data: scales.len(),
                search_ranges: search_ranges.len(),
            });
        }
        Ok(Self {
            generation,
            input_size,
            search_ranges,
            scales,
            corridor_applied,
            build_ms,
        })
    }

    /// Incremented on every successful rebuild of the owning detector.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn input_size(&self) -> ImageSize {
        self.input_size
    }

    /// Search ranges (input pixels) the table was built from, after pruning.
    pub fn search_ranges(&self) -> &[SearchRange] {
        &self.search_ranges
    }

    pub fn scales(&self) -> &[ScaleData] {
        &self.scales
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn corridor_applied(&self) -> bool {
        self.corridor_applied
    }

    pub fn build_ms(&self) -> f64 {
        self.build_ms
    }

    pub fn scale(&self, scale_index: usize) -> Result<&ScaleData, ConfigError> {
        self.scales
            .get(scale_index)
            .ok_or(ConfigError::UnknownScale {
                scale_index,
                num_scales: self.scales.len(),
            })
    }

    /// Scale indices from smallest to largest window.
    pub fn scale_order(&self) -> Vec<usize> {
        scale_indices_by_size(&self.search_ranges)
    }
}
