//! Error kinds reported by the detector.
//!
//! [`ConfigError`] covers precondition failures that are reported before any
//! table is (re)built. [`GeometryFault`] covers data-dependent inconsistencies
//! found while rebuilding; each carries the offending scale and bounds. A
//! failing rebuild never replaces the published scale geometry.
use crate::geometry::Axis;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "model shrinking factor {model} differs from the integral channels shrinking factor {channels}"
    )]
    ShrinkingFactorMismatch { model: u32, channels: u32 },
    #[error("shrinking factor must be at least 1")]
    InvalidShrinkingFactor,
    #[error(
        "ground plane corridor has {actual} rows, expected {expected} (input height minus twice the border)"
    )]
    CorridorLength { expected: usize, actual: usize },
    #[error("ground plane corridor row {row} puts the object top at {top}, not above the foot row")]
    InvalidCorridorEntry { row: usize, top: i32 },
    #[error("stixels cover {actual} columns, expected {expected} (input width minus twice the border)")]
    StixelsLength { expected: usize, actual: usize },
    #[error("search range pruning with a ground plane corridor and additional border {border} is not implemented")]
    BorderWithCorridor { border: i32 },
    #[error("no detection scales configured")]
    NoScales,
    #[error("scale {scale_index}: invalid window scale {scale} / ratio {ratio}")]
    InvalidScale {
        scale_index: usize,
        scale: f32,
        ratio: f32,
    },
    #[error("detection window must be positive, got {width}x{height}")]
    InvalidWindow { width: i32, height: i32 },
    #[error("stride must be positive, got ({x}, {y})")]
    InvalidStride { x: i32, y: i32 },
    #[error("input image must be non-empty, got {width}x{height}")]
    InvalidInputSize { width: usize, height: usize },
    #[error("camera intrinsics are not invertible")]
    SingularIntrinsics,
    #[error("ground plane normal must be non-zero")]
    DegenerateGroundPlane,
    #[error("object height must be positive, got {height}")]
    InvalidObjectHeight { height: f32 },
    #[error("invalid scale pyramid: {reason}")]
    InvalidPyramid { reason: &'static str },
    #[error("{what} has {actual} entries, expected one per scale ({expected})")]
    PerScaleLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("scale index {scale_index} out of range ({num_scales} scales)")]
    UnknownScale {
        scale_index: usize,
        num_scales: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryFault {
    #[error(
        "scale {scale_index}: pruned search range still empty after fallback (min_y {min_y} > max_y {max_y})"
    )]
    EmptyRange {
        scale_index: usize,
        min_y: i32,
        max_y: i32,
    },
    #[error("scale {scale_index}: search range {axis} extent {extent} exceeds {limit} pixels")]
    UnreasonableExtent {
        scale_index: usize,
        axis: Axis,
        extent: i32,
        limit: i32,
    },
    #[error(
        "scale {scale_index} (scale {scale:.3}): search range + window needs {required} channel pixels on {axis}, only {available} available"
    )]
    WindowOverflow {
        scale_index: usize,
        scale: f32,
        axis: Axis,
        required: i32,
        available: i32,
    },
    #[error("scale table has {scale_data} entries but there are {search_ranges} search ranges")]
    TableLengthMismatch {
        scale_data: usize,
        search_ranges: usize,
    },
}

/// Either kind of failure, for entry points that can hit both.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geometry(#[from] GeometryFault),
}
