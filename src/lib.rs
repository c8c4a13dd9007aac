#![doc = include_str!("../README.md")]

// Public modules
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod ground_plane;
pub mod model;
pub mod pyramid;
pub mod types;

// Tooling support for the demo binary.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

pub use crate::detector::{DetectorOptions, IntegralChannelsDetector, ScaleData, ScaleGeometry};
pub use crate::error::{ConfigError, DetectorError, GeometryFault};
pub use crate::geometry::{BoundingBox, DetectionWindowSize, ImageSize, SearchRange, Stride};
pub use crate::ground_plane::GroundPlaneCorridor;
pub use crate::model::{CascadeModel, ModelGeometry};
pub use crate::types::{Detection, Stixel};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pedestrian_detector::prelude::*;
///
/// # fn main() -> Result<(), pedestrian_detector::DetectorError> {
/// let detector = IntegralChannelsDetector::new(
///     ModelGeometry::default(),
///     DetectorOptions::default(),
///     ImageSize::new(640, 480),
///     vec![SearchRange::new(1.0, 1.0, 0, 0, 576, 352)],
/// )?;
/// let geometry = detector.geometry();
/// println!("generation={} scales={}", geometry.generation(), geometry.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::detector::{DetectorOptions, IntegralChannelsDetector, WindowAnchor};
    pub use crate::geometry::{ImageSize, SearchRange};
    pub use crate::model::ModelGeometry;
    pub use crate::pyramid::ScalePyramidOptions;
    pub use crate::types::Detection;
}
