//! Cascade model seam.
//!
//! The soft-cascade classifier is consumed opaquely: the detector only reads
//! its shrinking factor, nominal windows and soft-cascade flag, and asks for
//! one rescaled stage sequence per scale. [`ModelGeometry`] is a stage-less
//! implementation used by tools and tests that only need the geometry.
use crate::error::ConfigError;
use crate::geometry::{iround, BoundingBox, DetectionWindowSize};
use crate::types::Detection;
use serde::Deserialize;

/// Downsampling between input pixels and integral channel pixels used by the
/// channel computer this detector runs against.
pub const INTEGRAL_CHANNELS_SHRINKING_FACTOR: u32 = 4;

pub trait CascadeModel {
    /// Stage sequence evaluated by the classifier loop.
    type Stages: Clone;

    fn shrinking_factor(&self) -> u32;

    /// Window the cascade was trained on, in input pixels.
    fn model_window_size(&self) -> DetectionWindowSize;

    /// Object extent inside the model window.
    fn object_window(&self) -> BoundingBox;

    fn has_soft_cascade(&self) -> bool;

    /// Stages rescaled by `relative_scale` with respect to the model window.
    fn rescaled_stages(&self, relative_scale: f32) -> Self::Stages;
}

/// Geometry-only model description.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelGeometry {
    pub shrinking_factor: u32,
    pub model_window: DetectionWindowSize,
    pub object_window: BoundingBox,
    pub soft_cascade: bool,
}

impl Default for ModelGeometry {
    fn default() -> Self {
        Self {
            shrinking_factor: INTEGRAL_CHANNELS_SHRINKING_FACTOR,
            model_window: DetectionWindowSize::new(64, 128),
            object_window: BoundingBox::new(8, 16, 56, 112),
            soft_cascade: true,
        }
    }
}

impl CascadeModel for ModelGeometry {
    type Stages = ();

    fn shrinking_factor(&self) -> u32 {
        self.shrinking_factor
    }

    fn model_window_size(&self) -> DetectionWindowSize {
        self.model_window
    }

    fn object_window(&self) -> BoundingBox {
        self.object_window
    }

    fn has_soft_cascade(&self) -> bool {
        self.soft_cascade
    }

    fn rescaled_stages(&self, _relative_scale: f32) -> Self::Stages {}
}

/// Maps detections sized for the model window onto the object window it
/// contains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectWindowConverter {
    offset_x: f32,
    offset_y: f32,
    end_x: f32,
    end_y: f32,
}

impl ObjectWindowConverter {
    pub fn new(
        model_window: DetectionWindowSize,
        object_window: BoundingBox,
    ) -> Result<Self, ConfigError> {
        if !model_window.is_positive() {
            return Err(ConfigError::InvalidWindow {
                width: model_window.width,
                height: model_window.height,
            });
        }
        if object_window.width() <= 0 || object_window.height() <= 0 {
            return Err(ConfigError::InvalidWindow {
                width: object_window.width(),
                height: object_window.height(),
            });
        }
        let w = model_window.width as f32;
        let h = model_window.height as f32;
        Ok(Self {
            offset_x: object_window.min_x as f32 / w,
            offset_y: object_window.min_y as f32 / h,
            end_x: object_window.max_x as f32 / w,
            end_y: object_window.max_y as f32 / h,
        })
    }

    pub fn from_model<M: CascadeModel>(model: &M) -> Result<Self, ConfigError> {
        Self::new(model.model_window_size(), model.object_window())
    }

    pub fn convert(&self, detection: &Detection) -> Detection {
        let b = detection.bounding_box;
        let w = b.width() as f32;
        let h = b.height() as f32;
        let min_x = b.min_x + iround(self.offset_x * w);
        let min_y = b.min_y + iround(self.offset_y * h);
        let max_x = (b.min_x + iround(self.end_x * w)).max(min_x + 1);
        let max_y = (b.min_y + iround(self.end_y * h)).max(min_y + 1);
        Detection {
            bounding_box: BoundingBox::new(min_x, min_y, max_x, max_y),
            ..detection.clone()
        }
    }

    pub fn convert_all(&self, detections: &mut [Detection]) {
        for det in detections.iter_mut() {
            *det = self.convert(det);
        }
    }
}
