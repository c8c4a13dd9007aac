use crate::detector::DetectorOptions;
use crate::error::ConfigError;
use crate::geometry::ImageSize;
use crate::ground_plane::{estimate_corridor, CameraModel, GroundPlane, GroundPlaneCorridor};
use crate::io::read_image_size;
use crate::model::ModelGeometry;
use crate::pyramid::ScalePyramidOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Input resolution, taken from an image header or given explicitly.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InputConfig {
    pub image: Option<PathBuf>,
    pub size: Option<ImageSize>,
}

impl InputConfig {
    /// Explicit `size` wins over `image`.
    pub fn resolve(&self) -> Result<ImageSize, String> {
        match (&self.size, &self.image) {
            (Some(size), _) => Ok(*size),
            (None, Some(path)) => read_image_size(path),
            (None, None) => Err("Config needs either input.size or input.image".to_string()),
        }
    }
}

fn default_object_height() -> f32 {
    1.8
}

#[derive(Clone, Debug, Deserialize)]
pub struct GroundPlaneConfig {
    pub camera: CameraModel,
    pub plane: GroundPlane,
    /// Height of the standard object, in world units.
    #[serde(default = "default_object_height")]
    pub object_height: f32,
}

impl GroundPlaneConfig {
    pub fn corridor(&self, input: ImageSize) -> Result<GroundPlaneCorridor, ConfigError> {
        estimate_corridor(
            &self.camera,
            &self.plane,
            input.width,
            input.height,
            self.object_height,
        )
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub scales_json: Option<PathBuf>,
    pub pruning_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub model: ModelGeometry,
    #[serde(default)]
    pub pyramid: ScalePyramidOptions,
    #[serde(default)]
    pub detector: DetectorOptions,
    #[serde(default)]
    pub ground_plane: Option<GroundPlaneConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
