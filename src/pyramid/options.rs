use crate::error::ConfigError;
use serde::Deserialize;

/// Logarithmic pyramid of detection-window scales and aspect ratios.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScalePyramidOptions {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Number of scales (>= 1).
    pub num_scales: usize,
    pub min_ratio: f32,
    pub max_ratio: f32,
    /// Number of ratios per scale (>= 1).
    pub num_ratios: usize,
}

impl Default for ScalePyramidOptions {
    fn default() -> Self {
        Self {
            min_scale: 0.6,
            max_scale: 8.6,
            num_scales: 55,
            min_ratio: 1.0,
            max_ratio: 1.0,
            num_ratios: 1,
        }
    }
}

impl ScalePyramidOptions {
    pub fn new(min_scale: f32, max_scale: f32, num_scales: usize) -> Self {
        Self {
            min_scale,
            max_scale,
            num_scales,
            ..Default::default()
        }
    }

    pub fn with_ratios(mut self, min_ratio: f32, max_ratio: f32, num_ratios: usize) -> Self {
        self.min_ratio = min_ratio;
        self.max_ratio = max_ratio;
        self.num_ratios = num_ratios;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.min_scale) || !positive(self.max_scale) {
            return Err(ConfigError::InvalidPyramid {
                reason: "scales must be finite and positive",
            });
        }
        if self.max_scale < self.min_scale {
            return Err(ConfigError::InvalidPyramid {
                reason: "max_scale is below min_scale",
            });
        }
        if !positive(self.min_ratio) || !positive(self.max_ratio) {
            return Err(ConfigError::InvalidPyramid {
                reason: "ratios must be finite and positive",
            });
        }
        if self.max_ratio < self.min_ratio {
            return Err(ConfigError::InvalidPyramid {
                reason: "max_ratio is below min_ratio",
            });
        }
        if self.num_scales == 0 || self.num_ratios == 0 {
            return Err(ConfigError::InvalidPyramid {
                reason: "at least one scale and one ratio are required",
            });
        }
        Ok(())
    }

    pub fn scales(&self) -> Vec<f32> {
        log_space(self.min_scale, self.max_scale, self.num_scales)
    }

    pub fn ratios(&self) -> Vec<f32> {
        log_space(self.min_ratio, self.max_ratio, self.num_ratios)
    }
}

/// `n` values evenly spaced in log space, endpoints exact.
fn log_space(min: f32, max: f32, n: usize) -> Vec<f32> {
    if n <= 1 || min == max {
        return vec![min];
    }
    let (lmin, lmax) = (min.ln(), max.ln());
    let last = n - 1;
    (0..n)
        .map(|i| match i {
            0 => min,
            i if i == last => max,
            i => (lmin + (lmax - lmin) * i as f32 / last as f32).exp(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_are_geometric() {
        let opts = ScalePyramidOptions::new(0.5, 4.0, 4);
        let scales = opts.scales();
        assert_eq!(scales.len(), 4);
        assert_eq!(scales[0], 0.5);
        assert_eq!(scales[3], 4.0);
        assert!((scales[1] - 1.0).abs() < 1e-5);
        assert!((scales[2] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn single_scale_and_equal_bounds_collapse() {
        assert_eq!(ScalePyramidOptions::new(1.0, 3.0, 1).scales(), vec![1.0]);
        assert_eq!(ScalePyramidOptions::new(2.0, 2.0, 7).scales(), vec![2.0]);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(ScalePyramidOptions::new(0.0, 1.0, 3).validate().is_err());
        assert!(ScalePyramidOptions::new(2.0, 1.0, 3).validate().is_err());
        assert!(ScalePyramidOptions::new(1.0, 2.0, 0).validate().is_err());
        assert!(ScalePyramidOptions::new(1.0, 2.0, 3)
            .with_ratios(1.2, 0.8, 2)
            .validate()
            .is_err());
        assert!(ScalePyramidOptions::default().validate().is_ok());
    }
}
