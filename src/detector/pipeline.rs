//! Detector state driving the scale table lifecycle.
//!
//! The [`IntegralChannelsDetector`] owns the configured search ranges, the
//! per-scale cascades and the published [`ScaleGeometry`]. The geometry is
//! rebuilt as a whole when the detector is created, when the input
//! resolution changes and when a ground-plane corridor is set or cleared.
//!
//! Typical usage:
//! ```no_run
//! use pedestrian_detector::prelude::*;
//!
//! # fn example(corridor: Vec<i32>) -> Result<(), pedestrian_detector::DetectorError> {
//! let mut detector = IntegralChannelsDetector::from_pyramid(
//!     ModelGeometry::default(),
//!     DetectorOptions::default(),
//!     ImageSize::new(640, 480),
//!     ScalePyramidOptions::default(),
//! )?;
//! detector.set_ground_plane_corridor(&corridor)?;
//! let geometry = detector.geometry();
//! println!("{} scales, generation {}", geometry.len(), geometry.generation());
//! # Ok(())
//! # }
//! ```
use super::consistency::ConsistencyCheck;
use super::corridor::prune_search_ranges;
use super::emit;
use super::options::DetectorOptions;
use super::scaling::{build_scale_table, ScaleTemplate};
use super::snapshot::ScaleGeometry;
use crate::diagnostics::{DiagnosticsLatch, PruningReport, WarningBudget};
use crate::error::{ConfigError, DetectorError, GeometryFault};
use crate::geometry::{ImageSize, SearchRange};
use crate::ground_plane::GroundPlaneCorridor;
use crate::model::{CascadeModel, ObjectWindowConverter, INTEGRAL_CHANNELS_SHRINKING_FACTOR};
use crate::pyramid::{build_search_ranges, ScalePyramidOptions};
use crate::types::{Detection, Stixel};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Where the base search ranges come from when the resolution changes.
#[derive(Clone, Debug)]
enum RangeSource {
    Fixed(Vec<SearchRange>),
    Pyramid(ScalePyramidOptions),
}

/// Multi-scale search geometry for a soft cascade over integral channels.
pub struct IntegralChannelsDetector<M: CascadeModel> {
    model: M,
    options: DetectorOptions,
    range_source: RangeSource,
    base_ranges: Vec<SearchRange>,
    templates: Vec<ScaleTemplate>,
    cascades: Vec<M::Stages>,
    use_soft_cascade: bool,
    object_window: ObjectWindowConverter,
    corridor: Option<GroundPlaneCorridor>,
    stixels: Option<Vec<Stixel>>,
    geometry: Arc<ScaleGeometry>,
    last_pruning: Option<PruningReport>,
    latch: DiagnosticsLatch,
    margin_warnings: WarningBudget,
}

impl<M: CascadeModel> IntegralChannelsDetector<M> {
    /// Detector over explicitly configured search ranges (input pixels).
    pub fn new(
        model: M,
        options: DetectorOptions,
        input_size: ImageSize,
        search_ranges: Vec<SearchRange>,
    ) -> Result<Self, DetectorError> {
        Self::build(model, options, input_size, RangeSource::Fixed(search_ranges))
    }

    /// Detector whose search ranges follow a scale pyramid and are
    /// regenerated on every resolution change.
    pub fn from_pyramid(
        model: M,
        options: DetectorOptions,
        input_size: ImageSize,
        pyramid: ScalePyramidOptions,
    ) -> Result<Self, DetectorError> {
        Self::build(model, options, input_size, RangeSource::Pyramid(pyramid))
    }

    fn build(
        model: M,
        options: DetectorOptions,
        input_size: ImageSize,
        range_source: RangeSource,
    ) -> Result<Self, DetectorError> {
        if model.shrinking_factor() != INTEGRAL_CHANNELS_SHRINKING_FACTOR {
            return Err(ConfigError::ShrinkingFactorMismatch {
                model: model.shrinking_factor(),
                channels: INTEGRAL_CHANNELS_SHRINKING_FACTOR,
            }
            .into());
        }
        options.validate()?;
        let object_window = ObjectWindowConverter::from_model(&model)?;
        let base_ranges = resolve_ranges(&range_source, &model, &options, input_size)?;

        let use_soft_cascade = !options.ignore_soft_cascade && model.has_soft_cascade();
        if use_soft_cascade {
            info!("will use the model soft cascade at run time");
        } else {
            info!("will not use a soft cascade at run time");
        }

        // images are rescaled, not the features: every scale runs the model
        // at relative scale one
        let relative_scale = 1.0f32;
        let num_scales = base_ranges.len();
        let templates = vec![
            ScaleTemplate {
                window_size: model.model_window_size(),
                relative_scale,
            };
            num_scales
        ];
        let cascades = (0..num_scales)
            .map(|_| model.rescaled_stages(relative_scale))
            .collect();

        let mut detector = Self {
            model,
            options,
            range_source,
            base_ranges: Vec::new(),
            templates,
            cascades,
            use_soft_cascade,
            object_window,
            corridor: None,
            stixels: None,
            geometry: Arc::new(ScaleGeometry::new(0, input_size, Vec::new(), Vec::new(), false, 0.0)?),
            last_pruning: None,
            latch: DiagnosticsLatch::new(),
            margin_warnings: WarningBudget::new(2 * num_scales),
        };
        detector.rebuild(input_size, base_ranges, None)?;
        Ok(detector)
    }

    /// Rebuilds the geometry for a new input resolution.
    ///
    /// Pyramid-based detectors regenerate their search ranges. A corridor or
    /// stixels that no longer match the new size are dropped.
    pub fn set_input_size(&mut self, input_size: ImageSize) -> Result<(), DetectorError> {
        if input_size == self.geometry.input_size() {
            return Ok(());
        }
        let base_ranges = resolve_ranges(&self.range_source, &self.model, &self.options, input_size)?;
        if base_ranges.len() != self.templates.len() {
            return Err(ConfigError::PerScaleLength {
                what: "search ranges",
                expected: self.templates.len(),
                actual: base_ranges.len(),
            }
            .into());
        }

        let corridor = self
            .corridor
            .clone()
            .filter(|c| c.len() == self.expected_corridor_len(input_size));
        if self.corridor.is_some() && corridor.is_none() {
            debug!(
                "input size changed to {}x{}, dropping the ground plane corridor",
                input_size.width, input_size.height
            );
        }
        self.rebuild(input_size, base_ranges, corridor)?;

        let expected_stixels = self.expected_stixels_len(input_size);
        if self.stixels.as_ref().is_some_and(|s| s.len() != expected_stixels) {
            debug!("input size changed, dropping stixels");
            self.stixels = None;
        }
        Ok(())
    }

    /// Stores a copy of `corridor` and prunes every scale's vertical band.
    ///
    /// `corridor` holds one object-top row per foot row, negative above the
    /// horizon, and must cover the input height minus twice the border.
    /// Non-negative entries must lie above their foot row.
    pub fn set_ground_plane_corridor(&mut self, corridor: &[i32]) -> Result<(), DetectorError> {
        let input_size = self.geometry.input_size();
        let expected = self.expected_corridor_len(input_size);
        if corridor.len() != expected {
            return Err(ConfigError::CorridorLength {
                expected,
                actual: corridor.len(),
            }
            .into());
        }
        if self.options.border() != 0 {
            return Err(ConfigError::BorderWithCorridor {
                border: self.options.border(),
            }
            .into());
        }
        if let Some((row, &top)) = corridor
            .iter()
            .enumerate()
            .find(|&(row, &top)| top >= 0 && top as usize >= row)
        {
            return Err(ConfigError::InvalidCorridorEntry { row, top }.into());
        }
        let corridor = GroundPlaneCorridor::new(corridor.to_vec());
        self.rebuild(input_size, self.base_ranges.clone(), Some(corridor))?;
        Ok(())
    }

    /// Restores the unpruned search ranges.
    pub fn clear_ground_plane_corridor(&mut self) -> Result<(), DetectorError> {
        if self.corridor.is_none() {
            return Ok(());
        }
        let input_size = self.geometry.input_size();
        self.rebuild(input_size, self.base_ranges.clone(), None)?;
        Ok(())
    }

    /// Stores a copy of one stixel per column (input width minus twice the
    /// border).
    pub fn set_stixels(&mut self, stixels: &[Stixel]) -> Result<(), ConfigError> {
        let expected = self.expected_stixels_len(self.geometry.input_size());
        if stixels.len() != expected {
            return Err(ConfigError::StixelsLength {
                expected,
                actual: stixels.len(),
            });
        }
        self.stixels = Some(stixels.to_vec());
        Ok(())
    }

    pub fn stixels(&self) -> Option<&[Stixel]> {
        self.stixels.as_deref()
    }

    pub fn ground_plane_corridor(&self) -> Option<&GroundPlaneCorridor> {
        self.corridor.as_ref()
    }

    /// Current scale geometry; stays valid after later rebuilds.
    pub fn geometry(&self) -> Arc<ScaleGeometry> {
        Arc::clone(&self.geometry)
    }

    /// Search ranges as configured, before any corridor pruning.
    pub fn base_search_ranges(&self) -> &[SearchRange] {
        &self.base_ranges
    }

    /// Pruning summary of the corridor currently applied.
    pub fn last_pruning(&self) -> Option<&PruningReport> {
        self.last_pruning.as_ref()
    }

    pub fn num_scales(&self) -> usize {
        self.templates.len()
    }

    pub fn scale_templates(&self) -> &[ScaleTemplate] {
        &self.templates
    }

    pub fn cascade(&self, scale_index: usize) -> Option<&M::Stages> {
        self.cascades.get(scale_index)
    }

    pub fn uses_soft_cascade(&self) -> bool {
        self.use_soft_cascade
    }

    pub fn score_threshold(&self) -> f32 {
        self.options.score_threshold
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn object_window_converter(&self) -> &ObjectWindowConverter {
        &self.object_window
    }

    /// Scale indices from smallest to largest window.
    pub fn scale_order(&self) -> Vec<usize> {
        self.geometry.scale_order()
    }

    /// Scales to evaluate around the one whose window height best matches
    /// `object_height` (input pixels): the best match itself plus up to
    /// `stixels_scales_margin` scales on each side in ascending size order,
    /// so at most `2 * margin + 1` scales. Every scale when the margin is not
    /// positive.
    pub fn scale_neighbourhood(&self, object_height: i32) -> Vec<usize> {
        let order = self.geometry.scale_order();
        let margin = self.options.stixels_scales_margin;
        if margin <= 0 || order.is_empty() {
            return order;
        }
        let scales = self.geometry.scales();
        let best = order
            .iter()
            .enumerate()
            .min_by_key(|(_, &i)| (scales[i].scaled_detection_window_size.height - object_height).abs())
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        let margin = margin as usize;
        let lo = best.saturating_sub(margin);
        let hi = (best + margin).min(order.len() - 1);
        order[lo..=hi].to_vec()
    }

    /// [`Self::scale_neighbourhood`] for the stixel at `column`, if stixels
    /// are set.
    pub fn scales_for_stixel(&self, column: usize) -> Option<Vec<usize>> {
        let stixel = self.stixels.as_ref()?.get(column)?;
        Some(self.scale_neighbourhood(stixel.height()))
    }

    /// Maps a hit at channel (`col`, `row`) of `scale_index` to an
    /// original-image detection.
    pub fn add_detection(
        &self,
        scale_index: usize,
        col: u16,
        row: u16,
        score: f32,
        detections: &mut Vec<Detection>,
    ) -> Result<(), ConfigError> {
        let scale = self.geometry.scale(scale_index)?;
        emit::add_detection(col, row, score, scale, detections);
        Ok(())
    }

    /// Bootstrapping variant reporting boxes in shrunk channel space.
    pub fn add_detection_for_bootstrapping(
        &self,
        col: u16,
        row: u16,
        score: f32,
        detections: &mut Vec<Detection>,
    ) {
        emit::add_detection_for_bootstrapping(
            col,
            row,
            score,
            self.model.model_window_size(),
            self.model.shrinking_factor(),
            detections,
        );
    }

    fn expected_corridor_len(&self, input_size: ImageSize) -> usize {
        input_size
            .height
            .saturating_sub(2 * self.options.border() as usize)
    }

    fn expected_stixels_len(&self, input_size: ImageSize) -> usize {
        input_size
            .width
            .saturating_sub(2 * self.options.border() as usize)
    }

    /// Computes a complete geometry and publishes it together with its inputs
    /// only if every step succeeded.
    fn rebuild(
        &mut self,
        input_size: ImageSize,
        base_ranges: Vec<SearchRange>,
        corridor: Option<GroundPlaneCorridor>,
    ) -> Result<(), GeometryFault> {
        let start = Instant::now();
        let shrinking_factor = self.model.shrinking_factor();
        let stride = self.options.stride();

        let base_table = build_scale_table(
            input_size,
            &base_ranges,
            &self.templates,
            stride,
            shrinking_factor,
            self.latch.first_scale_table(),
        )?;

        let (ranges, table, pruning) = match &corridor {
            None => (base_ranges.clone(), base_table, None),
            Some(corridor) => {
                let mut ranges = base_ranges.clone();
                let report = prune_search_ranges(
                    corridor.rows(),
                    self.options.stixels_vertical_margin,
                    &base_table,
                    &mut ranges,
                    self.latch.first_corridor(),
                )?;
                let table = build_scale_table(
                    input_size,
                    &ranges,
                    &self.templates,
                    stride,
                    shrinking_factor,
                    false,
                )?;
                (ranges, table, Some(report))
            }
        };

        ConsistencyCheck {
            search_ranges: &ranges,
            templates: &self.templates,
            shrinking_factor,
            anchor: self.options.window_anchor,
            corridor_in_use: corridor.is_some(),
        }
        .run(&table, &mut self.margin_warnings)?;

        let build_ms = start.elapsed().as_secs_f64() * 1000.0;
        let geometry = ScaleGeometry::new(
            self.geometry.generation() + 1,
            input_size,
            ranges,
            table,
            corridor.is_some(),
            build_ms,
        )?;
        debug!(
            "scale geometry generation {} built for {}x{} ({} scales, corridor {}) in {:.3} ms",
            geometry.generation(),
            input_size.width,
            input_size.height,
            geometry.len(),
            corridor.is_some(),
            build_ms
        );

        self.geometry = Arc::new(geometry);
        self.base_ranges = base_ranges;
        self.corridor = corridor;
        self.last_pruning = pruning;
        Ok(())
    }
}

fn resolve_ranges<M: CascadeModel>(
    source: &RangeSource,
    model: &M,
    options: &DetectorOptions,
    input_size: ImageSize,
) -> Result<Vec<SearchRange>, ConfigError> {
    if input_size.width == 0 || input_size.height == 0 {
        return Err(ConfigError::InvalidInputSize {
            width: input_size.width,
            height: input_size.height,
        });
    }
    let ranges = match source {
        RangeSource::Fixed(ranges) => ranges.clone(),
        RangeSource::Pyramid(pyramid) => build_search_ranges(
            pyramid,
            input_size,
            model.model_window_size(),
            model.shrinking_factor(),
            options.border(),
        )?,
    };
    validate_ranges(&ranges)?;
    Ok(ranges)
}

fn validate_ranges(ranges: &[SearchRange]) -> Result<(), ConfigError> {
    if ranges.is_empty() {
        return Err(ConfigError::NoScales);
    }
    for (scale_index, range) in ranges.iter().enumerate() {
        let scale = range.detection_window_scale;
        let ratio = range.detection_window_ratio;
        if !(scale.is_finite() && scale > 0.0 && ratio.is_finite() && ratio > 0.0) {
            return Err(ConfigError::InvalidScale {
                scale_index,
                scale,
                ratio,
            });
        }
    }
    Ok(())
}
