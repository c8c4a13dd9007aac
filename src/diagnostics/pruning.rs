use serde::Serialize;

/// Vertical band of one scale before and after corridor pruning (input
/// pixels).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePruning {
    pub scale_index: usize,
    pub original_min_y: i32,
    pub original_max_y: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub width: i32,
}

impl ScalePruning {
    pub fn original_height(&self) -> i32 {
        self.original_max_y - self.original_min_y
    }

    pub fn updated_height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Search-space reduction achieved by one corridor update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PruningReport {
    pub scales: Vec<ScalePruning>,
    pub pixels_original: i64,
    pub pixels_updated: i64,
}

impl PruningReport {
    pub fn push(&mut self, scale: ScalePruning) {
        self.pixels_original += scale.original_height() as i64 * scale.width as i64;
        self.pixels_updated += scale.updated_height() as i64 * scale.width as i64;
        self.scales.push(scale);
    }

    /// Ratio of searched positions before and after pruning.
    pub fn expected_speed_gain(&self) -> f64 {
        self.pixels_original as f64 / (self.pixels_updated as f64 + 1.0)
    }
}
