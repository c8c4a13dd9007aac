use crate::geometry::SearchRange;
use std::cmp::Ordering;

/// Orders scale indices by ascending nominal window scale.
#[derive(Clone, Copy)]
pub struct SearchRangeScaleComparator<'a> {
    search_ranges: &'a [SearchRange],
}

impl<'a> SearchRangeScaleComparator<'a> {
    pub fn new(search_ranges: &'a [SearchRange]) -> Self {
        Self { search_ranges }
    }

    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        let sa = self.search_ranges[a].detection_window_scale;
        let sb = self.search_ranges[b].detection_window_scale;
        sa.total_cmp(&sb)
    }
}

/// Scale indices from smallest to largest window; equal scales keep their
/// configured order.
pub fn scale_indices_by_size(search_ranges: &[SearchRange]) -> Vec<usize> {
    let comparator = SearchRangeScaleComparator::new(search_ranges);
    let mut indices: Vec<usize> = (0..search_ranges.len()).collect();
    indices.sort_by(|&a, &b| comparator.compare(a, b));
    indices
}
