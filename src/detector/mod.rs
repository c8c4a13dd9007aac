//! Multi-scale search geometry for an integral-channels pedestrian detector.
//!
//! Overview
//! - Each configured scale owns a [`SearchRange`](crate::geometry::SearchRange)
//!   of top-left window positions in input pixels.
//! - The scale table maps every range into the shrunk channel space of its
//!   rescaled image and records the window size and stride used there.
//! - A ground-plane corridor optionally narrows each scale's vertical band to
//!   the rows where an object of that size can stand.
//! - A consistency check guarantees that every window position of every scale
//!   stays inside its channel image before a table is published.
//! - Hits found in channel space are mapped back to original-image boxes.
//!
//! Modules
//! - [`scaling`] – per-scale table construction.
//! - [`corridor`] – ground-plane corridor pruning.
//! - [`consistency`] – channel bounds check.
//! - [`emit`] – channel hits to [`Detection`](crate::types::Detection)s.
//! - [`ordering`] – scale ordering by window size.
//! - [`options`] – runtime options.
//! - `pipeline` – the [`IntegralChannelsDetector`] owning all of the above.
//!
//! Geometry is published as an immutable [`ScaleGeometry`] behind an `Arc`;
//! a failed rebuild leaves the previously published snapshot in place.

pub mod consistency;
pub mod corridor;
pub mod emit;
pub mod options;
pub mod ordering;
mod pipeline;
pub mod scaling;
mod snapshot;

pub use consistency::{ConsistencyCheck, WindowAnchor, MAX_BORDER_MARGIN};
pub use corridor::{best_matching_row, prune_search_ranges, MAX_REASONABLE_EXTENT};
pub use emit::{add_detection, add_detection_for_bootstrapping};
pub use options::DetectorOptions;
pub use ordering::{scale_indices_by_size, SearchRangeScaleComparator};
pub use pipeline::IntegralChannelsDetector;
pub use scaling::{build_scale_table, ScaleData, ScaleTemplate};
pub use snapshot::ScaleGeometry;
