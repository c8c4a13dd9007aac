//! Diagnostics data model exposed by the detector and the demo tool.
//!
//! Report structures serialize to camelCase JSON. The latch and warning
//! budget keep one-time and rate-limited log output per detector instance.

mod latch;
mod pruning;
mod scales;

pub use latch::{DiagnosticsLatch, WarningBudget};
pub use pruning::{PruningReport, ScalePruning};
pub use scales::{ScaleReport, ScaleTableReport};
