//! JSON configuration for the command-line tools.

pub mod scale_table;
pub use scale_table::{load_config, RuntimeConfig};
