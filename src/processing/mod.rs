//! Categorization pipeline: load, score, cluster, apply

pub mod apply;
pub mod categorize;
pub mod cluster;
pub mod filter;
pub mod load;

pub use apply::{copy_into_folders, ApplySummary};
pub use categorize::Categorizer;
pub use cluster::ResidualClusterer;
pub use filter::{above_threshold, filter_by_prompt};
pub use load::{load_working_set, scan_folder, LoadOptions};
