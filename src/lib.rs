//! # pixsort Library
//!
//! Photo auto-categorization with CLIP/SigLIP2 embeddings. Fixed text
//! categories claim images first; whatever is left is grouped by
//! agglomerative clustering into a bounded number of `other` categories.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod jobs;
pub mod models;
pub mod processing;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use error::{Error, Result};
