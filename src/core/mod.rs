//! Core domain types

pub mod category;
pub mod cluster;
pub mod embedding;
pub mod hash;
pub mod working_set;

pub use category::{CategorizationResult, Category, CategoryLabel};
pub use cluster::Cluster;
pub use embedding::Embedding;
pub use hash::FileHash;
pub use working_set::{ImageEmbedding, WorkingSet};
