//! # Embedding Models
//!
//! The provider capability the categorizer is written against, plus the
//! ONNX Runtime engine that implements it for CLIP and SigLIP2.

/// Copy the first available named output (or the first output at all) into
/// owned `(shape, data)` vectors.
macro_rules! extract_output {
	($outputs:expr, $names:expr) => {{
		let mut extracted: Option<(Vec<i64>, Vec<f32>)> = None;
		for name in $names.iter() {
			if let Some(value) = $outputs.get(*name) {
				let (shape, data) = value.try_extract_tensor::<f32>()?;
				extracted = Some((shape.to_vec(), data.to_vec()));
				break;
			}
		}
		match extracted {
			Some(found) => found,
			None => {
				crate::ui::debug(&format!("None of {:?} in model outputs, using the first", $names));
				let (_, value) = $outputs.iter().next().context("Model produced no outputs")?;
				let (shape, data) = value.try_extract_tensor::<f32>()?;
				(shape.to_vec(), data.to_vec())
			}
		}
	}};
}

pub mod kind;
pub mod manager;
pub mod provider;
pub mod text;
pub mod vision;

pub use kind::{ModelKind, ModelSpec};
pub use manager::OnnxProvider;
pub use provider::{scaled_similarity, EmbeddingProvider};

use crate::config::ModelPaths;
use crate::error::Result;
use crate::runtime::SessionOptions;

/// Build the engine handle for `kind`. The caller owns it for the whole run.
pub fn create_provider(
	kind: ModelKind,
	paths: ModelPaths,
	session_options: SessionOptions,
) -> Result<Box<dyn EmbeddingProvider>> {
	crate::ui::debug(&format!("Creating {} provider", kind));
	match kind {
		ModelKind::Clip | ModelKind::Siglip2 => Ok(Box::new(OnnxProvider::new(kind, paths, session_options)?)),
	}
}
