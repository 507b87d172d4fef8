//! Embedding provider capability

use std::path::Path;

use ndarray::{Array2, ArrayView1};

use crate::core::{Embedding, WorkingSet};
use crate::error::{Error, Result};
use crate::processing::load::{load_working_set, LoadOptions};

/// Anything that can embed images and prompts into one joint space.
///
/// Implementations must be deterministic for identical inputs and keep a fixed
/// vector dimensionality for their lifetime. Providers are `Send` so a job can
/// take one onto its worker thread.
pub trait EmbeddingProvider: Send {
	/// Stable identifier, recorded in cached embeddings
	fn model_id(&self) -> &str;

	fn embed_image(&mut self, path: &Path) -> Result<Embedding>;

	fn embed_text(&mut self, prompt: &str) -> Result<Embedding>;

	/// One score per image vector, in input order
	fn similarity(&self, images: &[&Embedding], text: &Embedding) -> Result<Vec<f32>>;

	/// Embed every supported image in `dir` into a fresh working set
	fn load_directory(&mut self, dir: &Path, options: &LoadOptions) -> Result<WorkingSet> {
		let model_id = self.model_id().to_string();
		load_working_set(dir, options, &model_id, |path| self.embed_image(path))
	}
}

/// `scale * (image · text)` for a batch of image vectors
pub fn scaled_similarity(images: &[&Embedding], text: &Embedding, scale: f32) -> Result<Vec<f32>> {
	let dim = text.dim();
	if images.is_empty() {
		return Ok(Vec::new());
	}

	let mut batch = Array2::<f32>::zeros((images.len(), dim));
	for (mut row, image) in batch.rows_mut().into_iter().zip(images) {
		if image.dim() != dim {
			return Err(Error::DimensionMismatch { expected: dim, found: image.dim() });
		}
		row.assign(&ArrayView1::from(image.as_slice()));
	}

	let scores = batch.dot(&ArrayView1::from(text.as_slice())) * scale;
	Ok(scores.to_vec())
}
