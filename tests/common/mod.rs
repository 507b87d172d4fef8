// Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use pixsort::core::{CategorizationResult, Embedding, ImageEmbedding, WorkingSet};
use pixsort::models::{scaled_similarity, EmbeddingProvider};
use pixsort::{Error, Result};

/// Deterministic in-memory provider: images are looked up by file name,
/// prompts by text, and scores are plain dot products.
#[derive(Debug, Default)]
pub struct FakeProvider {
	images: HashMap<String, Vec<f32>>,
	prompts: HashMap<String, Vec<f32>>,
	pub image_calls: usize,
	pub text_calls: usize,
}

impl FakeProvider {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_image(mut self, name: &str, vector: Vec<f32>) -> Self {
		self.images.insert(name.to_string(), vector);
		self
	}

	pub fn with_prompt(mut self, prompt: &str, vector: Vec<f32>) -> Self {
		self.prompts.insert(prompt.to_string(), vector);
		self
	}

	/// Every registered image, embedded without touching the filesystem
	pub fn working_set(&self) -> WorkingSet {
		WorkingSet::from_images(
			self.images.iter().map(|(name, v)| ImageEmbedding::new(name.clone(), Embedding::new(v.clone()))),
		)
		.unwrap()
	}
}

impl EmbeddingProvider for FakeProvider {
	fn model_id(&self) -> &str {
		"fake"
	}

	fn embed_image(&mut self, path: &Path) -> Result<Embedding> {
		self.image_calls += 1;
		let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
		self.images
			.get(name)
			.map(|v| Embedding::new(v.clone()))
			.ok_or_else(|| Error::provider(anyhow::anyhow!("unknown image {}", path.display())))
	}

	fn embed_text(&mut self, prompt: &str) -> Result<Embedding> {
		self.text_calls += 1;
		self.prompts
			.get(prompt)
			.map(|v| Embedding::new(v.clone()))
			.ok_or_else(|| Error::provider(anyhow::anyhow!("unknown prompt '{}'", prompt)))
	}

	fn similarity(&self, images: &[&Embedding], text: &Embedding) -> Result<Vec<f32>> {
		scaled_similarity(images, text, 1.0)
	}
}

/// Reproducible pseudo-random vectors (64-bit LCG)
pub fn pseudo_vectors(n: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
	let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
	(0..n)
		.map(|_| {
			(0..dim)
				.map(|_| {
					state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
					((state >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0
				})
				.collect()
		})
		.collect()
}

/// Label text and members, in result order
pub fn snapshot(result: &CategorizationResult) -> Vec<(String, Vec<String>)> {
	result.iter().map(|c| (c.label.to_string(), c.members.clone())).collect()
}
