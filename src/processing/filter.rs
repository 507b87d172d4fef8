//! Prompt scoring over a candidate set

use crate::core::{Embedding, WorkingSet};
use crate::error::{Error, Result};
use crate::models::EmbeddingProvider;
use crate::ui;

/// Score every candidate against `prompt`.
///
/// The prompt is embedded once. Candidates are scored `batch_size` at a time in
/// working-set order; the output holds each candidate exactly once, in that order.
/// Filtering by threshold is left to the caller (see [`above_threshold`]).
pub fn filter_by_prompt(
	provider: &mut dyn EmbeddingProvider,
	prompt: &str,
	candidates: &WorkingSet,
	batch_size: usize,
) -> Result<Vec<(String, f32)>> {
	if batch_size == 0 {
		return Err(Error::InvalidInput("batch size must be at least 1".into()));
	}
	if candidates.is_empty() {
		return Ok(Vec::new());
	}

	let text = provider.embed_text(prompt)?;
	let entries: Vec<(&str, &Embedding)> = candidates.iter().collect();
	let mut scored = Vec::with_capacity(entries.len());

	for (n, batch) in entries.chunks(batch_size).enumerate() {
		let vectors: Vec<&Embedding> = batch.iter().map(|(_, e)| *e).collect();
		let scores = provider.similarity(&vectors, &text)?;
		if scores.len() != batch.len() {
			return Err(Error::provider(anyhow::anyhow!(
				"similarity returned {} scores for a batch of {}",
				scores.len(),
				batch.len()
			)));
		}

		ui::debug(&format!("\"{}\" batch {}: {} images scored", prompt, n + 1, batch.len()));
		scored.extend(batch.iter().map(|(id, _)| id.to_string()).zip(scores));
	}

	Ok(scored)
}

/// Identifiers whose score is strictly greater than `threshold`, order preserved
pub fn above_threshold(scored: &[(String, f32)], threshold: f32) -> Vec<String> {
	scored
		.iter()
		.filter(|(_, score)| *score > threshold)
		.map(|(id, _)| id.clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::ImageEmbedding;
	use crate::models::scaled_similarity;
	use std::path::Path;

	/// Every prompt embeds to the x axis
	struct AxisProvider {
		fail_text: bool,
	}

	impl EmbeddingProvider for AxisProvider {
		fn model_id(&self) -> &str {
			"axis"
		}

		fn embed_image(&mut self, _path: &Path) -> Result<Embedding> {
			Err(Error::provider(anyhow::anyhow!("not used")))
		}

		fn embed_text(&mut self, _prompt: &str) -> Result<Embedding> {
			if self.fail_text {
				return Err(Error::provider(anyhow::anyhow!("text encoder down")));
			}
			Ok(Embedding::new(vec![1.0, 0.0]))
		}

		fn similarity(&self, images: &[&Embedding], text: &Embedding) -> Result<Vec<f32>> {
			scaled_similarity(images, text, 1.0)
		}
	}

	fn set(n: usize) -> WorkingSet {
		WorkingSet::from_images((0..n).map(|i| {
			let angle = i as f32 * 0.2;
			ImageEmbedding::new(format!("img{:02}.jpg", i), Embedding::new(vec![angle.cos(), angle.sin()]))
		}))
		.unwrap()
	}

	#[test]
	fn batch_size_does_not_change_scores() {
		let candidates = set(13);
		let mut provider = AxisProvider { fail_text: false };

		let whole = filter_by_prompt(&mut provider, "x", &candidates, 100).unwrap();
		for batch_size in [1, 2, 5, 13] {
			let chunked = filter_by_prompt(&mut provider, "x", &candidates, batch_size).unwrap();
			assert_eq!(whole, chunked, "batch size {}", batch_size);
		}
		assert_eq!(whole.len(), 13);
		let ids: Vec<&str> = whole.iter().map(|(id, _)| id.as_str()).collect();
		let expected: Vec<&str> = candidates.ids().collect();
		assert_eq!(ids, expected);
	}

	#[test]
	fn empty_candidates_skip_the_provider() {
		let mut provider = AxisProvider { fail_text: true };
		let out = filter_by_prompt(&mut provider, "x", &WorkingSet::new(), 20).unwrap();
		assert!(out.is_empty());
	}

	#[test]
	fn provider_failure_propagates() {
		let mut provider = AxisProvider { fail_text: true };
		let err = filter_by_prompt(&mut provider, "x", &set(3), 20).unwrap_err();
		assert!(matches!(err, Error::Provider(_)));
	}

	#[test]
	fn threshold_is_strict() {
		let scored = vec![("a".to_string(), 0.5), ("b".to_string(), 0.51), ("c".to_string(), 0.9)];
		assert_eq!(above_threshold(&scored, 0.5), vec!["b".to_string(), "c".to_string()]);
	}
}
