//! Two-stage auto-categorization: fixed prompts first, clustering for the rest

use crate::config::{CategorizeConfig, FixedCategory};
use crate::core::{CategorizationResult, CategoryLabel, WorkingSet};
use crate::error::{Error, Result};
use crate::models::EmbeddingProvider;
use crate::processing::cluster::ResidualClusterer;
use crate::processing::filter::{above_threshold, filter_by_prompt};
use crate::ui;

/// Runs categorization passes against one embedding provider.
///
/// Holds no state between calls; every call builds its result from scratch.
pub struct Categorizer<'a> {
	provider: &'a mut dyn EmbeddingProvider,
	config: &'a CategorizeConfig,
}

impl<'a> Categorizer<'a> {
	pub fn new(provider: &'a mut dyn EmbeddingProvider, config: &'a CategorizeConfig) -> Self {
		Self { provider, config }
	}

	/// Assign every image to exactly one category.
	///
	/// Fixed categories claim images in configured order (first match wins). The
	/// unclaimed rest is clustered into the remaining budget; a single residual
	/// cluster is labelled `other`, several are labelled `other_1`, `other_2`, ...
	/// ordered by their earliest image. Any provider failure aborts the whole run.
	pub fn auto_categorize(&mut self, working_set: &WorkingSet) -> Result<CategorizationResult> {
		self.config.validate()?;
		if working_set.is_empty() {
			return Err(empty_set(working_set));
		}

		let mut result = CategorizationResult::new();
		let mut unclaimed = working_set.clone();

		for category in &self.config.categories {
			let scored = filter_by_prompt(&mut *self.provider, category.prompt(), &unclaimed, self.config.batch_size)?;
			let claimed = above_threshold(&scored, self.config.threshold);
			unclaimed.remove_all(claimed.iter().map(String::as_str));

			ui::debug(&format!(
				"'{}' claimed {} of {} images ({} left)",
				category.label,
				claimed.len(),
				scored.len(),
				unclaimed.len()
			));
			result.push(CategoryLabel::Fixed(category.label.clone()), claimed);
		}

		if !unclaimed.is_empty() {
			let budget = self.residual_budget();
			self.push_residual(&mut result, &unclaimed, budget)?;
		}
		unclaimed.release();

		Ok(result)
	}

	/// Apply independent prompt rules. An image lands under every rule it scores
	/// above threshold for, and under none if it matches nothing.
	pub fn categorize_by_prompts(
		&mut self,
		working_set: &WorkingSet,
		rules: &[FixedCategory],
	) -> Result<CategorizationResult> {
		if rules.is_empty() {
			return Err(Error::InvalidInput("at least one prompt rule is required".into()));
		}
		if working_set.is_empty() {
			return Err(empty_set(working_set));
		}

		let mut result = CategorizationResult::new();
		for rule in rules {
			let scored = filter_by_prompt(&mut *self.provider, rule.prompt(), working_set, self.config.batch_size)?;
			let matched = above_threshold(&scored, self.config.threshold);
			ui::debug(&format!("'{}' matched {} images", rule.label, matched.len()));
			result.push(CategoryLabel::Fixed(rule.label.clone()), matched);
		}

		Ok(result)
	}

	/// Clusters left for residual images, never less than one
	fn residual_budget(&self) -> usize {
		let budget = self.config.residual_budget();
		if budget <= 0 {
			ui::warn(&format!(
				"{} fixed categories leave no room under a budget of {}; using 1 residual cluster",
				self.config.categories.len(),
				self.config.max_categories
			));
			1
		} else {
			budget as usize
		}
	}

	fn push_residual(&self, result: &mut CategorizationResult, unclaimed: &WorkingSet, budget: usize) -> Result<()> {
		let ids: Vec<&str> = unclaimed.ids().collect();
		let vectors: Vec<&[f32]> = unclaimed.iter().map(|(_, e)| e.as_slice()).collect();

		let mut clusters = ResidualClusterer::new(self.config.renormalize_means).cluster(&vectors, budget)?;
		for cluster in &mut clusters {
			cluster.members.sort_unstable();
		}
		clusters.sort_by_key(|c| c.first_member());

		ui::debug(&format!(
			"{} residual images grouped into {} clusters",
			ids.len(),
			clusters.len()
		));

		let numbered = clusters.len() > 1;
		for (n, cluster) in clusters.into_iter().enumerate() {
			let label = CategoryLabel::Other(numbered.then_some(n + 1));
			let members = cluster.members.iter().map(|&i| ids[i].to_string()).collect();
			result.push(label, members);
		}

		Ok(())
	}
}

fn empty_set(working_set: &WorkingSet) -> Error {
	Error::EmptyWorkingSet(working_set.source().map(|p| p.to_path_buf()).unwrap_or_default())
}
