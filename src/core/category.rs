//! Category labels and categorization results

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::OTHER_LABEL;
use crate::core::WorkingSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryLabel {
	/// A configured label
	Fixed(String),
	/// A residual cluster: `other` when it is the only one, `other_N` otherwise
	Other(Option<usize>),
}

impl CategoryLabel {
	pub fn is_other(&self) -> bool {
		matches!(self, Self::Other(_))
	}
}

impl fmt::Display for CategoryLabel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Fixed(label) => f.write_str(label),
			Self::Other(None) => f.write_str(OTHER_LABEL),
			Self::Other(Some(n)) => write!(f, "{}_{}", OTHER_LABEL, n),
		}
	}
}

impl Serialize for CategoryLabel {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
	pub label: CategoryLabel,
	pub members: Vec<String>,
}

/// Ordered label → identifiers mapping handed to the caller.
///
/// Fixed categories come first in configured order, residual clusters after.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CategorizationResult {
	categories: Vec<Category>,
}

impl CategorizationResult {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, label: CategoryLabel, members: Vec<String>) {
		self.categories.push(Category { label, members });
	}

	/// Members for a label given as text (`"cat"`, `"other"`, `"other_2"`)
	pub fn get(&self, label: &str) -> Option<&[String]> {
		self.categories
			.iter()
			.find(|c| c.label.to_string() == label)
			.map(|c| c.members.as_slice())
	}

	pub fn labels(&self) -> impl Iterator<Item = &CategoryLabel> {
		self.categories.iter().map(|c| &c.label)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Category> {
		self.categories.iter()
	}

	pub fn len(&self) -> usize {
		self.categories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}

	pub fn total_members(&self) -> usize {
		self.categories.iter().map(|c| c.members.len()).sum()
	}

	/// Every working-set key appears in exactly one category and nothing else does
	pub fn is_partition_of(&self, set: &WorkingSet) -> bool {
		let mut seen = HashSet::new();
		for id in self.categories.iter().flat_map(|c| c.members.iter()) {
			if !set.contains(id) || !seen.insert(id.as_str()) {
				return false;
			}
		}
		seen.len() == set.len()
	}
}

impl<'a> IntoIterator for &'a CategorizationResult {
	type Item = &'a Category;
	type IntoIter = std::slice::Iter<'a, Category>;

	fn into_iter(self) -> Self::IntoIter {
		self.categories.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::{Embedding, ImageEmbedding};

	#[test]
	fn other_labels_render_with_suffix() {
		assert_eq!(CategoryLabel::Other(None).to_string(), "other");
		assert_eq!(CategoryLabel::Other(Some(3)).to_string(), "other_3");
		assert_eq!(CategoryLabel::Fixed("cat".into()).to_string(), "cat");
	}

	#[test]
	fn partition_check_catches_duplicates_and_gaps() {
		let set = WorkingSet::from_images(
			["a", "b", "c"].map(|id| ImageEmbedding::new(id, Embedding::new(vec![1.0]))),
		)
		.unwrap();

		let mut ok = CategorizationResult::new();
		ok.push(CategoryLabel::Fixed("x".into()), vec!["a".into(), "c".into()]);
		ok.push(CategoryLabel::Other(None), vec!["b".into()]);
		assert!(ok.is_partition_of(&set));
		assert_eq!(ok.get("other"), Some(&["b".to_string()][..]));

		let mut dup = CategorizationResult::new();
		dup.push(CategoryLabel::Fixed("x".into()), vec!["a".into(), "b".into()]);
		dup.push(CategoryLabel::Other(None), vec!["b".into(), "c".into()]);
		assert!(!dup.is_partition_of(&set));

		let mut gap = CategorizationResult::new();
		gap.push(CategoryLabel::Fixed("x".into()), vec!["a".into()]);
		assert!(!gap.is_partition_of(&set));
	}

	#[test]
	fn serializes_as_label_list() {
		let mut result = CategorizationResult::new();
		result.push(CategoryLabel::Other(Some(1)), vec!["a.jpg".into()]);
		let json = serde_json::to_string(&result).unwrap();
		assert_eq!(json, r#"[{"label":"other_1","members":["a.jpg"]}]"#);
	}
}
