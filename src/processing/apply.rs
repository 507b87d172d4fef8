//! Copy categorized images into per-label folders

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::CategorizationResult;
use crate::error::{Error, Result};
use crate::ui;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplySummary {
	pub folders: Vec<PathBuf>,
	pub copied: usize,
}

/// Create `dest/<label>/` for every category and copy its members from `source`.
///
/// Folders are created even for empty categories. Existing files with the same
/// name are overwritten. Copies already made stay in place if a later one fails.
pub fn copy_into_folders(result: &CategorizationResult, source: &Path, dest: &Path) -> Result<ApplySummary> {
	if !source.is_dir() {
		return Err(Error::InvalidFolder(source.to_path_buf()));
	}

	let mut summary = ApplySummary::default();
	for category in result {
		let folder = dest.join(category.label.to_string());
		fs::create_dir_all(&folder)?;

		for id in &category.members {
			let from = source.join(id);
			let to = folder.join(id);
			fs::copy(&from, &to)?;
			ui::debug(&format!("{} -> {}", from.display(), to.display()));
			summary.copied += 1;
		}

		summary.folders.push(folder);
	}

	Ok(summary)
}
