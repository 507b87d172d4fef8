//! Embedding cache

pub mod sidecar;

pub use sidecar::{build_path, load, save, Sidecar};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CACHE_DIR, CACHE_EXT};
use crate::core::FileHash;
use crate::error::{Error, Result};
use crate::ui;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanSummary {
	pub removed: usize,
	pub kept: usize,
}

pub fn cache_dir(folder: &Path) -> PathBuf {
	folder.join(CACHE_DIR)
}

/// Every sidecar file in the folder's cache, sorted
pub fn list(folder: &Path) -> Vec<PathBuf> {
	let Ok(entries) = fs::read_dir(cache_dir(folder)) else {
		return Vec::new();
	};

	let mut paths: Vec<PathBuf> = entries
		.filter_map(|e| e.ok())
		.map(|e| e.path())
		.filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some(CACHE_EXT))
		.collect();
	paths.sort();
	paths
}

/// Remove stale sidecars, or the whole cache directory when `all` is set.
///
/// A sidecar is stale when it cannot be decoded, its image is gone, or the
/// image's content no longer matches the hash it was written for.
pub fn clean(folder: &Path, all: bool) -> Result<CleanSummary> {
	if !folder.is_dir() {
		return Err(Error::InvalidFolder(folder.to_path_buf()));
	}

	let sidecars = list(folder);
	if all {
		let dir = cache_dir(folder);
		if dir.exists() {
			fs::remove_dir_all(&dir)?;
			ui::debug(&format!("Deleted: {}", dir.display()));
		}
		return Ok(CleanSummary { removed: sidecars.len(), kept: 0 });
	}

	let mut summary = CleanSummary::default();
	for path in sidecars {
		if is_stale(folder, &path) {
			fs::remove_file(&path)?;
			ui::debug(&format!("Deleted: {}", path.display()));
			summary.removed += 1;
		} else {
			summary.kept += 1;
		}
	}

	Ok(summary)
}

fn is_stale(folder: &Path, sidecar_path: &Path) -> bool {
	let Ok(sidecar) = load(sidecar_path) else {
		return true;
	};
	let image = folder.join(sidecar.filename());
	match FileHash::compute(&image) {
		Ok(hash) => hash.as_str() != sidecar.hash(),
		Err(_) => true,
	}
}
