//! Folder loading: listing, embedding cache, working set construction

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{has_extension, CategorizeConfig, IMAGE_EXTENSIONS};
use crate::core::{Embedding, FileHash, ImageEmbedding, WorkingSet};
use crate::error::{Error, Result};
use crate::storage::{self, Sidecar};
use crate::ui;

#[derive(Debug, Clone)]
pub struct LoadOptions {
	pub extensions: Vec<String>,
	/// Reuse and write sidecar embeddings under `.pixsort/`
	pub use_cache: bool,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
			use_cache: true,
		}
	}
}

impl LoadOptions {
	pub fn from_config(config: &CategorizeConfig, use_cache: bool) -> Self {
		Self { extensions: config.extensions.clone(), use_cache }
	}

	pub fn accepts(&self, path: &Path) -> bool {
		has_extension(path, &self.extensions)
	}
}

/// Supported images directly inside `dir`, sorted by path.
///
/// Subfolders (including the cache) are not descended into.
pub fn scan_folder(dir: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>> {
	if !dir.is_dir() {
		return Err(Error::InvalidFolder(dir.to_path_buf()));
	}

	let mut files: Vec<PathBuf> = WalkDir::new(dir)
		.min_depth(1)
		.max_depth(1)
		.into_iter()
		.filter_map(|e| e.ok())
		.filter(|e| e.file_type().is_file())
		.map(|e| e.into_path())
		.filter(|p| options.accepts(p))
		.collect();

	files.sort();
	Ok(files)
}

/// Embed every supported image in `dir` into a working set keyed by file name.
///
/// With caching on, a valid sidecar for the file's content hash and `model_id`
/// replaces the call to `embed`; fresh embeddings are written back. Cache write
/// failures only warn. An `embed` failure aborts the load.
pub fn load_working_set<F>(dir: &Path, options: &LoadOptions, model_id: &str, mut embed: F) -> Result<WorkingSet>
where
	F: FnMut(&Path) -> Result<Embedding>,
{
	let files = scan_folder(dir, options)?;

	let hashes: Vec<Option<FileHash>> = if options.use_cache {
		files
			.par_iter()
			.map(|path| match FileHash::compute(path) {
				Ok(hash) => Some(hash),
				Err(e) => {
					ui::debug(&format!("Failed to hash {}: {}", path.display(), e));
					None
				}
			})
			.collect()
	} else {
		vec![None; files.len()]
	};

	let mut set = WorkingSet::for_folder(dir);
	let mut cached = 0;
	let mut embedded = 0;

	for (path, hash) in files.iter().zip(hashes) {
		let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
			ui::warn(&format!("Skipping non UTF-8 file name: {}", path.display()));
			continue;
		};

		let hit = hash.as_ref().and_then(|h| cached_embedding(dir, h, model_id));
		let embedding = match hit {
			Some(embedding) => {
				cached += 1;
				embedding
			}
			None => {
				let embedding = embed(path)?;
				embedded += 1;
				if let Some(hash) = &hash {
					let sidecar = Sidecar::new(model_id, id, hash, &embedding);
					if let Err(e) = storage::save(&sidecar, dir, hash) {
						ui::warn(&format!("Could not cache {}: {}", id, e));
					}
				}
				embedding
			}
		};

		set.insert(ImageEmbedding::new(id, embedding))?;
	}

	ui::debug(&format!(
		"Loaded {} images from {} ({} cached, {} embedded)",
		set.len(),
		dir.display(),
		cached,
		embedded
	));

	Ok(set)
}

fn cached_embedding(dir: &Path, hash: &FileHash, model_id: &str) -> Option<Embedding> {
	let path = storage::build_path(dir, hash);
	if !path.exists() {
		return None;
	}
	match storage::load(&path) {
		Ok(sidecar) if sidecar.is_valid_for(model_id) => Some(sidecar.embedding()),
		Ok(_) => {
			ui::debug(&format!("Outdated sidecar: {}", path.display()));
			None
		}
		Err(e) => {
			ui::debug(&format!("{}", e));
			None
		}
	}
}
