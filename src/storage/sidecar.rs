//! Sidecar file format and I/O

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CACHE_DIR, CACHE_EXT};
use crate::core::{Embedding, FileHash};
use crate::error::{Error, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cached embedding of one image, stored next to it under `.pixsort/`
#[derive(Debug, Serialize, Deserialize)]
pub struct Sidecar {
	version: String,
	model: String,
	filename: String,
	hash: String,
	embedding: Vec<f32>,
}

impl Sidecar {
	pub fn new(model: &str, filename: impl Into<String>, hash: &FileHash, embedding: &Embedding) -> Self {
		Self {
			version: VERSION.to_string(),
			model: model.to_string(),
			filename: filename.into(),
			hash: hash.as_str().to_string(),
			embedding: embedding.as_slice().to_vec(),
		}
	}

	pub fn embedding(&self) -> Embedding {
		Embedding::raw(self.embedding.clone())
	}

	pub fn filename(&self) -> &str {
		&self.filename
	}

	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// Written by this version for the same model
	pub fn is_valid_for(&self, model: &str) -> bool {
		self.version == VERSION && self.model == model
	}
}

/// Save sidecar to disk
pub fn save(sidecar: &Sidecar, folder: &Path, hash: &FileHash) -> Result<PathBuf> {
	let path = build_path(folder, hash);

	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)
			.map_err(|e| Error::Cache(format!("cannot create {}: {}", parent.display(), e)))?;
	}

	let bytes = rmp_serde::to_vec(sidecar).map_err(|e| Error::Cache(format!("cannot encode sidecar: {}", e)))?;
	fs::write(&path, bytes).map_err(|e| Error::Cache(format!("cannot write {}: {}", path.display(), e)))?;

	Ok(path)
}

/// Load sidecar from disk
pub fn load(path: &Path) -> Result<Sidecar> {
	let bytes = fs::read(path).map_err(|e| Error::Cache(format!("cannot read {}: {}", path.display(), e)))?;
	rmp_serde::from_slice(&bytes).map_err(|e| Error::Cache(format!("cannot decode {}: {}", path.display(), e)))
}

/// Build sidecar path from hash
pub fn build_path(folder: &Path, hash: &FileHash) -> PathBuf {
	folder.join(CACHE_DIR).join(format!("{}.{}", hash.as_str(), CACHE_EXT))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn survives_a_disk_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let image = dir.path().join("beach.jpg");
		fs::write(&image, b"pixels").unwrap();
		let hash = FileHash::compute(&image).unwrap();

		let sidecar = Sidecar::new("clip", "beach.jpg", &hash, &Embedding::new(vec![3.0, 4.0]));
		let path = save(&sidecar, dir.path(), &hash).unwrap();
		assert_eq!(path, build_path(dir.path(), &hash));

		let loaded = load(&path).unwrap();
		assert_eq!(loaded.filename(), "beach.jpg");
		assert_eq!(loaded.hash(), hash.as_str());
		assert_eq!(loaded.embedding().as_slice(), &[0.6, 0.8]);
		assert!(loaded.is_valid_for("clip"));
		assert!(!loaded.is_valid_for("siglip2"));
	}

	#[test]
	fn garbage_is_a_cache_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("junk.msgpack");
		fs::write(&path, b"\xff\xff\xff").unwrap();
		assert!(matches!(load(&path), Err(Error::Cache(_))));
	}
}
