//! In-memory image embeddings for one folder load

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::Embedding;
use crate::error::{Error, Result};

/// One image's identifier (its file name) and embedding
#[derive(Debug, Clone)]
pub struct ImageEmbedding {
	pub id: String,
	pub embedding: Embedding,
}

impl ImageEmbedding {
	pub fn new(id: impl Into<String>, embedding: Embedding) -> Self {
		Self { id: id.into(), embedding }
	}
}

/// Identifier → embedding map, iterated in identifier order.
///
/// Keys are unique and every vector shares one dimensionality.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
	source: Option<PathBuf>,
	images: BTreeMap<String, Embedding>,
}

impl WorkingSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn for_folder(source: impl Into<PathBuf>) -> Self {
		Self { source: Some(source.into()), images: BTreeMap::new() }
	}

	/// Build from pairs, failing on duplicate identifiers or mixed dimensions
	pub fn from_images<I>(images: I) -> Result<Self>
	where
		I: IntoIterator<Item = ImageEmbedding>,
	{
		let mut set = Self::new();
		for image in images {
			set.insert(image)?;
		}
		Ok(set)
	}

	pub fn source(&self) -> Option<&Path> {
		self.source.as_deref()
	}

	pub fn insert(&mut self, image: ImageEmbedding) -> Result<()> {
		if let Some(expected) = self.dim() {
			if image.embedding.dim() != expected {
				return Err(Error::DimensionMismatch { expected, found: image.embedding.dim() });
			}
		}
		if self.images.contains_key(&image.id) {
			return Err(Error::InvalidInput(format!("duplicate image identifier '{}'", image.id)));
		}
		self.images.insert(image.id, image.embedding);
		Ok(())
	}

	pub fn get(&self, id: &str) -> Option<&Embedding> {
		self.images.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.images.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.images.len()
	}

	pub fn is_empty(&self) -> bool {
		self.images.is_empty()
	}

	pub fn dim(&self) -> Option<usize> {
		self.images.values().next().map(Embedding::dim)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedding)> {
		self.images.iter().map(|(id, e)| (id.as_str(), e))
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.images.keys().map(String::as_str)
	}

	/// Copy of this set minus the given identifiers
	pub fn without<'a, I>(&self, claimed: I) -> Self
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut rest = self.clone();
		rest.remove_all(claimed);
		rest
	}

	pub fn remove_all<'a, I>(&mut self, claimed: I)
	where
		I: IntoIterator<Item = &'a str>,
	{
		for id in claimed {
			self.images.remove(id);
		}
	}

	/// Drop every held vector and give the memory back.
	pub fn release(&mut self) {
		let released = self.images.len();
		self.images = BTreeMap::new();
		if released > 0 {
			crate::ui::debug(&format!("Released {} embeddings", released));
		}
	}
}
