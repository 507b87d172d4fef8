//! Content-based file hashing for the embedding cache

use std::fs::File;
use std::io::Read;
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

const HASH_BUFFER_SIZE: usize = 65536; // 64KB

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHash(String);

impl FileHash {
	/// Hash of the file's first 64KB
	pub fn compute(path: &Path) -> std::io::Result<Self> {
		let mut file = File::open(path)?;
		let mut buffer = Vec::with_capacity(HASH_BUFFER_SIZE);
		file.by_ref().take(HASH_BUFFER_SIZE as u64).read_to_end(&mut buffer)?;
		Ok(Self(format!("{:016x}", xxh3_64(&buffer))))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn short(&self) -> &str {
		&self.0[..8]
	}
}

impl std::fmt::Display for FileHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}
