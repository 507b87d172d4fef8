//! Application configuration and constants

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ModelKind;

// === Model Files ===
pub const VISION_MODEL: &str = "vision.onnx";
pub const TEXT_MODEL: &str = "text.onnx";
pub const TOKENIZER: &str = "tokenizer.json";
pub const MODELS_DIR_ENV: &str = "PIXSORT_MODELS_DIR";

// === Categorization ===
/// Logit-scaled cosine similarity a prompt must exceed to claim an image.
pub const DEFAULT_THRESHOLD: f32 = 22.0;
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_MAX_CATEGORIES: usize = 6;
pub const OTHER_LABEL: &str = "other";

// === Storage ===
pub const CACHE_DIR: &str = ".pixsort";
pub const CACHE_EXT: &str = "msgpack";
pub const REPORT_FILE: &str = "pixsort-report.json";

// === File Extensions ===
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A configured category, evaluated before residual clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCategory {
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prompt: Option<String>,
}

impl FixedCategory {
	pub fn new(label: impl Into<String>) -> Self {
		Self { label: label.into(), prompt: None }
	}

	pub fn with_prompt(label: impl Into<String>, prompt: impl Into<String>) -> Self {
		Self { label: label.into(), prompt: Some(prompt.into()) }
	}

	/// Prompt sent to the text encoder; the label itself unless overridden
	pub fn prompt(&self) -> &str {
		self.prompt.as_deref().unwrap_or(&self.label)
	}

	/// Parse `label` or `label=prompt`
	pub fn parse(s: &str) -> std::result::Result<Self, String> {
		let (label, prompt) = match s.split_once('=') {
			Some((l, p)) => (l.trim(), Some(p.trim())),
			None => (s.trim(), None),
		};
		if label.is_empty() {
			return Err(format!("'{}' has an empty label", s));
		}
		match prompt {
			Some("") => Err(format!("'{}' has an empty prompt", s)),
			Some(p) => Ok(Self::with_prompt(label, p)),
			None => Ok(Self::new(label)),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizeConfig {
	pub categories: Vec<FixedCategory>,
	pub threshold: f32,
	/// Budget shared by fixed categories and residual clusters
	pub max_categories: usize,
	pub batch_size: usize,
	pub extensions: Vec<String>,
	/// Renormalize cluster means to unit length after every merge
	pub renormalize_means: bool,
}

impl Default for CategorizeConfig {
	fn default() -> Self {
		Self {
			categories: Vec::new(),
			threshold: DEFAULT_THRESHOLD,
			max_categories: DEFAULT_MAX_CATEGORIES,
			batch_size: DEFAULT_BATCH_SIZE,
			extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
			renormalize_means: false,
		}
	}
}

impl CategorizeConfig {
	/// Read a JSON config file. Missing fields take their defaults.
	pub fn load(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path)
			.map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
		serde_json::from_str(&text)
			.map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
	}

	pub fn with_categories(mut self, categories: Vec<FixedCategory>) -> Self {
		self.categories = categories;
		self
	}

	/// Residual cluster budget before clamping
	pub fn residual_budget(&self) -> isize {
		self.max_categories as isize - self.categories.len() as isize
	}

	pub fn validate(&self) -> Result<()> {
		if !self.threshold.is_finite() {
			return Err(Error::Config(format!("threshold must be finite, got {}", self.threshold)));
		}
		if self.batch_size == 0 {
			return Err(Error::Config("batch size must be at least 1".into()));
		}
		if self.max_categories == 0 {
			return Err(Error::Config("max categories must be at least 1".into()));
		}
		if self.extensions.is_empty() {
			return Err(Error::Config("extension allow-list is empty".into()));
		}

		let mut seen = HashSet::new();
		for category in &self.categories {
			let label = category.label.trim();
			if label.is_empty() {
				return Err(Error::Config("category labels must not be empty".into()));
			}
			if label.to_ascii_lowercase().starts_with(OTHER_LABEL) {
				return Err(Error::Config(format!(
					"label '{}' is reserved for residual clusters",
					label
				)));
			}
			if label.contains(['/', '\\']) || label == "." || label == ".." {
				return Err(Error::Config(format!("label '{}' is not a valid folder name", label)));
			}
			if !seen.insert(label.to_string()) {
				return Err(Error::Config(format!("duplicate category label '{}'", label)));
			}
			if category.prompt().trim().is_empty() {
				return Err(Error::Config(format!("category '{}' has an empty prompt", label)));
			}
		}

		Ok(())
	}

	/// True if the file name carries an allowed extension (case-insensitive)
	pub fn accepts(&self, path: &Path) -> bool {
		has_extension(path, &self.extensions)
	}
}

/// Case-insensitive extension check; allow-list entries may carry a leading dot
pub fn has_extension(path: &Path, allowed: &[String]) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.is_some_and(|ext| allowed.iter().any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext)))
}

/// Locations of one model's ONNX files and tokenizer
#[derive(Debug, Clone)]
pub struct ModelPaths {
	pub vision: PathBuf,
	pub text: PathBuf,
	pub tokenizer: PathBuf,
}

impl ModelPaths {
	pub fn in_dir(dir: &Path) -> Self {
		Self {
			vision: dir.join(VISION_MODEL),
			text: dir.join(TEXT_MODEL),
			tokenizer: dir.join(TOKENIZER),
		}
	}

	/// Resolve the model directory for `kind`.
	///
	/// Order: explicit override, `PIXSORT_MODELS_DIR`, then `models/` next to the executable.
	/// Each root holds one subdirectory per model kind.
	pub fn resolve(kind: ModelKind, override_dir: Option<&Path>) -> Option<Self> {
		models_root(override_dir).map(|root| Self::in_dir(&root.join(kind.dir_name())))
	}

	pub fn missing(&self) -> Vec<&Path> {
		[&self.vision, &self.text, &self.tokenizer]
			.into_iter()
			.filter(|p| !p.exists())
			.map(|p| p.as_path())
			.collect()
	}
}

fn models_root(override_dir: Option<&Path>) -> Option<PathBuf> {
	if let Some(custom) = override_dir {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.to_path_buf());
	}

	if let Ok(env_path) = std::env::var(MODELS_DIR_ENV) {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using {}: {}", MODELS_DIR_ENV, env_path));
			return Some(path);
		}
	}

	let exe = std::env::current_exe().ok()?;
	let models = exe.parent()?.join("models");
	if models.is_dir() {
		crate::ui::debug(&format!("Found models at: {}", models.display()));
		Some(models)
	} else {
		None
	}
}
