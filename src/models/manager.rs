//! ONNX-backed embedding engine with lazily loaded encoders

use anyhow::{Context, Result as AnyResult};
use std::path::Path;

use super::kind::{ModelKind, ModelSpec};
use super::provider::{scaled_similarity, EmbeddingProvider};
use super::text::TextModel;
use super::vision::VisionModel;
use crate::config::ModelPaths;
use crate::core::Embedding;
use crate::error::{Error, Result};
use crate::runtime::SessionOptions;
use crate::ui;

pub struct OnnxProvider {
	kind: ModelKind,
	spec: &'static ModelSpec,
	paths: ModelPaths,
	session_options: SessionOptions,
	vision: Option<VisionModel>,
	text: Option<TextModel>,
}

impl OnnxProvider {
	/// Check that the model files exist. Sessions are created on first use.
	pub fn new(kind: ModelKind, paths: ModelPaths, session_options: SessionOptions) -> Result<Self> {
		let missing = paths.missing();
		if !missing.is_empty() {
			let list: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
			return Err(Error::Config(format!(
				"{} model files missing: {}",
				kind,
				list.join(", ")
			)));
		}

		Ok(Self {
			kind,
			spec: kind.spec(),
			paths,
			session_options,
			vision: None,
			text: None,
		})
	}

	fn vision(&mut self) -> AnyResult<&mut VisionModel> {
		if self.vision.is_none() {
			ui::debug(&format!("Loading vision model: {}", self.paths.vision.display()));
			self.vision = Some(VisionModel::load(&self.paths.vision, self.spec, &self.session_options)?);
			ui::success(&format!("Vision model loaded ({})", self.kind));
		}
		self.vision.as_mut().context("Vision model unavailable")
	}

	fn text(&mut self) -> AnyResult<&mut TextModel> {
		if self.text.is_none() {
			ui::debug(&format!("Loading text model: {}", self.paths.text.display()));
			self.text = Some(TextModel::load(
				&self.paths.text,
				&self.paths.tokenizer,
				self.spec,
				&self.session_options,
			)?);
			ui::success(&format!("Text model loaded ({})", self.kind));
		}
		self.text.as_mut().context("Text model unavailable")
	}

	fn encode_image(&mut self, path: &Path) -> AnyResult<Embedding> {
		ui::debug(&format!("Encoding image: {}", path.display()));
		let img = image::open(path).with_context(|| {
			format!(
				"Failed to open image. File may be corrupted or in an unsupported format: {}",
				path.display()
			)
		})?;
		let raw = self.vision()?.encode(&img)?;
		Ok(Embedding::new(raw))
	}

	fn encode_text(&mut self, prompt: &str) -> AnyResult<Embedding> {
		ui::debug(&format!("Encoding prompt: \"{}\"", prompt));
		let raw = self.text()?.encode(prompt)?;
		Ok(Embedding::new(raw))
	}
}

impl EmbeddingProvider for OnnxProvider {
	fn model_id(&self) -> &str {
		self.kind.dir_name()
	}

	fn embed_image(&mut self, path: &Path) -> Result<Embedding> {
		self.encode_image(path).map_err(Error::provider)
	}

	fn embed_text(&mut self, prompt: &str) -> Result<Embedding> {
		self.encode_text(prompt).map_err(Error::provider)
	}

	fn similarity(&self, images: &[&Embedding], text: &Embedding) -> Result<Vec<f32>> {
		scaled_similarity(images, text, self.spec.logit_scale)
	}
}
