//! Text encoder for prompt embeddings

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use tokenizers::Tokenizer;

use super::kind::ModelSpec;
use crate::runtime::{create_session, SessionOptions};

pub struct TextModel {
	session: Session,
	tokenizer: Tokenizer,
	spec: &'static ModelSpec,
	pad_id: i64,
}

impl TextModel {
	pub fn load(
		model_path: &Path,
		tokenizer_path: &Path,
		spec: &'static ModelSpec,
		options: &SessionOptions,
	) -> Result<Self> {
		let session = create_session(model_path, options).context("Failed to load text model")?;

		let tokenizer = Tokenizer::from_file(tokenizer_path)
			.map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
		let pad_id = tokenizer.token_to_id(spec.pad_token).unwrap_or(0) as i64;

		Ok(Self { session, tokenizer, spec, pad_id })
	}

	pub fn encode(&mut self, text: &str) -> Result<Vec<f32>> {
		let (ids, mask) = self.tokenize(text)?;
		let len = ids.len();

		let ids = Value::from_array(Array2::from_shape_vec((1, len), ids)?)?;
		let outputs = if self.spec.attention_mask {
			let mask = Value::from_array(Array2::from_shape_vec((1, len), mask)?)?;
			self.session.run(ort::inputs!["input_ids" => ids, "attention_mask" => mask])?
		} else {
			self.session.run(ort::inputs!["input_ids" => ids])?
		};

		let (_, data) = extract_output!(outputs, self.spec.text_outputs);
		Ok(data)
	}

	/// Token ids padded or truncated to the context length, plus the matching mask
	fn tokenize(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>)> {
		let encoding = self
			.tokenizer
			.encode(text, true)
			.map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

		let ctx = self.spec.context_length;
		let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
		ids.truncate(ctx);
		let valid = ids.len();
		ids.resize(ctx, self.pad_id);

		let mask = (0..ctx).map(|i| i64::from(i < valid)).collect();
		Ok((ids, mask))
	}
}
