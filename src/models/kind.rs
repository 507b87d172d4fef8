//! Supported joint image/text models

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
	/// OpenAI CLIP ViT-B/32
	#[default]
	Clip,
	/// Google SigLIP2
	Siglip2,
}

/// Preprocessing and scoring parameters for one model
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
	pub input_size: u32,
	pub mean: [f32; 3],
	pub std: [f32; 3],
	pub context_length: usize,
	pub pad_token: &'static str,
	pub attention_mask: bool,
	pub logit_scale: f32,
	pub image_outputs: &'static [&'static str],
	pub text_outputs: &'static [&'static str],
}

const CLIP: ModelSpec = ModelSpec {
	input_size: 224,
	mean: [0.481_454_66, 0.457_827_5, 0.408_210_73],
	std: [0.268_629_54, 0.261_302_58, 0.275_777_11],
	context_length: 77,
	pad_token: "<|endoftext|>",
	attention_mask: true,
	logit_scale: 100.0,
	image_outputs: &["image_embeds", "pooler_output"],
	text_outputs: &["text_embeds", "pooler_output"],
};

const SIGLIP2: ModelSpec = ModelSpec {
	input_size: 512,
	mean: [0.5, 0.5, 0.5],
	std: [0.5, 0.5, 0.5],
	context_length: 64,
	pad_token: "<pad>",
	attention_mask: false,
	logit_scale: 100.0,
	image_outputs: &["pooler_output", "image_embeds"],
	text_outputs: &["pooler_output", "text_embeds"],
};

impl ModelKind {
	pub fn spec(&self) -> &'static ModelSpec {
		match self {
			Self::Clip => &CLIP,
			Self::Siglip2 => &SIGLIP2,
		}
	}

	/// Subdirectory of the models root holding this model's files
	pub fn dir_name(&self) -> &'static str {
		match self {
			Self::Clip => "clip",
			Self::Siglip2 => "siglip2",
		}
	}
}

impl std::fmt::Display for ModelKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.dir_name())
	}
}
