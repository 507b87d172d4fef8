//! Vision encoder for image embeddings

use anyhow::{Context, Result};
use image::imageops::FilterType;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;

use super::kind::ModelSpec;
use crate::runtime::{create_session, SessionOptions};

pub struct VisionModel {
	session: Session,
	spec: &'static ModelSpec,
}

impl VisionModel {
	pub fn load(model_path: &Path, spec: &'static ModelSpec, options: &SessionOptions) -> Result<Self> {
		let session = create_session(model_path, options).context("Failed to load vision model")?;
		Ok(Self { session, spec })
	}

	pub fn encode(&mut self, image: &image::DynamicImage) -> Result<Vec<f32>> {
		let pixels = preprocess(image, self.spec);
		let input = Value::from_array(pixels)?;

		let outputs = self.session.run(ort::inputs!["pixel_values" => input])?;
		let (shape, data) = extract_output!(outputs, self.spec.image_outputs);
		let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

		Ok(pool(&data, &dims))
	}
}

/// Resize to the model's square input and normalize into NCHW
fn preprocess(img: &image::DynamicImage, spec: &ModelSpec) -> Array4<f32> {
	let size = spec.input_size as usize;
	let rgb = img
		.resize_exact(spec.input_size, spec.input_size, FilterType::CatmullRom)
		.to_rgb8();

	let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
	for (x, y, px) in rgb.enumerate_pixels() {
		for c in 0..3 {
			let value = px[c] as f32 / 255.0;
			tensor[[0, c, y as usize, x as usize]] = (value - spec.mean[c]) / spec.std[c];
		}
	}
	tensor
}

/// `[1, dim]` is used as-is; `[1, patches, dim]` is mean-pooled over patches
fn pool(data: &[f32], dims: &[usize]) -> Vec<f32> {
	match dims {
		[1, n, dim] if *n > 0 => {
			let mut pooled = vec![0.0; *dim];
			for patch in data.chunks_exact(*dim) {
				for (acc, v) in pooled.iter_mut().zip(patch) {
					*acc += v;
				}
			}
			pooled.iter_mut().for_each(|v| *v /= *n as f32);
			pooled
		}
		_ => data.to_vec(),
	}
}
