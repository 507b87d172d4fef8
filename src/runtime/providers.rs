//! Execution provider selection

use anyhow::{Context, Result};
use clap::ValueEnum;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;
use std::sync::Once;

use crate::ui;

static PROVIDER_LOGGED: Once = Once::new();

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK CPU acceleration
	Xnnpack,
}

/// How sessions are built for every model in a run
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
	pub provider: Provider,
	pub intra_threads: usize,
}

impl Default for SessionOptions {
	fn default() -> Self {
		Self { provider: Provider::Auto, intra_threads: 4 }
	}
}

impl SessionOptions {
	pub fn new(provider: Provider) -> Self {
		Self { provider, ..Self::default() }
	}
}

pub fn create_session(model_path: &Path, options: &SessionOptions) -> Result<Session> {
	let mut builder = Session::builder().context("Failed to create session builder")?;

	match options.provider {
		Provider::Auto => register_best(&mut builder),
		Provider::Cpu => log_once(|| ui::info("Using CPU execution provider (forced)")),
		Provider::Cuda => {
			if !try_cuda(&mut builder) {
				ui::error("CUDA requested but unavailable, falling back to CPU");
			}
		}
		Provider::Tensorrt => {
			if !try_tensorrt(&mut builder) {
				ui::error("TensorRT requested but unavailable, falling back to CPU");
			}
		}
		Provider::Coreml => {
			#[cfg(target_os = "macos")]
			if !try_coreml(&mut builder) {
				ui::error("CoreML requested but unavailable, falling back to CPU");
			}
			#[cfg(not(target_os = "macos"))]
			ui::error("CoreML only available on macOS, falling back to CPU");
		}
		Provider::Xnnpack => {
			if !try_xnnpack(&mut builder) {
				ui::error("XNNPACK requested but unavailable, falling back to CPU");
			}
		}
	}

	builder
		.with_optimization_level(GraphOptimizationLevel::Level3)?
		.with_intra_threads(options.intra_threads)?
		.commit_from_file(model_path)
		.with_context(|| format!("Failed to load model: {}", model_path.display()))
}

fn log_once(f: impl FnOnce()) {
	PROVIDER_LOGGED.call_once(f);
}

fn register_best(builder: &mut SessionBuilder) {
	if try_tensorrt(builder) || try_cuda(builder) {
		return;
	}

	#[cfg(target_os = "macos")]
	if try_coreml(builder) {
		return;
	}

	if try_xnnpack(builder) {
		return;
	}

	log_once(|| ui::info("Using CPU execution provider"));
}

macro_rules! try_provider {
	($builder:expr, $provider_type:ty, $name:expr) => {{
		use ort::ep::ExecutionProvider;

		ui::debug(&format!("Trying provider: {}", $name));

		let provider = <$provider_type>::default();
		if !provider.is_available().unwrap_or(false) {
			ui::debug(&format!("{} not available", $name));
			return false;
		}

		match provider.register($builder) {
			Ok(_) => {
				log_once(|| ui::success(&format!("Using {} execution provider", $name)));
				true
			}
			Err(e) => {
				ui::debug(&format!("{} registration failed: {}", $name, e));
				false
			}
		}
	}};
}

fn try_cuda(builder: &mut SessionBuilder) -> bool {
	use ort::ep::CUDA;
	try_provider!(builder, CUDA, "CUDA")
}

#[cfg(target_os = "macos")]
fn try_coreml(builder: &mut SessionBuilder) -> bool {
	use ort::ep::CoreML;
	try_provider!(builder, CoreML, "CoreML")
}

fn try_tensorrt(builder: &mut SessionBuilder) -> bool {
	use ort::ep::TensorRT;
	try_provider!(builder, TensorRT, "TensorRT")
}

fn try_xnnpack(builder: &mut SessionBuilder) -> bool {
	use ort::ep::XNNPACK;
	try_provider!(builder, XNNPACK, "XNNPACK")
}
