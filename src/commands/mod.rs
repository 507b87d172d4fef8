//! # Command Implementations
//!
//! Each submodule handles one CLI command (auto, sort, search, clean).
//! Shared here: building the embedding engine, running tracked jobs, and
//! printing or exporting a categorization.

pub mod auto;
pub mod clean;
pub mod search;
pub mod sort;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use colored::*;
use serde::Serialize;

use crate::config::ModelPaths;
use crate::core::{CategorizationResult, CategoryLabel};
use crate::jobs::{JobStatus, JobTracker};
use crate::models::{self, EmbeddingProvider, ModelKind};
use crate::processing::ApplySummary;
use crate::runtime::SessionOptions;
use crate::ui;

const PREVIEW_COUNT: usize = 5;

/// Everything needed to build an embedding engine for one run
#[derive(Debug, Clone)]
pub struct Engine {
	pub kind: ModelKind,
	pub models_dir: Option<PathBuf>,
	pub session: SessionOptions,
}

impl Engine {
	pub fn provider(&self) -> Result<Box<dyn EmbeddingProvider>> {
		let paths = ModelPaths::resolve(self.kind, self.models_dir.as_deref()).ok_or_else(|| {
			anyhow!(
				"No models directory found. Pass --models-dir or set {}",
				crate::config::MODELS_DIR_ENV
			)
		})?;

		let start = Instant::now();
		let provider = models::create_provider(self.kind, paths, self.session)
			.with_context(|| format!("Failed to set up the {} model", self.kind))?;
		ui::debug(&format!("{} engine ready in {:.2}s", self.kind, start.elapsed().as_secs_f32()));
		Ok(provider)
	}
}

/// Run `work` as the tracked job for `folder` and wait for it
pub(crate) fn run_job<T, F>(folder: &Path, work: F) -> Result<(T, JobStatus)>
where
	T: Send + 'static,
	F: FnOnce() -> crate::Result<T> + Send + 'static,
{
	let tracker = JobTracker::new();
	let key = folder.display().to_string();

	let handle = tracker.spawn(key.clone(), work)?;
	let outcome = handle.join();
	let status = tracker.status(&key);
	ui::debug(&format!("Job {}: {:?}", key, status));

	let value = outcome.with_context(|| format!("Job for {} failed", folder.display()))?;
	Ok((value, status))
}

/// Category listing with a few clickable members each
pub(crate) fn print_result(result: &CategorizationResult, source: &Path) {
	for category in result {
		let label = match &category.label {
			CategoryLabel::Fixed(_) => category.label.to_string().bright_cyan(),
			CategoryLabel::Other(_) => category.label.to_string().bright_yellow(),
		};
		eprintln!("\n{} ({} images)", label, category.members.len());

		for (i, id) in category.members.iter().take(PREVIEW_COUNT).enumerate() {
			eprintln!("  {} {}", format!("[{}]", i + 1).dimmed(), ui::path_link(&source.join(id), 60));
		}
		if category.members.len() > PREVIEW_COUNT {
			eprintln!(
				"  {}",
				format!("... and {} more", category.members.len() - PREVIEW_COUNT).dimmed()
			);
		}
	}
	eprintln!();
}

pub(crate) fn report_applied(applied: Option<&ApplySummary>, dest: &Path) {
	match applied {
		Some(summary) => ui::success(&format!(
			"Copied {} images into {} folders under {}",
			summary.copied,
			summary.folders.len(),
			ui::path_link(dest, 40)
		)),
		None => ui::info("Dry run, nothing copied"),
	}
}

#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
	pub timestamp: String,
	pub folder: String,
	pub model: ModelKind,
	pub threshold: f32,
	pub total_images: usize,
	pub status: JobStatus,
	pub categories: &'a CategorizationResult,
}

impl<'a> Report<'a> {
	pub fn new(
		folder: &Path,
		model: ModelKind,
		threshold: f32,
		total_images: usize,
		status: JobStatus,
		categories: &'a CategorizationResult,
	) -> Self {
		Self {
			timestamp: chrono::Local::now().to_rfc3339(),
			folder: folder.to_string_lossy().to_string(),
			model,
			threshold,
			total_images,
			status,
			categories,
		}
	}

	/// Pretty JSON to `path`, or stdout for `-`
	pub fn export(&self, path: &Path) -> Result<()> {
		let json = serde_json::to_string_pretty(self)?;

		if path.to_str() == Some("-") || path.as_os_str().is_empty() {
			println!("{}", json);
		} else {
			std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
			ui::success(&format!("Exported to {}", path.display()));
		}

		Ok(())
	}
}
