//! Auto command - fixed categories first, clustered rest

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use colored::*;

use crate::commands::{print_result, report_applied, run_job, Engine, Report};
use crate::config::{CategorizeConfig, FixedCategory};
use crate::core::CategorizationResult;
use crate::processing::{copy_into_folders, ApplySummary, Categorizer, LoadOptions};
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct AutoOptions {
	pub directory: PathBuf,
	pub categories: Vec<FixedCategory>,
	pub config: Option<PathBuf>,
	pub threshold: Option<f32>,
	pub max_categories: Option<usize>,
	pub batch_size: Option<usize>,
	pub renormalize: bool,
	pub output: Option<PathBuf>,
	pub dry_run: bool,
	pub export: Option<PathBuf>,
	pub no_cache: bool,
	pub open: bool,
}

struct Outcome {
	images: usize,
	result: CategorizationResult,
	applied: Option<ApplySummary>,
}

pub fn run(engine: &Engine, options: AutoOptions) -> Result<()> {
	let start = Instant::now();
	let config = build_config(&options)?;

	let dir = options.directory.canonicalize().unwrap_or_else(|_| options.directory.clone());
	let dest = options.output.clone().unwrap_or_else(|| dir.clone());

	ui::info(&format!("Categorizing {}", ui::path_link(&dir, 40)));
	describe(&config);

	let mut provider = engine.provider()?;
	let load_options = LoadOptions::from_config(&config, !options.no_cache);
	let dry_run = options.dry_run;
	let job_dir = dir.clone();
	let job_dest = dest.clone();
	let job_config = config.clone();

	let (outcome, status) = run_job(&dir, move || {
		let mut working_set = provider.load_directory(&job_dir, &load_options)?;
		let images = working_set.len();
		let categorized = Categorizer::new(&mut *provider, &job_config).auto_categorize(&working_set);
		working_set.release();

		let result = categorized?;
		let applied = if dry_run {
			None
		} else {
			Some(copy_into_folders(&result, &job_dir, &job_dest)?)
		};
		Ok(Outcome { images, result, applied })
	})?;

	ui::success(&format!(
		"{} images in {} categories",
		outcome.images,
		outcome.result.len()
	));
	print_result(&outcome.result, &dir);
	report_applied(outcome.applied.as_ref(), &dest);

	if let Some(path) = &options.export {
		Report::new(&dir, engine.kind, config.threshold, outcome.images, status, &outcome.result).export(path)?;
	}

	if options.open && outcome.applied.is_some() {
		ui::info(&format!("Opening: {}", dest.display()));
		if let Err(e) = open::that(&dest) {
			ui::warn(&format!("Failed to open: {}", e));
		}
	}

	eprintln!("{}", format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed());
	Ok(())
}

/// Config file first, then flags on top
fn build_config(options: &AutoOptions) -> Result<CategorizeConfig> {
	let mut config = match &options.config {
		Some(path) => CategorizeConfig::load(path)?,
		None => CategorizeConfig::default(),
	};

	if !options.categories.is_empty() {
		config.categories = options.categories.clone();
	}
	if let Some(threshold) = options.threshold {
		config.threshold = threshold;
	}
	if let Some(max) = options.max_categories {
		config.max_categories = max;
	}
	if let Some(batch_size) = options.batch_size {
		config.batch_size = batch_size;
	}
	if options.renormalize {
		config.renormalize_means = true;
	}

	config.validate()?;
	Ok(config)
}

fn describe(config: &CategorizeConfig) {
	if config.categories.is_empty() {
		ui::info("No fixed categories, clustering everything");
	} else {
		let labels: Vec<&str> = config.categories.iter().map(|c| c.label.as_str()).collect();
		ui::info(&format!("Fixed categories: {}", labels.join(", ")));
	}
	ui::debug(&format!(
		"threshold={}, max_categories={}, batch_size={}, renormalize={}",
		config.threshold, config.max_categories, config.batch_size, config.renormalize_means
	));
	for category in &config.categories {
		if category.prompt.is_some() {
			ui::debug(&format!("{} -> \"{}\"", category.label, category.prompt()));
		}
	}
}
