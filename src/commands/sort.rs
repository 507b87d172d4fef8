//! Sort command - independent prompt rules, one folder each

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use colored::*;

use crate::commands::{print_result, report_applied, run_job, Engine, Report};
use crate::config::{CategorizeConfig, FixedCategory};
use crate::processing::{copy_into_folders, Categorizer, LoadOptions};
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct SortOptions {
	pub directory: PathBuf,
	pub rules: Vec<FixedCategory>,
	pub threshold: Option<f32>,
	pub batch_size: Option<usize>,
	pub output: Option<PathBuf>,
	pub dry_run: bool,
	pub export: Option<PathBuf>,
	pub no_cache: bool,
}

pub fn run(engine: &Engine, options: SortOptions) -> Result<()> {
	let start = Instant::now();

	let mut config = CategorizeConfig::default().with_categories(options.rules.clone());
	if let Some(threshold) = options.threshold {
		config.threshold = threshold;
	}
	if let Some(batch_size) = options.batch_size {
		config.batch_size = batch_size;
	}
	config.validate()?;

	let dir = options.directory.canonicalize().unwrap_or_else(|_| options.directory.clone());
	let dest = options.output.clone().unwrap_or_else(|| dir.clone());
	ui::info(&format!("Sorting {} with {} prompts", ui::path_link(&dir, 40), config.categories.len()));

	let mut provider = engine.provider()?;
	let load_options = LoadOptions::from_config(&config, !options.no_cache);
	let dry_run = options.dry_run;
	let job_dir = dir.clone();
	let job_dest = dest.clone();
	let job_config = config.clone();

	let ((images, result, applied), status) = run_job(&dir, move || {
		let mut working_set = provider.load_directory(&job_dir, &load_options)?;
		let images = working_set.len();
		let matched =
			Categorizer::new(&mut *provider, &job_config).categorize_by_prompts(&working_set, &job_config.categories);
		working_set.release();

		let result = matched?;
		let applied = if dry_run {
			None
		} else {
			Some(copy_into_folders(&result, &job_dir, &job_dest)?)
		};
		Ok((images, result, applied))
	})?;

	let matched: HashSet<&str> = result.iter().flat_map(|c| c.members.iter().map(String::as_str)).collect();
	let unmatched = images.saturating_sub(matched.len());
	ui::success(&format!("{} matches across {} images", result.total_members(), images));
	if unmatched > 0 {
		ui::info(&format!("{} images matched no prompt", unmatched));
	}
	print_result(&result, &dir);
	report_applied(applied.as_ref(), &dest);

	if let Some(path) = &options.export {
		Report::new(&dir, engine.kind, config.threshold, images, status, &result).export(path)?;
	}

	eprintln!("{}", format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed());
	Ok(())
}
