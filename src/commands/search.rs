//! Search command - rank a folder against one prompt

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use colored::*;

use crate::commands::Engine;
use crate::config::{CategorizeConfig, DEFAULT_BATCH_SIZE, DEFAULT_THRESHOLD};
use crate::processing::{filter_by_prompt, LoadOptions};
use crate::ui;

#[derive(Debug, Clone)]
pub struct SearchOptions {
	pub prompt: String,
	pub directory: PathBuf,
	pub limit: usize,
	pub threshold: Option<f32>,
	pub batch_size: Option<usize>,
	pub no_cache: bool,
	pub open: bool,
}

pub fn run(engine: &Engine, options: SearchOptions) -> Result<()> {
	let search_start = Instant::now();
	let threshold = options.threshold.unwrap_or(DEFAULT_THRESHOLD);
	let batch_size = options.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
	if options.prompt.trim().is_empty() {
		bail!("Search prompt is empty");
	}

	let dir = options.directory.canonicalize().unwrap_or_else(|_| options.directory.clone());
	ui::info(&format!("Searching for: \"{}\"", options.prompt));

	let mut provider = engine.provider()?;
	let load_options = LoadOptions::from_config(&CategorizeConfig::default(), !options.no_cache);
	let mut working_set = provider.load_directory(&dir, &load_options)?;

	if working_set.is_empty() {
		ui::warn(&format!("No supported images in {}", dir.display()));
		return Ok(());
	}

	let scored = filter_by_prompt(&mut *provider, &options.prompt, &working_set, batch_size);
	let total = working_set.len();
	working_set.release();

	let mut matches = scored?;
	matches.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
	let above = matches.iter().filter(|(_, score)| *score > threshold).count();

	ui::success(&format!(
		"{} of {} images score above {} in {:.2}s",
		above,
		total,
		threshold,
		search_start.elapsed().as_secs_f32()
	));
	ui::header("Results");

	for (i, (id, score)) in matches.iter().take(options.limit).enumerate() {
		let rank = format!("#{}", i + 1).bright_blue().bold();
		let score_text = format!("{:.1}", score);
		let score_text = if *score > threshold { score_text.bright_green() } else { score_text.dimmed() };
		println!("  {} {} {}", rank, ui::path_link(&dir.join(id), 60), score_text);
	}
	println!();

	if options.open {
		if let Some((best, _)) = matches.first() {
			let path = dir.join(best);
			ui::info(&format!("Opening: {}", path.display()));
			if let Err(e) = open::that(&path) {
				ui::warn(&format!("Failed to open: {}", e));
			}
		}
	}

	Ok(())
}
