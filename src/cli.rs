use clap::builder::styling::{AnsiColor, Styles};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{FixedCategory, REPORT_FILE};
use crate::models::ModelKind;
use crate::runtime::Provider;

fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Blue.on_default().bold())
		.usage(AnsiColor::Blue.on_default().bold())
		.literal(AnsiColor::Blue.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
		.valid(AnsiColor::Blue.on_default())
		.invalid(AnsiColor::Red.on_default())
}

#[derive(Parser, Debug)]
#[command(
	name = "pixsort",
	author,
	version,
	about = "Sort photo folders into categories with CLIP embeddings",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {auto}    {auto_args}   {auto_desc}
  {bin} {auto}    {auto_only_args}               {auto_only_desc}
  {bin} {sort}    {sort_args}    {sort_desc}
  {bin} {search}  {search_args}          {search_desc}
  {bin} {help}    {help_args}                        {help_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "pixsort".bright_blue(),
		auto = "auto".yellow(),
		auto_args = "-d ./photos -c cat -c dog",
		auto_desc = "Cats, dogs, and clustered rest".dimmed(),
		auto_only_args = "-d ./photos",
		auto_only_desc = "Cluster everything".dimmed(),
		sort = "sort".yellow(),
		sort_args = "-d ./photos -f beach=\"sandy beach\"",
		sort_desc = "Copy matches of a prompt".dimmed(),
		search = "search".yellow(),
		search_args = "\"sunset\" -d ./photos",
		search_desc = "Rank images by prompt".dimmed(),
		help = "help".yellow(),
		help_args = "auto",
		help_desc = "Show help for auto".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	/// Embedding model
	#[arg(short = 'm', long = "model", global = true, default_value = "clip")]
	pub model: ModelKind,

	/// Directory holding one subfolder per model (overrides PIXSORT_MODELS_DIR)
	#[arg(long = "models-dir", global = true, value_name = "DIR")]
	pub models_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Sort a folder into fixed categories, clustering whatever is left
	Auto {
		/// Folder of photos
		#[arg(short = 'd', long = "dir", default_value = ".")]
		directory: PathBuf,

		/// Fixed category, checked in the order given: LABEL or LABEL=PROMPT
		#[arg(short = 'c', long = "category", value_name = "LABEL[=PROMPT]", value_parser = FixedCategory::parse)]
		categories: Vec<FixedCategory>,

		/// JSON config file; flags given here override its values
		#[arg(long = "config", value_name = "FILE")]
		config: Option<PathBuf>,

		/// Minimum score for a category to claim an image (default: 22)
		#[arg(short = 't', long = "threshold", allow_negative_numbers = true)]
		threshold: Option<f32>,

		/// Total categories including residual clusters (default: 6)
		#[arg(long = "max-categories")]
		max_categories: Option<usize>,

		/// Images scored per similarity batch (default: 20)
		#[arg(long = "batch-size")]
		batch_size: Option<usize>,

		/// Renormalize cluster means after each merge
		#[arg(long = "renormalize")]
		renormalize: bool,

		/// Where category folders are created (default: the photo folder)
		#[arg(short = 'o', long = "output", value_name = "DIR")]
		output: Option<PathBuf>,

		/// Categorize without copying anything
		#[arg(long = "dry-run")]
		dry_run: bool,

		/// Write a JSON report to PATH (default: pixsort-report.json), or stdout with "-"
		#[arg(long = "export", value_name = "PATH", num_args = 0..=1, default_missing_value = REPORT_FILE)]
		export: Option<PathBuf>,

		/// Ignore and do not write cached embeddings
		#[arg(long = "no-cache")]
		no_cache: bool,

		/// Open the output folder when done
		#[arg(long = "open")]
		open: bool,
	},

	/// Copy images matching each prompt into its folder (images may match several)
	Sort {
		/// Folder of photos
		#[arg(short = 'd', long = "dir", default_value = ".")]
		directory: PathBuf,

		/// Output folder and prompt: NAME=PROMPT (or NAME to use the name as prompt)
		#[arg(short = 'f', long = "folder", value_name = "NAME=PROMPT", required = true, value_parser = FixedCategory::parse)]
		rules: Vec<FixedCategory>,

		/// Minimum score for a match (default: 22)
		#[arg(short = 't', long = "threshold", allow_negative_numbers = true)]
		threshold: Option<f32>,

		/// Images scored per similarity batch (default: 20)
		#[arg(long = "batch-size")]
		batch_size: Option<usize>,

		/// Where folders are created (default: the photo folder)
		#[arg(short = 'o', long = "output", value_name = "DIR")]
		output: Option<PathBuf>,

		/// Match without copying anything
		#[arg(long = "dry-run")]
		dry_run: bool,

		/// Write a JSON report to PATH (default: pixsort-report.json), or stdout with "-"
		#[arg(long = "export", value_name = "PATH", num_args = 0..=1, default_missing_value = REPORT_FILE)]
		export: Option<PathBuf>,

		/// Ignore and do not write cached embeddings
		#[arg(long = "no-cache")]
		no_cache: bool,
	},

	/// Rank a folder's images against a prompt
	Search {
		/// Text prompt
		#[arg(value_name = "PROMPT")]
		prompt: String,

		/// Folder of photos
		#[arg(short = 'd', long = "dir", default_value = ".")]
		directory: PathBuf,

		/// Number of results
		#[arg(short = 'n', long = "limit", default_value_t = 10)]
		limit: usize,

		/// Score that counts as a match (default: 22)
		#[arg(short = 't', long = "threshold", allow_negative_numbers = true)]
		threshold: Option<f32>,

		/// Images scored per similarity batch (default: 20)
		#[arg(long = "batch-size")]
		batch_size: Option<usize>,

		/// Ignore and do not write cached embeddings
		#[arg(long = "no-cache")]
		no_cache: bool,

		/// Open best match in default viewer
		#[arg(long = "open")]
		open: bool,
	},

	/// Remove stale cached embeddings
	Clean {
		/// Folder of photos
		#[arg(short = 'd', long = "dir", default_value = ".")]
		directory: PathBuf,

		/// Delete the whole cache, not just stale entries
		#[arg(long = "all")]
		all: bool,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
