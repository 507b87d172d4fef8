//! pixsort - sort photo folders into categories
//!
//! Fixed prompts claim images first, residual clustering groups the rest.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pixsort::cli::{Cli, Command};
use pixsort::commands::auto::AutoOptions;
use pixsort::commands::search::SearchOptions;
use pixsort::commands::sort::SortOptions;
use pixsort::commands::{self, Engine};
use pixsort::runtime::SessionOptions;
use pixsort::ui::{self, Log};

fn main() {
	if let Err(e) = run() {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();
	Log::set_verbose(cli.verbose);

	let engine = Engine {
		kind: cli.model,
		models_dir: cli.models_dir,
		session: SessionOptions::new(cli.provider),
	};

	match cli.command {
		Command::Auto {
			directory,
			categories,
			config,
			threshold,
			max_categories,
			batch_size,
			renormalize,
			output,
			dry_run,
			export,
			no_cache,
			open,
		} => {
			if export.as_deref().and_then(|p| p.to_str()) != Some("-") {
				ui::print_logo();
			}
			commands::auto::run(
				&engine,
				AutoOptions {
					directory,
					categories,
					config,
					threshold,
					max_categories,
					batch_size,
					renormalize,
					output,
					dry_run,
					export,
					no_cache,
					open,
				},
			)
		}
		Command::Sort {
			directory,
			rules,
			threshold,
			batch_size,
			output,
			dry_run,
			export,
			no_cache,
		} => commands::sort::run(
			&engine,
			SortOptions { directory, rules, threshold, batch_size, output, dry_run, export, no_cache },
		),
		Command::Search {
			prompt,
			directory,
			limit,
			threshold,
			batch_size,
			no_cache,
			open,
		} => commands::search::run(
			&engine,
			SearchOptions { prompt, directory, limit, threshold, batch_size, no_cache, open },
		),
		Command::Clean { directory, all } => commands::clean::run(&directory, all),
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			match subcommand {
				Some(sub) => match cmd.find_subcommand_mut(&sub) {
					Some(sub_cmd) => sub_cmd.print_help()?,
					None => {
						ui::error(&format!("Unknown subcommand: {}", sub));
						cmd.print_help()?;
					}
				},
				None => cmd.print_help()?,
			}
			Ok(())
		}
	}
}
