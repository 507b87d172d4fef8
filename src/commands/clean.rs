//! Clean command - remove stale cached embeddings

use std::path::Path;

use anyhow::Result;

use crate::storage;
use crate::ui;

pub fn run(dir: &Path, all: bool) -> Result<()> {
	ui::info(&format!("Cleaning cache in {}", ui::path_link(dir, 40)));

	let summary = storage::clean(dir, all)?;

	if summary.removed == 0 {
		ui::success("No stale sidecars found");
	} else if all {
		ui::success(&format!("Removed the cache ({} sidecars)", summary.removed));
	} else {
		ui::success(&format!("Cleaned {} sidecars, {} still current", summary.removed, summary.kept));
	}

	Ok(())
}
