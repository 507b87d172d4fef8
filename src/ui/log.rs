//! Unified logging system

use colored::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
       _                      __
  ___ (_)_ __ ___ ___  ____ / /_
 / _ \/ /\ \ // (_-</ _ \/ __/ __/
/ .__/_//_\_\/___/\___/_/  \__/
/_/                               "#;

const TAGLINES: &[&str] = &[
	"Every photo finds a folder",
	"Cats to the left, receipts to the right",
	"Your camera roll, alphabetized by vibes",
	"Two passes, zero drag and drop",
	"Somewhere in here is the beach trip",
	"Sorting hat, but for JPEGs",
];

pub fn random_tagline() -> &'static str {
	TAGLINES[rand::random_range(0..TAGLINES.len())]
}

pub fn print_logo() {
	println!("{}", LOGO.bright_blue().bold());
	println!("{}", random_tagline().dimmed().italic());
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	println!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	println!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!("\n{}", text.bright_blue().bold());
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let name = path
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string());

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, truncate_middle(&name, max_len))
}

/// Shorten to at most `max_len` chars by cutting out the middle
pub fn truncate_middle(text: &str, max_len: usize) -> String {
	let chars: Vec<char> = text.chars().collect();
	if chars.len() <= max_len || max_len < 8 {
		return text.to_string();
	}
	let keep = max_len - 3;
	let head = keep.div_ceil(2);
	let tail = keep - head;
	let mut out: String = chars[..head].iter().collect();
	out.push_str("...");
	out.extend(&chars[chars.len() - tail..]);
	out
}
