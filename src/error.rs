//! Library error type

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("invalid target folder: {}", .0.display())]
	InvalidFolder(PathBuf),

	#[error("no supported images found in {}", .0.display())]
	EmptyWorkingSet(PathBuf),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("embedding dimension mismatch: expected {expected}, found {found}")]
	DimensionMismatch { expected: usize, found: usize },

	/// Embedding model failure. Fatal to the running job.
	#[error("embedding provider failed: {0:#}")]
	Provider(anyhow::Error),

	#[error("embedding cache: {0}")]
	Cache(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	pub fn provider(err: impl Into<anyhow::Error>) -> Self {
		Self::Provider(err.into())
	}

	/// Input errors are reported to the caller and never retried.
	pub fn is_input_error(&self) -> bool {
		matches!(
			self,
			Self::InvalidFolder(_) | Self::EmptyWorkingSet(_) | Self::InvalidInput(_)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn provider_error_keeps_context_chain() {
		let inner = anyhow::anyhow!("session crashed").context("text model");
		let err = Error::provider(inner);
		let msg = err.to_string();
		assert!(msg.contains("text model"));
		assert!(msg.contains("session crashed"));
		assert!(!err.is_input_error());
	}

	#[test]
	fn folder_errors_are_input_errors() {
		assert!(Error::InvalidFolder(PathBuf::from("/nope")).is_input_error());
		assert!(Error::EmptyWorkingSet(PathBuf::from("/tmp")).is_input_error());
		assert!(!Error::Config("x".into()).is_input_error());
	}
}
