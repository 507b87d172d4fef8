//! Background categorization jobs and their status

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ui;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
	NotStarted,
	Processing,
	Completed,
	Error(String),
}

/// Thread-safe status store, one entry per job key (usually the target folder).
///
/// At most one job per key runs at a time.
#[derive(Debug, Clone, Default)]
pub struct JobTracker {
	statuses: Arc<Mutex<HashMap<String, JobStatus>>>,
}

impl JobTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn status(&self, key: &str) -> JobStatus {
		self.lock().get(key).cloned().unwrap_or(JobStatus::NotStarted)
	}

	/// Run `work` on a worker thread under `key`.
	///
	/// The key reads `Processing` until the work returns, then `Completed` or
	/// `Error` with the failure message.
	pub fn spawn<T, F>(&self, key: impl Into<String>, work: F) -> Result<JobHandle<T>>
	where
		T: Send + 'static,
		F: FnOnce() -> Result<T> + Send + 'static,
	{
		let key = key.into();
		{
			let mut statuses = self.lock();
			if statuses.get(&key) == Some(&JobStatus::Processing) {
				return Err(Error::InvalidInput(format!("a job for '{}' is already running", key)));
			}
			statuses.insert(key.clone(), JobStatus::Processing);
		}
		ui::debug(&format!("Job started: {}", key));

		let tracker = self.clone();
		let job_key = key.clone();
		let spawned = thread::Builder::new().name("pixsort-job".into()).spawn(move || {
			let outcome = work();
			let status = match &outcome {
				Ok(_) => JobStatus::Completed,
				Err(e) => JobStatus::Error(e.to_string()),
			};
			ui::debug(&format!("Job finished: {} ({:?})", job_key, status));
			tracker.set(&job_key, status);
			outcome
		});

		match spawned {
			Ok(handle) => Ok(JobHandle { key, tracker: self.clone(), handle }),
			Err(e) => {
				self.set(&key, JobStatus::Error(e.to_string()));
				Err(Error::Io(e))
			}
		}
	}

	fn set(&self, key: &str, status: JobStatus) {
		self.lock().insert(key.to_string(), status);
	}

	fn lock(&self) -> MutexGuard<'_, HashMap<String, JobStatus>> {
		self.statuses.lock().unwrap_or_else(|e| e.into_inner())
	}
}

pub struct JobHandle<T> {
	key: String,
	tracker: JobTracker,
	handle: thread::JoinHandle<Result<T>>,
}

impl<T> JobHandle<T> {
	/// Wait for the job and return what the work returned
	pub fn join(self) -> Result<T> {
		match self.handle.join() {
			Ok(outcome) => outcome,
			Err(_) => {
				let message = format!("job '{}' panicked", self.key);
				self.tracker.set(&self.key, JobStatus::Error(message.clone()));
				Err(Error::provider(anyhow::anyhow!(message)))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::mpsc;

	#[test]
	fn unknown_keys_have_not_started() {
		assert_eq!(JobTracker::new().status("/photos"), JobStatus::NotStarted);
	}

	#[test]
	fn success_marks_completed() {
		let tracker = JobTracker::new();
		let value = tracker.spawn("/photos", || Ok(42)).unwrap().join().unwrap();
		assert_eq!(value, 42);
		assert_eq!(tracker.status("/photos"), JobStatus::Completed);
	}

	#[test]
	fn failure_marks_error_with_message() {
		let tracker = JobTracker::new();
		let handle = tracker
			.spawn("/photos", || -> Result<()> { Err(Error::InvalidInput("boom".into())) })
			.unwrap();
		assert!(handle.join().is_err());
		match tracker.status("/photos") {
			JobStatus::Error(msg) => assert!(msg.contains("boom")),
			other => panic!("unexpected status {:?}", other),
		}
	}

	#[test]
	fn second_job_for_running_key_is_rejected() {
		let tracker = JobTracker::new();
		let (release, gate) = mpsc::channel::<()>();

		let first = tracker
			.spawn("/photos", move || {
				gate.recv().ok();
				Ok(())
			})
			.unwrap();
		assert_eq!(tracker.status("/photos"), JobStatus::Processing);
		assert!(tracker.spawn("/photos", || Ok(())).is_err());
		assert!(tracker.spawn("/other", || Ok(())).unwrap().join().is_ok());

		release.send(()).unwrap();
		first.join().unwrap();
		assert_eq!(tracker.status("/photos"), JobStatus::Completed);
		assert!(tracker.spawn("/photos", || Ok(())).unwrap().join().is_ok());
	}

	#[test]
	fn status_serializes_snake_case() {
		assert_eq!(serde_json::to_string(&JobStatus::NotStarted).unwrap(), "\"not_started\"");
		assert_eq!(serde_json::to_string(&JobStatus::Completed).unwrap(), "\"completed\"");
	}
}
