//! Agglomerative cluster state

use serde::Serialize;

/// Member indices plus the running mean of their vectors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
	pub members: Vec<usize>,
	pub mean: Vec<f32>,
}

impl Cluster {
	pub fn singleton(index: usize, vector: Vec<f32>) -> Self {
		Self { members: vec![index], mean: vector }
	}

	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Lowest member index, used to order clusters stably
	pub fn first_member(&self) -> Option<usize> {
		self.members.iter().copied().min()
	}

	/// Merge `other` into a new cluster. Members keep `self` first; the mean is the
	/// size-weighted average of both means using pre-merge counts.
	pub fn merge(&self, other: &Cluster) -> Cluster {
		let (na, nb) = (self.len() as f32, other.len() as f32);
		let total = na + nb;

		let mean = self
			.mean
			.iter()
			.zip(other.mean.iter())
			.map(|(a, b)| (a * na + b * nb) / total)
			.collect();

		let mut members = Vec::with_capacity(self.members.len() + other.members.len());
		members.extend_from_slice(&self.members);
		members.extend_from_slice(&other.members);

		Cluster { members, mean }
	}
}
