//! Agglomerative clustering of images no fixed category claimed

use rayon::prelude::*;

use crate::core::embedding::{dot, normalize};
use crate::core::Cluster;
use crate::error::{Error, Result};
use crate::ui;

/// Merges the most similar pair of clusters until the budget is met.
///
/// Vectors are unit-normalized up front, so the dot product of cluster means is a
/// cosine similarity between singletons. Merged means are size-weighted averages of
/// the two previous means; by default they are not renormalized, which keeps scores
/// compatible with earlier releases. Set `renormalize` to put every mean back on the
/// unit sphere after a merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidualClusterer {
	pub renormalize: bool,
}

impl ResidualClusterer {
	pub fn new(renormalize: bool) -> Self {
		Self { renormalize }
	}

	/// Group `vectors` into at most `max_clusters` clusters of input indices.
	///
	/// Returns `min(len, max_clusters)` clusters that together hold every index once.
	pub fn cluster(&self, vectors: &[&[f32]], max_clusters: usize) -> Result<Vec<Cluster>> {
		if vectors.is_empty() {
			return Err(Error::InvalidInput("cannot cluster an empty vector set".into()));
		}
		if max_clusters == 0 {
			return Err(Error::InvalidInput("cluster budget must be at least 1".into()));
		}
		if let Some(bad) = vectors.iter().find(|v| v.len() != vectors[0].len()) {
			return Err(Error::DimensionMismatch { expected: vectors[0].len(), found: bad.len() });
		}

		// Everything lands in one cluster; the first vector stands in for the mean.
		if max_clusters == 1 {
			return Ok(vec![Cluster {
				members: (0..vectors.len()).collect(),
				mean: vectors[0].to_vec(),
			}]);
		}

		let mut clusters: Vec<Cluster> = vectors
			.iter()
			.enumerate()
			.map(|(i, v)| Cluster::singleton(i, normalize(v)))
			.collect();

		let mut round = 0;
		while clusters.len() > max_clusters {
			let (i, j, sim) = most_similar_pair(&clusters);
			let mut merged = clusters[i].merge(&clusters[j]);
			if self.renormalize {
				merged.mean = normalize(&merged.mean);
			}

			round += 1;
			ui::debug(&format!(
				"Merge {}: clusters {} + {} (sim {:.4}, {} members)",
				round,
				i,
				j,
				sim,
				merged.len()
			));

			clusters[i] = merged;
			clusters.remove(j);
		}

		Ok(clusters)
	}
}

/// Highest-similarity pair `(i, j)` with `i < j`.
///
/// Ties go to the first pair met in a row-major scan. Rows are searched in
/// parallel but reduced in row order, so the result matches a sequential scan.
/// NaN similarities never win.
fn most_similar_pair(clusters: &[Cluster]) -> (usize, usize, f32) {
	let row_best: Vec<Option<(usize, usize, f32)>> = (0..clusters.len() - 1)
		.into_par_iter()
		.map(|i| {
			let mut best: Option<(usize, usize, f32)> = None;
			for j in (i + 1)..clusters.len() {
				let sim = score(&clusters[i].mean, &clusters[j].mean);
				let better = match best {
					None => true,
					Some((_, _, b)) => sim > b,
				};
				if better {
					best = Some((i, j, sim));
				}
			}
			best
		})
		.collect();

	let mut best = (0, 1, f32::NEG_INFINITY);
	let mut found = false;
	for (i, j, sim) in row_best.into_iter().flatten() {
		if !found || sim > best.2 {
			best = (i, j, sim);
			found = true;
		}
	}
	best
}

fn score(a: &[f32], b: &[f32]) -> f32 {
	let sim = dot(a, b);
	if sim.is_nan() {
		f32::NEG_INFINITY
	} else {
		sim
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_partition(clusters: &[Cluster], n: usize) {
		let mut all: Vec<usize> = clusters.iter().flat_map(|c| c.members.iter().copied()).collect();
		all.sort_unstable();
		assert_eq!(all, (0..n).collect::<Vec<_>>());
	}

	fn as_slices(vectors: &[Vec<f32>]) -> Vec<&[f32]> {
		vectors.iter().map(Vec::as_slice).collect()
	}

	#[test]
	fn identical_vectors_collapse_into_one() {
		let vectors = vec![vec![1.0, 0.0]; 3];
		let clusters = ResidualClusterer::default().cluster(&as_slices(&vectors), 1).unwrap();
		assert_eq!(clusters.len(), 1);
		assert_eq!(clusters[0].members, vec![0, 1, 2]);
		assert_eq!(clusters[0].mean, vec![1.0, 0.0]);
	}

	#[test]
	fn single_budget_uses_first_vector_as_mean() {
		let vectors = vec![vec![3.0, 4.0], vec![0.0, 1.0]];
		let clusters = ResidualClusterer::default().cluster(&as_slices(&vectors), 1).unwrap();
		assert_eq!(clusters[0].mean, vec![3.0, 4.0]);
	}

	#[test]
	fn tie_break_prefers_lowest_pair() {
		// All pairwise similarities are 1.0, so (0, 1) merges first.
		let vectors = vec![vec![1.0, 0.0]; 4];
		let clusters = ResidualClusterer::default().cluster(&as_slices(&vectors), 3).unwrap();
		assert_eq!(clusters.len(), 3);
		assert_eq!(clusters[0].members, vec![0, 1]);
		assert_eq!(clusters[1].members, vec![2]);
		assert_eq!(clusters[2].members, vec![3]);
	}

	#[test]
	fn separates_two_obvious_groups() {
		let vectors = vec![
			vec![1.0, 0.05, 0.0],
			vec![0.0, 0.1, 1.0],
			vec![0.95, 0.0, 0.05],
			vec![0.05, 0.0, 0.9],
			vec![1.0, 0.1, 0.0],
		];
		let mut clusters = ResidualClusterer::default().cluster(&as_slices(&vectors), 2).unwrap();
		clusters.iter_mut().for_each(|c| c.members.sort_unstable());
		clusters.sort_by_key(|c| c.members[0]);

		assert_eq!(clusters[0].members, vec![0, 2, 4]);
		assert_eq!(clusters[1].members, vec![1, 3]);
	}

	#[test]
	fn cluster_count_matches_budget_and_partitions() {
		let vectors: Vec<Vec<f32>> = (0..17)
			.map(|i| {
				let t = i as f32;
				vec![(t * 1.3).sin(), (t * 0.7).cos(), (t * 2.1).sin() + 0.5]
			})
			.collect();

		for budget in 1..=20 {
			for renormalize in [false, true] {
				let clusters = ResidualClusterer::new(renormalize).cluster(&as_slices(&vectors), budget).unwrap();
				assert_eq!(clusters.len(), budget.min(vectors.len()), "budget {}", budget);
				assert_partition(&clusters, vectors.len());
			}
		}
	}

	#[test]
	fn merged_means_shrink_unless_renormalized() {
		let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];

		let plain = ResidualClusterer::new(false).cluster(&as_slices(&vectors), 2).unwrap();
		let merged = plain.iter().find(|c| c.len() == 2).unwrap();
		assert!(dot(&merged.mean, &merged.mean).sqrt() < 0.99);

		let renormed = ResidualClusterer::new(true).cluster(&as_slices(&vectors), 2).unwrap();
		let merged = renormed.iter().find(|c| c.len() == 2).unwrap();
		assert!((dot(&merged.mean, &merged.mean).sqrt() - 1.0).abs() < 1e-5);
	}

	#[test]
	fn is_deterministic() {
		let vectors: Vec<Vec<f32>> = (0..12).map(|i| vec![(i as f32).sin(), (i as f32).cos()]).collect();
		let a = ResidualClusterer::default().cluster(&as_slices(&vectors), 4).unwrap();
		let b = ResidualClusterer::default().cluster(&as_slices(&vectors), 4).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn rejects_bad_input() {
		let c = ResidualClusterer::default();
		assert!(c.cluster(&[], 2).is_err());
		assert!(c.cluster(&[&[1.0][..]], 0).is_err());
		assert!(matches!(
			c.cluster(&[&[1.0, 0.0][..], &[1.0][..]], 1),
			Err(Error::DimensionMismatch { .. })
		));
	}
}
