// Categorization behavior through the public library API

mod common;

use common::{pseudo_vectors, snapshot, FakeProvider};
use pixsort::config::{CategorizeConfig, FixedCategory};
use pixsort::core::{Embedding, ImageEmbedding, WorkingSet};
use pixsort::processing::{filter_by_prompt, Categorizer, ResidualClusterer};

fn config(labels: &[&str], threshold: f32, max_categories: usize) -> CategorizeConfig {
	CategorizeConfig {
		threshold,
		max_categories,
		..CategorizeConfig::default()
	}
	.with_categories(labels.iter().map(|l| FixedCategory::new(*l)).collect())
}

#[test]
fn cat_and_dog_end_to_end() {
	let mut provider = FakeProvider::new()
		.with_image("A", vec![0.9, 0.19f32.sqrt()])
		.with_image("B", vec![0.1, 0.99f32.sqrt()])
		.with_image("C", vec![0.8, 0.6])
		.with_prompt("cat", vec![1.0, 0.0]);
	let set = provider.working_set();
	let cfg = config(&["cat"], 0.5, 2);

	let result = Categorizer::new(&mut provider, &cfg).auto_categorize(&set).unwrap();

	assert_eq!(
		snapshot(&result),
		vec![
			("cat".to_string(), vec!["A".to_string(), "C".to_string()]),
			("other".to_string(), vec!["B".to_string()]),
		]
	);
}

#[test]
fn first_configured_category_claims_the_overlap() {
	let mut provider = FakeProvider::new()
		.with_image("shared.jpg", vec![1.0, 1.0, 0.0])
		.with_image("plain.jpg", vec![0.0, 0.0, 1.0])
		.with_prompt("beach", vec![1.0, 0.0, 0.0])
		.with_prompt("sunset", vec![0.0, 1.0, 0.0]);
	let set = provider.working_set();

	let forward = config(&["beach", "sunset"], 0.5, 3);
	let result = Categorizer::new(&mut provider, &forward).auto_categorize(&set).unwrap();
	assert_eq!(result.get("beach").unwrap(), ["shared.jpg"]);
	assert!(result.get("sunset").unwrap().is_empty());

	let reversed = config(&["sunset", "beach"], 0.5, 3);
	let result = Categorizer::new(&mut provider, &reversed).auto_categorize(&set).unwrap();
	assert_eq!(result.get("sunset").unwrap(), ["shared.jpg"]);
	assert!(result.get("beach").unwrap().is_empty());
	assert_eq!(result.get("other").unwrap(), ["plain.jpg"]);
}

#[test]
fn every_image_lands_in_exactly_one_category() {
	for n in 1..=12 {
		for fixed in 0..=3 {
			for max_categories in 1..=6 {
				let vectors = pseudo_vectors(n + fixed, 4, (n * 31 + fixed * 7 + max_categories) as u64);
				let mut provider = FakeProvider::new();
				for (i, v) in vectors[..n].iter().enumerate() {
					provider = provider.with_image(&format!("img{:02}.jpg", i), v.clone());
				}
				let labels: Vec<String> = (0..fixed).map(|i| format!("p{}", i)).collect();
				for (label, v) in labels.iter().zip(&vectors[n..]) {
					provider = provider.with_prompt(label, v.clone());
				}

				let set = provider.working_set();
				let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
				let cfg = config(&label_refs, 0.3, max_categories);
				let result = Categorizer::new(&mut provider, &cfg).auto_categorize(&set).unwrap();

				assert!(result.is_partition_of(&set), "n={} fixed={} max={}", n, fixed, max_categories);

				let residual_budget = max_categories.saturating_sub(fixed).max(1);
				let residual = result.labels().filter(|l| l.is_other()).count();
				assert!(residual <= residual_budget);

				let mut seen: Vec<String> = result.labels().map(|l| l.to_string()).collect();
				seen.sort();
				seen.dedup();
				assert_eq!(seen.len(), result.len(), "labels must be distinct");
			}
		}
	}
}

#[test]
fn residual_clusters_fill_the_budget() {
	let mut provider = FakeProvider::new().with_prompt("nothing", vec![0.0, 0.0, 1.0]);
	for (i, v) in pseudo_vectors(9, 2, 5).into_iter().enumerate() {
		provider = provider.with_image(&format!("{}.png", i), vec![v[0], v[1], -1.0]);
	}
	let set = provider.working_set();
	let cfg = config(&["nothing"], 0.5, 5);

	let result = Categorizer::new(&mut provider, &cfg).auto_categorize(&set).unwrap();
	let labels: Vec<String> = result.labels().map(|l| l.to_string()).collect();
	assert_eq!(labels, ["nothing", "other_1", "other_2", "other_3", "other_4"]);
	assert!(result.is_partition_of(&set));
}

#[test]
fn repeated_runs_agree() {
	let mut provider = FakeProvider::new().with_prompt("x", vec![1.0, 0.0, 0.0]);
	for (i, v) in pseudo_vectors(15, 3, 99).into_iter().enumerate() {
		provider = provider.with_image(&format!("{:02}.jpg", i), v);
	}
	let set = provider.working_set();

	let first = filter_by_prompt(&mut provider, "x", &set, 4).unwrap();
	let second = filter_by_prompt(&mut provider, "x", &set, 7).unwrap();
	assert_eq!(first, second);

	let cfg = config(&["x"], 0.2, 4);
	let a = Categorizer::new(&mut provider, &cfg).auto_categorize(&set).unwrap();
	let b = Categorizer::new(&mut provider, &cfg).auto_categorize(&set).unwrap();
	assert_eq!(snapshot(&a), snapshot(&b));
}

#[test]
fn clusterer_partitions_for_any_budget() {
	for n in 1..=10 {
		let vectors = pseudo_vectors(n, 3, n as u64);
		let slices: Vec<&[f32]> = vectors.iter().map(Vec::as_slice).collect();
		for budget in 1..=12 {
			let clusters = ResidualClusterer::default().cluster(&slices, budget).unwrap();
			assert_eq!(clusters.len(), budget.min(n));

			let mut members: Vec<usize> = clusters.iter().flat_map(|c| c.members.clone()).collect();
			members.sort_unstable();
			assert_eq!(members, (0..n).collect::<Vec<_>>());
		}
	}
}

#[test]
fn three_identical_vectors_form_one_cluster() {
	let v = [0.6f32, 0.8];
	let slices: Vec<&[f32]> = vec![&v[..], &v[..], &v[..]];
	let clusters = ResidualClusterer::default().cluster(&slices, 1).unwrap();
	assert_eq!(clusters.len(), 1);
	assert_eq!(clusters[0].members, vec![0, 1, 2]);
}

#[test]
fn prompt_rules_do_not_cluster() {
	let mut provider = FakeProvider::new()
		.with_image("a.jpg", vec![1.0, 0.0])
		.with_image("b.jpg", vec![0.0, 1.0])
		.with_prompt("left", vec![1.0, 0.0]);
	let set = WorkingSet::from_images([
		ImageEmbedding::new("a.jpg", Embedding::new(vec![1.0, 0.0])),
		ImageEmbedding::new("b.jpg", Embedding::new(vec![0.0, 1.0])),
	])
	.unwrap();
	let cfg = CategorizeConfig { threshold: 0.5, ..CategorizeConfig::default() };

	let result = Categorizer::new(&mut provider, &cfg)
		.categorize_by_prompts(&set, &[FixedCategory::new("left")])
		.unwrap();
	assert_eq!(snapshot(&result), vec![("left".to_string(), vec!["a.jpg".to_string()])]);
}
