use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub const CORPUS_METADATA_KEY: &str = "corpus";

/// One nearest-neighbor result from a single corpus, nearest first within its corpus.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hit {
	pub text: String,
	pub metadata: Map<String, Value>,
	/// Cosine distance in `[0, 2]`.
	pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EvidenceItem {
	pub corpus: String,
	pub text: String,
	pub metadata: Map<String, Value>,
	pub relevance_score: f64,
}
impl EvidenceItem {
	pub fn from_hit(corpus: &str, hit: Hit) -> Self {
		let Hit { text, mut metadata, distance } = hit;

		metadata
			.entry(CORPUS_METADATA_KEY)
			.or_insert_with(|| Value::String(corpus.to_string()));

		Self { corpus: corpus.to_string(), text, metadata, relevance_score: relevance_score(distance) }
	}
}

pub fn relevance_score(distance: f64) -> f64 {
	(1.0 - distance) * 100.0
}

/// Scores every hit, orders the union by descending score and keeps the first `n`.
///
/// The map iterates corpora by name, and the sort is stable, so equal scores keep
/// corpus-then-rank order no matter which corpus answered first.
pub fn merge_rank(hits_per_corpus: BTreeMap<String, Vec<Hit>>, n: usize) -> Vec<EvidenceItem> {
	let mut items: Vec<EvidenceItem> = hits_per_corpus
		.into_iter()
		.flat_map(|(corpus, hits)| {
			hits.into_iter().map(move |hit| EvidenceItem::from_hit(&corpus, hit))
		})
		.collect();

	items.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
	items.truncate(n);

	items
}
