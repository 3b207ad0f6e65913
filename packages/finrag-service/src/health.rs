use std::collections::BTreeMap;

use serde::Serialize;

use crate::FinragService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
	pub status: String,
	pub per_corpus_counts: BTreeMap<String, u64>,
	pub total_documents: u64,
}

impl FinragService {
	/// Exact per-corpus counts. A corpus whose count fails is reported as 0.
	pub async fn health(&self) -> HealthResponse {
		let mut per_corpus_counts = BTreeMap::new();

		for corpus in self.registry.corpora() {
			let count = match corpus.index.count().await {
				Ok(count) => count,
				Err(err) => {
					tracing::warn!(corpus = %corpus.name, error = %err, "Corpus count failed.");

					0
				},
			};

			per_corpus_counts.insert(corpus.name.clone(), count);
		}

		let total_documents = per_corpus_counts.values().sum();

		HealthResponse { status: "ok".to_string(), per_corpus_counts, total_documents }
	}
}
