use std::{collections::BTreeMap, sync::Arc, time::Duration};

use serde_json::Value;
use tokio::{
	task::JoinSet,
	time::{self, Instant},
};

use crate::{Error, FinragService, Result, registry::SOURCE_TYPE_METADATA_KEY};
use finrag_domain::{AllocationPlan, EvidenceItem, Hit, Intent, classify, merge_rank};

/// Outcome of one retrieval pass.
///
/// `degraded` names the corpora that were planned but contributed nothing because their
/// store failed or missed the deadline, in registry order. When every planned corpus is
/// degraded, `retrieve` fails with [`Error::Storage`] instead.
#[derive(Debug, Clone)]
pub struct Retrieval {
	pub intent: Intent,
	pub plan: AllocationPlan,
	pub evidence: Vec<EvidenceItem>,
	pub degraded: Vec<String>,
}

impl FinragService {
	pub async fn retrieve(&self, question: &str, n: u32) -> Result<Retrieval> {
		if question.trim().is_empty() {
			return Err(Error::invalid("question", "question must be a non-empty string."));
		}
		if n == 0 {
			return Err(Error::invalid("n_results", "n_results must be at least 1."));
		}

		let vector = self.providers.embedding.embed(&self.cfg.providers.embedding, question).await?;
		let intent = classify(question);
		let plan = self.registry.policy().plan(intent.category, n);

		tracing::info!(
			category = intent.category.as_str(),
			year = ?intent.year,
			n,
			planned = plan.total(),
			"Planned corpus allocation."
		);

		let hits = self.fan_out(Arc::new(vector), &plan).await;
		let degraded: Vec<String> = plan
			.quotas()
			.iter()
			.filter(|quota| !hits.contains_key(&quota.corpus))
			.map(|quota| quota.corpus.clone())
			.collect();

		if degraded.len() == plan.quotas().len() {
			return Err(Error::Storage {
				message: format!("No corpus answered: {}.", degraded.join(", ")),
			});
		}
		if !degraded.is_empty() {
			tracing::warn!(?degraded, "Answering with partial evidence.");
		}

		let evidence = merge_rank(hits, n as usize);

		Ok(Retrieval { intent, plan, evidence, degraded })
	}

	/// Queries every planned corpus concurrently under one shared deadline.
	///
	/// Only corpora that answered in time appear in the returned map.
	async fn fan_out(
		&self,
		vector: Arc<Vec<f32>>,
		plan: &AllocationPlan,
	) -> BTreeMap<String, Vec<Hit>> {
		let deadline = Instant::now() + Duration::from_millis(self.cfg.retrieval.request_timeout_ms);
		let mut tasks = JoinSet::new();

		for corpus in self.registry.corpora() {
			let Some(k) = plan.get(&corpus.name) else {
				continue;
			};
			let index = corpus.index.clone();
			let vector = vector.clone();
			let name = corpus.name.clone();
			let source_type = corpus.source_type.clone();

			tasks.spawn(async move {
				let result = index.search(&vector, k).await.map(|hits| {
					hits.into_iter().map(|hit| tag_source_type(hit, &source_type)).collect::<Vec<_>>()
				});

				(name, k, result)
			});
		}

		let mut hits = BTreeMap::new();

		loop {
			match time::timeout_at(deadline, tasks.join_next()).await {
				Ok(Some(Ok((name, k, Ok(found))))) => {
					tracing::debug!(corpus = %name, k, returned = found.len(), "Corpus search finished.");

					hits.insert(name, found);
				},
				Ok(Some(Ok((name, k, Err(err))))) => {
					tracing::warn!(corpus = %name, k, error = %err, "Corpus search failed.");
				},
				Ok(Some(Err(err))) => {
					tracing::warn!(error = %err, "Corpus search task did not complete.");
				},
				Ok(None) => break,
				Err(_) => {
					tracing::warn!(
						pending = tasks.len(),
						timeout_ms = self.cfg.retrieval.request_timeout_ms,
						"Corpus search deadline elapsed."
					);
					tasks.abort_all();

					break;
				},
			}
		}

		hits
	}
}

fn tag_source_type(mut hit: Hit, source_type: &str) -> Hit {
	hit.metadata
		.entry(SOURCE_TYPE_METADATA_KEY)
		.or_insert_with(|| Value::String(source_type.to_string()));

	hit
}
