use std::{collections::HashMap, sync::Arc, time::Duration};

use serde_json::json;

use finrag_domain::Category;
use finrag_service::{Error, FinragService, Providers, Retrieval, registry::CorpusRegistry};
use finrag_storage::corpus::CorpusIndex;
use finrag_testkit::{
	EchoGeneration, FailingCorpus, FailingEmbedding, FixedEmbedding, SlowCorpus, StaticCorpus, hit,
	test_config,
};

fn service(indices: Vec<(&str, Arc<dyn CorpusIndex>)>, providers: Providers) -> FinragService {
	let cfg = test_config();
	let mut indices: HashMap<String, Arc<dyn CorpusIndex>> =
		indices.into_iter().map(|(name, index)| (name.to_string(), index)).collect();
	let registry = CorpusRegistry::from_config(&cfg.corpora, |corpus| {
		indices
			.remove(&corpus.name)
			.unwrap_or_else(|| Arc::new(StaticCorpus::default()) as Arc<dyn CorpusIndex>)
	});

	FinragService::with_providers(cfg, registry, providers)
}

fn index(corpus: impl CorpusIndex + 'static) -> Arc<dyn CorpusIndex> {
	Arc::new(corpus)
}

fn providers(embedding: FixedEmbedding) -> Providers {
	Providers::new(Arc::new(embedding), Arc::new(EchoGeneration::default()))
}

fn news() -> StaticCorpus {
	StaticCorpus::new(vec![hit("news-90", 0.1), hit("news-80", 0.2), hit("news-70", 0.3)])
}

fn annual() -> StaticCorpus {
	StaticCorpus::new(vec![hit("annual-95", 0.05)])
}

fn quarterly() -> StaticCorpus {
	StaticCorpus::new(vec![hit("quarterly-60", 0.4)])
}

fn texts(retrieval: &Retrieval) -> Vec<&str> {
	retrieval.evidence.iter().map(|item| item.text.as_str()).collect()
}

#[tokio::test]
async fn each_corpus_is_searched_with_its_planned_quota() {
	let news = news();
	let annual = annual();
	let quarterly = quarterly();
	let service = service(
		vec![
			("news", index(news.clone())),
			("annual_filings", index(annual.clone())),
			("quarterly_filings", index(quarterly.clone())),
		],
		providers(FixedEmbedding::default()),
	);
	let retrieval = service
		.retrieve("What was the revenue reported in the 2023 annual report?", 10)
		.await
		.expect("retrieval succeeds");

	assert_eq!(retrieval.intent.category, Category::Financial);
	assert_eq!(retrieval.intent.year, Some(2023));
	assert_eq!(news.requested(), vec![5]);
	assert_eq!(annual.requested(), vec![1]);
	assert_eq!(quarterly.requested(), vec![3]);
	assert!(retrieval.degraded.is_empty());
}

#[tokio::test]
async fn evidence_is_merged_by_relevance_and_truncated() {
	let service = service(
		vec![
			("news", index(news())),
			("annual_filings", index(annual())),
			("quarterly_filings", index(quarterly())),
		],
		providers(FixedEmbedding::default()),
	);
	let retrieval = service.retrieve("How are things going?", 3).await.expect("retrieval succeeds");

	assert_eq!(texts(&retrieval), vec!["annual-95", "news-90", "news-80"]);

	let scores: Vec<f64> = retrieval.evidence.iter().map(|item| item.relevance_score).collect();

	assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn evidence_carries_corpus_and_source_type() {
	let service = service(
		vec![("annual_filings", index(annual()))],
		providers(FixedEmbedding::default()),
	);
	let retrieval = service.retrieve("Any dividend news?", 5).await.expect("retrieval succeeds");
	let item = &retrieval.evidence[0];

	assert_eq!(item.corpus, "annual_filings");
	assert_eq!(item.metadata.get("corpus"), Some(&json!("annual_filings")));
	assert_eq!(item.metadata.get("source_type"), Some(&json!("annual_filing")));
}

#[tokio::test]
async fn failing_corpus_degrades_without_failing_the_request() {
	let failing = FailingCorpus::default();
	let service = service(
		vec![
			("news", index(news())),
			("annual_filings", index(annual())),
			("quarterly_filings", index(failing.clone())),
		],
		providers(FixedEmbedding::default()),
	);
	let retrieval =
		service.retrieve("Is the market bullish?", 5).await.expect("partial evidence is returned");

	assert_eq!(failing.calls(), 1);
	assert_eq!(retrieval.degraded, vec!["quarterly_filings".to_string()]);
	assert!(retrieval.evidence.iter().all(|item| item.corpus != "quarterly_filings"));
	assert_eq!(texts(&retrieval), vec!["annual-95", "news-90", "news-80", "news-70"]);
}

#[tokio::test]
async fn corpus_missing_the_deadline_is_abandoned() {
	let slow = SlowCorpus::new(annual(), Duration::from_secs(5));
	let service = service(
		vec![("news", index(news())), ("annual_filings", index(slow))],
		providers(FixedEmbedding::default()),
	);
	let started = std::time::Instant::now();
	let retrieval = service.retrieve("How are things going?", 5).await.expect("retrieval succeeds");

	assert!(started.elapsed() < Duration::from_secs(2));
	assert_eq!(retrieval.degraded, vec!["annual_filings".to_string()]);
	assert_eq!(texts(&retrieval), vec!["news-90", "news-80", "news-70"]);
}

#[tokio::test]
async fn completion_order_does_not_change_the_result() {
	let tied = || StaticCorpus::new(vec![hit("tie", 0.25)]);
	let fast = service(
		vec![("news", index(tied())), ("quarterly_filings", index(tied()))],
		providers(FixedEmbedding::default()),
	);
	let delayed = service(
		vec![
			("news", index(SlowCorpus::new(tied(), Duration::from_millis(50)))),
			("quarterly_filings", index(tied())),
		],
		providers(FixedEmbedding::default()),
	);
	let first = fast.retrieve("Any updates?", 5).await.expect("retrieval succeeds");
	let second = delayed.retrieve("Any updates?", 5).await.expect("retrieval succeeds");

	assert_eq!(first.evidence, second.evidence);

	let corpora: Vec<&str> = first.evidence.iter().map(|item| item.corpus.as_str()).collect();

	assert_eq!(corpora, vec!["news", "quarterly_filings"]);
}

#[tokio::test]
async fn every_corpus_failing_is_a_storage_error() {
	let slow = SlowCorpus::new(annual(), Duration::from_secs(5));
	let service = service(
		vec![
			("news", index(FailingCorpus::default())),
			("annual_filings", index(slow)),
			("quarterly_filings", index(FailingCorpus::default())),
		],
		providers(FixedEmbedding::default()),
	);
	let err = service.retrieve("How are things going?", 5).await.expect_err("no corpus answered");
	let Error::Storage { message } = &err else {
		panic!("Unexpected error: {err}");
	};

	assert!(message.contains("news"));
	assert!(message.contains("annual_filings"));
	assert!(message.contains("quarterly_filings"));
}

#[tokio::test]
async fn empty_corpora_yield_empty_evidence() {
	let service = service(Vec::new(), providers(FixedEmbedding::default()));
	let retrieval = service.retrieve("Anything at all?", 5).await.expect("retrieval succeeds");

	assert!(retrieval.evidence.is_empty());
	assert!(retrieval.degraded.is_empty());
}

#[tokio::test]
async fn embedding_failure_aborts_before_any_search() {
	let news = news();
	let service = service(
		vec![("news", index(news.clone()))],
		Providers::new(Arc::new(FailingEmbedding), Arc::new(EchoGeneration::default())),
	);
	let err = service.retrieve("What is inflation doing?", 5).await.expect_err("embedding fails");

	assert!(matches!(err, Error::Provider { .. }));
	assert!(news.requested().is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_embedder() {
	let embedding = FixedEmbedding::default();
	let service = service(Vec::new(), providers(embedding.clone()));

	for (question, n) in [("   ", 5), ("Valid question?", 0)] {
		let err = service.retrieve(question, n).await.expect_err("input is rejected");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}

	assert_eq!(embedding.calls(), 0);
}
