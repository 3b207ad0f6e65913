use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use finrag_api::{routes, state::AppState};
use finrag_service::{FinragService, Providers, registry::CorpusRegistry};
use finrag_storage::corpus::CorpusIndex;
use finrag_testkit::{
	EchoGeneration, FailingCorpus, FailingEmbedding, FixedEmbedding, StaticCorpus, hit,
	test_config,
};

fn app(providers: Providers) -> Router {
	let cfg = test_config();
	let registry = CorpusRegistry::from_config(&cfg.corpora, |corpus| match corpus.name.as_str() {
		"news" => Arc::new(StaticCorpus::new(vec![
			hit("Bitcoin rallied 5% overnight.", 0.1),
			hit("Tech shares slipped.", 0.3),
		])) as Arc<dyn CorpusIndex>,
		"annual_filings" => {
			let annual = StaticCorpus::new(vec![hit("FY2023 revenue was $4.1B.", 0.2)]);

			Arc::new(annual) as Arc<dyn CorpusIndex>
		},
		_ => Arc::new(FailingCorpus::default()) as Arc<dyn CorpusIndex>,
	});
	let service = FinragService::with_providers(cfg, registry, providers);

	routes::router(AppState::from_service(service))
}

fn default_app() -> Router {
	app(Providers::new(Arc::new(FixedEmbedding::default()), Arc::new(EchoGeneration::default())))
}

async fn post(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri(uri)
				.header("content-type", "application/json")
				.body(Body::from(body))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call the router.");

	read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let value = serde_json::from_slice(&bytes).expect("Response body is not JSON.");

	(status, value)
}

#[tokio::test]
async fn health_reports_counts() {
	let response = default_app()
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");
	let (status, body) = read(response).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!({
			"status": "ok",
			"per_corpus_counts": { "annual_filings": 1, "news": 2, "quarterly_filings": 0 },
			"total_documents": 3
		})
	);
}

#[tokio::test]
async fn query_returns_answer_and_sources() {
	let payload = json!({ "question": "Is crypto bullish right now?", "n_results": 5 });
	let (status, body) = post(default_app(), "/query", payload.to_string()).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["used_model"], json!("llama3.2:3b"));
	assert_eq!(body["answer"], json!("answer from llama3.2:3b"));

	let sources = body["sources"].as_array().expect("sources array");

	assert_eq!(sources.len(), 3);
	assert_eq!(sources[0]["text"], json!("Bitcoin rallied 5% overnight."));
	assert_eq!(sources[0]["metadata"]["corpus"], json!("news"));
	assert_eq!(sources[0]["metadata"]["source_type"], json!("discussion"));

	let first = sources[0]["relevance_score"].as_f64().expect("numeric score");

	assert!((first - 90.0).abs() < 1e-9);
}

#[tokio::test]
async fn query_honors_requested_model() {
	let payload = json!({ "question": "Any news?", "model": "mistral:7b" });
	let (status, body) = post(default_app(), "/query", payload.to_string()).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["used_model"], json!("mistral:7b"));
}

#[tokio::test]
async fn missing_question_is_bad_request() {
	let (status, body) = post(default_app(), "/query", json!({ "n_results": 5 }).to_string()).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], json!("invalid_request"));
	assert_eq!(body["fields"], json!(["question"]));
}

#[tokio::test]
async fn non_positive_n_results_is_bad_request() {
	for n in [0, -1] {
		let payload = json!({ "question": "Any news?", "n_results": n });
		let (status, body) = post(default_app(), "/query", payload.to_string()).await;

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["fields"], json!(["n_results"]));
	}
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
	let (status, body) = post(default_app(), "/query", "{\"question\": ".to_string()).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], json!("invalid_request"));
}

#[tokio::test]
async fn embedding_failure_is_bad_gateway() {
	let app =
		app(Providers::new(Arc::new(FailingEmbedding), Arc::new(EchoGeneration::default())));
	let payload = json!({ "question": "Any news?" });
	let (status, body) = post(app, "/query", payload.to_string()).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(body["error_code"], json!("provider_error"));
}

#[tokio::test]
async fn all_corpora_failing_is_service_unavailable() {
	let cfg = test_config();
	let registry = CorpusRegistry::from_config(&cfg.corpora, |_| {
		Arc::new(FailingCorpus::default()) as Arc<dyn CorpusIndex>
	});
	let providers =
		Providers::new(Arc::new(FixedEmbedding::default()), Arc::new(EchoGeneration::default()));
	let app = routes::router(AppState::from_service(FinragService::with_providers(
		cfg, registry, providers,
	)));
	let (status, body) =
		post(app, "/query", json!({ "question": "Any news?" }).to_string()).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["error_code"], json!("storage_unavailable"));
}

#[tokio::test]
async fn retrieve_exposes_plan_and_degraded_corpora() {
	let payload =
		json!({ "question": "How did the market react to the Fed in 2024?", "n_results": 4 });
	let (status, body) = post(default_app(), "/retrieve", payload.to_string()).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["intent"], json!({ "category": "market", "year": 2024 }));
	assert_eq!(body["plan"], json!({ "news": 3, "annual_filings": 1, "quarterly_filings": 1 }));
	assert_eq!(body["degraded_corpora"], json!(["quarterly_filings"]));
	assert_eq!(body["sources"].as_array().map(Vec::len), Some(3));
}
