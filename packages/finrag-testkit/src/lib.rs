//! Deterministic in-process fakes for the corpus stores and model providers.

pub mod corpus;
pub mod providers;

pub use corpus::{FailingCorpus, SlowCorpus, StaticCorpus};
pub use providers::{EchoGeneration, FailingEmbedding, FailingGeneration, FixedEmbedding};

use serde_json::Map;

use finrag_config::{
	Config, Corpus, CorpusRatios, EmbeddingProviderConfig, LlmProviderConfig, Providers, Qdrant,
	Retrieval, Service, Storage,
};
use finrag_domain::Hit;

pub const TEST_VECTOR_DIM: u32 = 4;

/// Three-corpus registry mirroring the reference deployment: news, annual and quarterly filings.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant { url: "http://127.0.0.1:6334".to_string(), vector_dim: TEST_VECTOR_DIM },
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: None,
				path: "/v1/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			llm: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: None,
				path: "/v1/chat/completions".to_string(),
				default_model: "llama3.2:3b".to_string(),
				temperature: 0.2,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		retrieval: Retrieval { default_n_results: 5, max_n_results: 50, request_timeout_ms: 200 },
		corpora: vec![
			corpus("news", "finance_news", "discussion", "ceil", [0.70, 0.50, 0.75]),
			corpus("annual_filings", "sec_10k", "annual_filing", "floor", [0.15, 0.15, 0.10]),
			corpus("quarterly_filings", "sec_10q", "quarterly_filing", "floor", [0.15, 0.35, 0.15]),
		],
	}
}

pub fn hit(text: &str, distance: f64) -> Hit {
	Hit { text: text.to_string(), metadata: Map::new(), distance }
}

fn corpus(
	name: &str,
	collection: &str,
	source_type: &str,
	rounding: &str,
	[general, financial, market]: [f64; 3],
) -> Corpus {
	Corpus {
		name: name.to_string(),
		collection: collection.to_string(),
		source_type: source_type.to_string(),
		rounding: rounding.to_string(),
		ratios: CorpusRatios { general, financial, market },
	}
}
