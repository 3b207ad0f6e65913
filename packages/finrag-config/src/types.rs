use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
	pub corpora: Vec<Corpus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub path: String,
	/// Model used when a query does not name one.
	pub default_model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_n_results")]
	pub default_n_results: u32,
	#[serde(default = "default_max_n_results")]
	pub max_n_results: u32,
	/// Deadline for the whole corpus fan-out of one request.
	pub request_timeout_ms: u64,
}

/// One entry of the corpus registry. Order in the file is the registry order.
#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
	pub name: String,
	pub collection: String,
	pub source_type: String,
	/// Either "ceil" or "floor".
	#[serde(default = "default_rounding")]
	pub rounding: String,
	pub ratios: CorpusRatios,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CorpusRatios {
	pub general: f64,
	pub financial: f64,
	pub market: f64,
}

fn default_n_results() -> u32 {
	5
}

fn default_max_n_results() -> u32 {
	50
}

fn default_rounding() -> String {
	"floor".to_string()
}
