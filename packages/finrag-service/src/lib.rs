pub mod answer;
pub mod health;
pub mod query;
pub mod registry;
pub mod retrieval;

mod error;

pub use answer::{GENERATION_FAILED_ANSWER, NO_INFORMATION_ANSWER, build_prompt};
pub use error::{Error, Result};
pub use health::HealthResponse;
pub use query::{QueryRequest, QueryResponse, RetrieveRequest, RetrieveResponse, SourceDocument};
pub use registry::{Corpus, CorpusRegistry};
pub use retrieval::Retrieval;

use std::sync::Arc;

use finrag_config::Config;
use finrag_providers::{EmbeddingProvider, GenerationProvider, HttpProviders};

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { embedding, generation }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(HttpProviders);

		Self { embedding: provider.clone(), generation: provider }
	}
}

pub struct FinragService {
	pub cfg: Config,
	pub registry: CorpusRegistry,
	pub providers: Providers,
}
impl FinragService {
	pub fn new(cfg: Config, registry: CorpusRegistry) -> Self {
		Self { cfg, registry, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, registry: CorpusRegistry, providers: Providers) -> Self {
		Self { cfg, registry, providers }
	}
}
