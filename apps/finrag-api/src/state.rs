use std::sync::Arc;

use finrag_config::Config;
use finrag_service::{FinragService, registry::CorpusRegistry};
use finrag_storage::{corpus::CorpusIndex, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FinragService>,
}
impl AppState {
	/// Fails unless every configured collection exists, so the listener is never bound
	/// without a usable corpus registry.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let store = QdrantStore::new(&config.storage.qdrant)?;

		store.ensure_collections(&config.corpora).await?;

		let registry = CorpusRegistry::from_config(&config.corpora, |corpus| {
			Arc::new(store.corpus(&corpus.collection)) as Arc<dyn CorpusIndex>
		});

		tracing::info!(corpora = registry.corpora().len(), "Corpus registry ready.");

		Ok(Self::from_service(FinragService::new(config, registry)))
	}

	pub fn from_service(service: FinragService) -> Self {
		Self { service: Arc::new(service) }
	}
}
