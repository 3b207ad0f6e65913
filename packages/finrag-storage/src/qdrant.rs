use std::sync::Arc;

use qdrant_client::{
	Qdrant,
	qdrant::{
		CollectionInfo, CountPointsBuilder, Distance, Query, QueryPointsBuilder, VectorParams,
		vectors_config,
	},
};

use finrag_domain::{BoxFuture, Hit};

use crate::{Error, Result, corpus::CorpusIndex, payload};

pub struct QdrantStore {
	pub client: Arc<Qdrant>,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &finrag_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client: Arc::new(client), vector_dim: cfg.vector_dim })
	}

	/// Fails on the first configured corpus whose collection is absent, unreachable, or not
	/// a cosine collection of `vector_dim` dimensions.
	pub async fn ensure_collections(&self, corpora: &[finrag_config::Corpus]) -> Result<()> {
		for corpus in corpora {
			if !self.client.collection_exists(corpus.collection.as_str()).await? {
				return Err(Error::MissingCollection {
					corpus: corpus.name.clone(),
					collection: corpus.collection.clone(),
				});
			}

			let info = self.client.collection_info(corpus.collection.as_str()).await?;

			check_vector_params(
				corpus,
				info.result.as_ref().and_then(default_vector_params),
				self.vector_dim,
			)?;
		}

		Ok(())
	}

	pub fn corpus(&self, collection: &str) -> QdrantCorpus {
		QdrantCorpus { client: self.client.clone(), collection: collection.to_string() }
	}
}

/// Searches go to the unnamed vector, so named-vector collections have no usable params.
fn default_vector_params(info: &CollectionInfo) -> Option<&VectorParams> {
	match info.config.as_ref()?.params.as_ref()?.vectors_config.as_ref()?.config.as_ref()? {
		vectors_config::Config::Params(params) => Some(params),
		vectors_config::Config::ParamsMap(_) => None,
	}
}

/// Hit distances are derived as `1 - score`, which holds only for cosine similarity.
fn check_vector_params(
	corpus: &finrag_config::Corpus,
	params: Option<&VectorParams>,
	vector_dim: u32,
) -> Result<()> {
	let incompatible = |reason: String| Error::IncompatibleCollection {
		corpus: corpus.name.clone(),
		collection: corpus.collection.clone(),
		reason,
	};
	let Some(params) = params else {
		return Err(incompatible("no unnamed vector is configured".to_string()));
	};

	if params.distance() != Distance::Cosine {
		return Err(incompatible(format!(
			"distance is {}, expected Cosine",
			params.distance().as_str_name()
		)));
	}
	if params.size != u64::from(vector_dim) {
		return Err(incompatible(format!(
			"vector size is {}, expected {vector_dim}",
			params.size
		)));
	}

	Ok(())
}

/// Gateway over one cosine-distance collection.
pub struct QdrantCorpus {
	client: Arc<Qdrant>,
	collection: String,
}
impl QdrantCorpus {
	pub fn collection(&self) -> &str {
		&self.collection
	}

	async fn search_points(&self, vector: &[f32], k: u32) -> Result<Vec<Hit>> {
		if k == 0 {
			return Err(Error::InvalidArgument("k must be at least 1.".to_string()));
		}

		let request = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.limit(u64::from(k))
			.with_payload(true);
		let response = self.client.query(request).await?;

		Ok(payload::hits_from_points(&self.collection, response.result))
	}

	async fn count_points(&self) -> Result<u64> {
		let response =
			self.client.count(CountPointsBuilder::new(self.collection.clone()).exact(true)).await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}
}
impl CorpusIndex for QdrantCorpus {
	fn search<'a>(&'a self, vector: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<Hit>>> {
		Box::pin(self.search_points(vector, k))
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		Box::pin(self.count_points())
	}
}
