use std::sync::Arc;

use finrag_domain::AllocationPolicy;
use finrag_storage::corpus::CorpusIndex;

pub const SOURCE_TYPE_METADATA_KEY: &str = "source_type";

#[derive(Clone)]
pub struct Corpus {
	pub name: String,
	pub source_type: String,
	pub index: Arc<dyn CorpusIndex>,
}

/// Immutable after startup; shared read-only by every request.
#[derive(Clone)]
pub struct CorpusRegistry {
	corpora: Vec<Corpus>,
	policy: AllocationPolicy,
}
impl CorpusRegistry {
	pub fn from_config<F>(corpora: &[finrag_config::Corpus], mut open: F) -> Self
	where
		F: FnMut(&finrag_config::Corpus) -> Arc<dyn CorpusIndex>,
	{
		let policy = AllocationPolicy::from_config(corpora);
		let corpora = corpora
			.iter()
			.map(|corpus| Corpus {
				name: corpus.name.clone(),
				source_type: corpus.source_type.clone(),
				index: open(corpus),
			})
			.collect();

		Self { corpora, policy }
	}

	pub fn corpora(&self) -> &[Corpus] {
		&self.corpora
	}

	pub fn policy(&self) -> &AllocationPolicy {
		&self.policy
	}
}
