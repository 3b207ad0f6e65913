use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::intent::Category;

const PARTS_PER_UNIT: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
	Ceil,
	Floor,
}
impl Rounding {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"ceil" => Some(Self::Ceil),
			"floor" => Some(Self::Floor),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusAllocation {
	pub name: String,
	pub general: f64,
	pub financial: f64,
	pub market: f64,
	pub rounding: Rounding,
}
impl CorpusAllocation {
	pub fn ratio(&self, category: Category) -> f64 {
		match category {
			Category::General => self.general,
			Category::Financial => self.financial,
			Category::Market => self.market,
		}
	}

	/// Always at least one, whatever the ratio says.
	pub fn quota(&self, category: Category, n: u32) -> u32 {
		let parts = (self.ratio(category).clamp(0.0, 1.0) * PARTS_PER_UNIT as f64).round() as u64;
		let scaled = u64::from(n) * parts;
		let quota = match self.rounding {
			Rounding::Ceil => scaled.div_ceil(PARTS_PER_UNIT),
			Rounding::Floor => scaled / PARTS_PER_UNIT,
		};

		u32::try_from(quota).unwrap_or(n).max(1)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPolicy {
	corpora: Vec<CorpusAllocation>,
}
impl AllocationPolicy {
	pub fn new(corpora: Vec<CorpusAllocation>) -> Self {
		Self { corpora }
	}

	/// Builds the policy from an already validated corpus registry.
	pub fn from_config(corpora: &[finrag_config::Corpus]) -> Self {
		let corpora = corpora
			.iter()
			.map(|corpus| CorpusAllocation {
				name: corpus.name.clone(),
				general: corpus.ratios.general,
				financial: corpus.ratios.financial,
				market: corpus.ratios.market,
				rounding: Rounding::parse(&corpus.rounding).unwrap_or(Rounding::Floor),
			})
			.collect();

		Self { corpora }
	}

	pub fn corpora(&self) -> &[CorpusAllocation] {
		&self.corpora
	}

	/// Quotas are independent per corpus; their sum may exceed `n`.
	pub fn plan(&self, category: Category, n: u32) -> AllocationPlan {
		let quotas = self
			.corpora
			.iter()
			.map(|corpus| Quota { corpus: corpus.name.clone(), quota: corpus.quota(category, n) })
			.collect();

		AllocationPlan { category, quotas }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota {
	pub corpus: String,
	pub quota: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
	pub category: Category,
	quotas: Vec<Quota>,
}
impl AllocationPlan {
	pub fn quotas(&self) -> &[Quota] {
		&self.quotas
	}

	pub fn get(&self, corpus: &str) -> Option<u32> {
		self.quotas.iter().find(|quota| quota.corpus == corpus).map(|quota| quota.quota)
	}

	pub fn total(&self) -> u32 {
		self.quotas.iter().map(|quota| quota.quota).sum()
	}
}
impl Serialize for AllocationPlan {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.quotas.len()))?;

		for quota in &self.quotas {
			map.serialize_entry(&quota.corpus, &quota.quota)?;
		}

		map.end()
	}
}
