use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, FinragService, Result, retrieval::Retrieval};
use finrag_domain::{AllocationPlan, EvidenceItem, Intent};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
	#[serde(default)]
	pub question: Option<String>,
	#[serde(default)]
	pub n_results: Option<i64>,
	#[serde(default)]
	pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
	pub answer: String,
	pub sources: Vec<SourceDocument>,
	pub used_model: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrieveRequest {
	#[serde(default)]
	pub question: Option<String>,
	#[serde(default)]
	pub n_results: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrieveResponse {
	pub intent: Intent,
	pub plan: AllocationPlan,
	pub sources: Vec<SourceDocument>,
	pub degraded_corpora: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDocument {
	pub text: String,
	pub metadata: Map<String, Value>,
	pub relevance_score: f64,
}
impl From<EvidenceItem> for SourceDocument {
	fn from(item: EvidenceItem) -> Self {
		Self { text: item.text, metadata: item.metadata, relevance_score: item.relevance_score }
	}
}

impl FinragService {
	pub async fn query(&self, req: QueryRequest) -> Result<QueryResponse> {
		let question = required_question(req.question.as_deref())?;
		let n = self.resolve_n(req.n_results)?;
		let used_model = req
			.model
			.as_deref()
			.map(str::trim)
			.filter(|model| !model.is_empty())
			.unwrap_or(self.cfg.providers.llm.default_model.as_str())
			.to_string();
		let Retrieval { evidence, .. } = self.retrieve(question, n).await?;
		let answer = self.answer(question, &evidence, &used_model).await;
		let sources = evidence.into_iter().map(SourceDocument::from).collect();

		Ok(QueryResponse { answer, sources, used_model })
	}

	pub async fn retrieve_sources(&self, req: RetrieveRequest) -> Result<RetrieveResponse> {
		let question = required_question(req.question.as_deref())?;
		let n = self.resolve_n(req.n_results)?;
		let Retrieval { intent, plan, evidence, degraded } = self.retrieve(question, n).await?;

		Ok(RetrieveResponse {
			intent,
			plan,
			sources: evidence.into_iter().map(SourceDocument::from).collect(),
			degraded_corpora: degraded,
		})
	}

	fn resolve_n(&self, requested: Option<i64>) -> Result<u32> {
		let max = self.cfg.retrieval.max_n_results;
		let n = requested.unwrap_or(i64::from(self.cfg.retrieval.default_n_results));

		if n < 1 {
			return Err(Error::invalid("n_results", "n_results must be a positive integer."));
		}
		if n > i64::from(max) {
			return Err(Error::invalid(
				"n_results",
				format!("n_results must not exceed {max}."),
			));
		}

		u32::try_from(n).map_err(|_| Error::invalid("n_results", "n_results is out of range."))
	}
}

fn required_question(question: Option<&str>) -> Result<&str> {
	match question.map(str::trim) {
		Some(question) if !question.is_empty() => Ok(question),
		Some(_) => Err(Error::invalid("question", "question must be a non-empty string.")),
		None => Err(Error::invalid("question", "question is required.")),
	}
}
