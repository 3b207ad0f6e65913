use crate::FinragService;

use finrag_domain::EvidenceItem;

pub const NO_INFORMATION_ANSWER: &str =
	"I don't have specific information about this based on the available data.";
pub const GENERATION_FAILED_ANSWER: &str = "Sorry, I couldn't put together an answer right now. \
	The most relevant material found for your question is listed below.";

const INSTRUCTIONS: &str = "\
You are a financial analyst answering questions for end users.
Synthesize one answer across all of the facts below instead of summarizing them one by one.
Only use the facts below. Present them as your own knowledge and never mention documents, \
sources, context, a database or any other retrieval terms.
Write clear, confident prose of two to four short paragraphs, matching the depth of the question.";

/// Renders the generation prompt. Evidence keeps its ranked order, one `- <text>` line each.
pub fn build_prompt(question: &str, evidence: &[EvidenceItem]) -> String {
	let facts = evidence
		.iter()
		.map(|item| format!("- {}", item.text.trim()))
		.collect::<Vec<_>>()
		.join("\n");

	format!(
		"{INSTRUCTIONS}\nIf the facts do not cover the question, reply exactly with: \
		 \"{NO_INFORMATION_ANSWER}\"\n\nFacts:\n{facts}\n\nQuestion:\n{}\n\nAnswer:\n",
		question.trim()
	)
}

impl FinragService {
	/// Never fails: generation errors degrade to [`GENERATION_FAILED_ANSWER`].
	pub async fn answer(&self, question: &str, evidence: &[EvidenceItem], model: &str) -> String {
		if evidence.is_empty() {
			tracing::info!("No evidence retrieved; skipping generation.");

			return NO_INFORMATION_ANSWER.to_string();
		}

		let prompt = build_prompt(question, evidence);

		match self.providers.generation.generate(&self.cfg.providers.llm, model, &prompt).await {
			Ok(answer) if !answer.trim().is_empty() => answer,
			Ok(_) => {
				tracing::warn!(model, "Generation returned an empty answer.");

				GENERATION_FAILED_ANSWER.to_string()
			},
			Err(err) => {
				tracing::warn!(model, error = %err, "Generation failed.");

				GENERATION_FAILED_ANSWER.to_string()
			},
		}
	}
}
