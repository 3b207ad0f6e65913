use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

pub async fn embed(cfg: &finrag_config::EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [text],
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let vector = parse_embedding_response(json)?;

	if vector.len() != cfg.dimensions as usize {
		return Err(Error::InvalidResponse {
			message: format!(
				"Embedding has {} dimensions, expected {}.",
				vector.len(),
				cfg.dimensions
			),
		});
	}

	Ok(vector)
}

fn parse_embedding_response(json: Value) -> Result<Vec<f32>> {
	let embedding = json
		.get("data")
		.and_then(|v| v.as_array())
		.and_then(|data| data.first())
		.and_then(|item| item.get("embedding"))
		.or_else(|| json.get("embeddings").and_then(|v| v.as_array()).and_then(|v| v.first()))
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Embedding response is missing an embedding array.".to_string(),
		})?;
	let mut vector = Vec::with_capacity(embedding.len());

	for value in embedding {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vector.push(number as f32);
	}

	Ok(vector)
}
