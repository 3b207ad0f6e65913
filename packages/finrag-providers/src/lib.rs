pub mod embedding;
pub mod generation;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

use finrag_config::{EmbeddingProviderConfig, LlmProviderConfig};
use finrag_domain::BoxFuture;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		model: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

/// OpenAI-compatible HTTP endpoints, e.g. a local Ollama server.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpProviders;
impl EmbeddingProvider for HttpProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}
impl GenerationProvider for HttpProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		model: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(generation::generate(cfg, model, prompt))
	}
}

pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
