use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use finrag_config::{EmbeddingProviderConfig, LlmProviderConfig};
use finrag_domain::BoxFuture;
use finrag_providers::{EmbeddingProvider, Error, GenerationProvider, Result};

/// Returns the same unit-length vector for every input.
#[derive(Clone, Default)]
pub struct FixedEmbedding {
	calls: Arc<AtomicUsize>,
}
impl FixedEmbedding {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl EmbeddingProvider for FixedEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let mut vector = vec![0.0_f32; cfg.dimensions as usize];

		if let Some(first) = vector.first_mut() {
			*first = 1.0;
		}

		Box::pin(async move { Ok(vector) })
	}
}

#[derive(Clone, Copy, Default)]
pub struct FailingEmbedding;
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async {
			Err(Error::InvalidResponse { message: "Embedding backend is unavailable.".to_string() })
		})
	}
}

/// Answers `answer from <model>` and keeps the last prompt it saw.
#[derive(Clone, Default)]
pub struct EchoGeneration {
	calls: Arc<AtomicUsize>,
	last_prompt: Arc<Mutex<Option<String>>>,
}
impl EchoGeneration {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn last_prompt(&self) -> Option<String> {
		self.last_prompt.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl GenerationProvider for EchoGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		model: &'a str,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		*self.last_prompt.lock().unwrap_or_else(|err| err.into_inner()) = Some(prompt.to_string());

		Box::pin(async move { Ok(format!("answer from {model}")) })
	}
}

#[derive(Clone, Copy, Default)]
pub struct FailingGeneration;
impl GenerationProvider for FailingGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		model: &'a str,
		_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			Err(Error::InvalidResponse { message: format!("Model {model:?} not found.") })
		})
	}
}
