mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Corpus, CorpusRatios, EmbeddingProviderConfig, LlmProviderConfig, Providers, Qdrant,
	Retrieval, Service, Storage,
};

use std::{collections::HashSet, fs, path::Path};

const RATIO_SUM_TOLERANCE: f64 = 1e-6;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("providers.llm.timeout_ms", cfg.providers.llm.timeout_ms),
		("retrieval.request_timeout_ms", cfg.retrieval.request_timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if cfg.providers.llm.default_model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.llm.default_model must be non-empty.".to_string(),
		});
	}
	if !cfg.providers.llm.temperature.is_finite() || cfg.providers.llm.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}

	for (label, headers) in [
		("providers.embedding", &cfg.providers.embedding.default_headers),
		("providers.llm", &cfg.providers.llm.default_headers),
	] {
		if headers.values().any(|value| !value.is_string()) {
			return Err(Error::Validation {
				message: format!("{label}.default_headers values must be strings."),
			});
		}
	}

	if cfg.retrieval.max_n_results == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_n_results must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.default_n_results == 0
		|| cfg.retrieval.default_n_results > cfg.retrieval.max_n_results
	{
		return Err(Error::Validation {
			message: "retrieval.default_n_results must be between 1 and retrieval.max_n_results."
				.to_string(),
		});
	}

	validate_corpora(&cfg.corpora)
}

fn validate_corpora(corpora: &[Corpus]) -> Result<()> {
	if corpora.is_empty() {
		return Err(Error::Validation {
			message: "At least one [[corpora]] entry is required.".to_string(),
		});
	}

	let mut names = HashSet::new();

	for corpus in corpora {
		if corpus.name.trim().is_empty() {
			return Err(Error::Validation {
				message: "corpora.name must be non-empty.".to_string(),
			});
		}
		if !names.insert(corpus.name.as_str()) {
			return Err(Error::Validation {
				message: format!("corpora.name {:?} is declared more than once.", corpus.name),
			});
		}
		if corpus.collection.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("corpora.{}.collection must be non-empty.", corpus.name),
			});
		}
		if !matches!(corpus.rounding.as_str(), "ceil" | "floor") {
			return Err(Error::Validation {
				message: format!("corpora.{}.rounding must be one of ceil or floor.", corpus.name),
			});
		}

		for (category, ratio) in ratio_entries(&corpus.ratios) {
			if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
				return Err(Error::Validation {
					message: format!(
						"corpora.{}.ratios.{category} must be in the range 0.0-1.0.",
						corpus.name
					),
				});
			}
		}
	}

	for (index, category) in ["general", "financial", "market"].into_iter().enumerate() {
		let sum: f64 = corpora.iter().map(|corpus| ratio_entries(&corpus.ratios)[index].1).sum();

		if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
			return Err(Error::Validation {
				message: format!("corpora ratios for {category} must sum to 1.0, got {sum}."),
			});
		}
	}

	Ok(())
}

fn ratio_entries(ratios: &CorpusRatios) -> [(&'static str, f64); 3] {
	[("general", ratios.general), ("financial", ratios.financial), ("market", ratios.market)]
}

fn normalize(cfg: &mut Config) {
	for key in [&mut cfg.providers.embedding.api_key, &mut cfg.providers.llm.api_key] {
		if key.as_deref().map(|value| value.trim().is_empty()).unwrap_or(false) {
			*key = None;
		}
	}

	for corpus in &mut cfg.corpora {
		corpus.name = corpus.name.trim().to_string();
		corpus.collection = corpus.collection.trim().to_string();
		corpus.source_type = corpus.source_type.trim().to_string();
		corpus.rounding = corpus.rounding.trim().to_ascii_lowercase();
	}
}
