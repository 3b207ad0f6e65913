pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { field: String, message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
		Self::InvalidRequest { field: field.to_string(), message: message.into() }
	}
}

impl From<finrag_providers::Error> for Error {
	fn from(err: finrag_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
