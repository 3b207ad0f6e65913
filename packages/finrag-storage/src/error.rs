#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
	#[error("Collection {collection:?} for corpus {corpus:?} does not exist.")]
	MissingCollection { corpus: String, collection: String },
	#[error("Collection {collection:?} for corpus {corpus:?} is incompatible: {reason}.")]
	IncompatibleCollection { corpus: String, collection: String, reason: String },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}
