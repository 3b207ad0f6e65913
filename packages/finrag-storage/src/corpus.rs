use finrag_domain::{BoxFuture, Hit};

use crate::Result;

/// Uniform search contract over one corpus's backing similarity store.
///
/// `search` returns hits nearest first, exactly as the store ordered them. An empty
/// corpus yields `Ok(vec![])`; an unreachable store yields `Err`.
pub trait CorpusIndex
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, vector: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<Hit>>>;

	fn count(&self) -> BoxFuture<'_, Result<u64>>;
}
