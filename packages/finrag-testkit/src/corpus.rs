use std::{
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use finrag_domain::{BoxFuture, Hit};
use finrag_storage::{Error, Result, corpus::CorpusIndex};

/// Serves a fixed hit list, nearest first, and records every requested `k`.
#[derive(Clone, Default)]
pub struct StaticCorpus {
	hits: Vec<Hit>,
	requested: Arc<Mutex<Vec<u32>>>,
}
impl StaticCorpus {
	pub fn new(hits: Vec<Hit>) -> Self {
		Self { hits, requested: Arc::default() }
	}

	pub fn requested(&self) -> Vec<u32> {
		self.requested.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl CorpusIndex for StaticCorpus {
	fn search<'a>(&'a self, _vector: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<Hit>>> {
		self.requested.lock().unwrap_or_else(|err| err.into_inner()).push(k);

		let hits: Vec<Hit> = self.hits.iter().take(k as usize).cloned().collect();

		Box::pin(async move { Ok(hits) })
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		let count = self.hits.len() as u64;

		Box::pin(async move { Ok(count) })
	}
}

/// A corpus whose store is unreachable; every call fails and is counted.
#[derive(Clone, Default)]
pub struct FailingCorpus {
	calls: Arc<AtomicUsize>,
}
impl FailingCorpus {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	fn error() -> Error {
		Error::MissingCollection { corpus: "failing".to_string(), collection: "missing".to_string() }
	}
}
impl CorpusIndex for FailingCorpus {
	fn search<'a>(&'a self, _vector: &'a [f32], _k: u32) -> BoxFuture<'a, Result<Vec<Hit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(Self::error()) })
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(Self::error()) })
	}
}

/// Answers like `inner`, but only after `delay`.
#[derive(Clone)]
pub struct SlowCorpus {
	inner: StaticCorpus,
	delay: Duration,
}
impl SlowCorpus {
	pub fn new(inner: StaticCorpus, delay: Duration) -> Self {
		Self { inner, delay }
	}
}
impl CorpusIndex for SlowCorpus {
	fn search<'a>(&'a self, vector: &'a [f32], k: u32) -> BoxFuture<'a, Result<Vec<Hit>>> {
		Box::pin(async move {
			tokio::time::sleep(self.delay).await;

			self.inner.search(vector, k).await
		})
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		self.inner.count()
	}
}
