pub mod allocation;
pub mod evidence;
pub mod intent;

use std::{future::Future, pin::Pin};

pub use allocation::{AllocationPlan, AllocationPolicy, CorpusAllocation, Quota, Rounding};
pub use evidence::{EvidenceItem, Hit, merge_rank, relevance_score};
pub use intent::{Category, Intent, classify};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
