//! Recommendation pipeline: merged catalog reads, the tiered fallback
//! cascade, and cooperative cancellation.

mod cancel;
mod cascade;
mod curated;
mod merge;
mod service;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use cascade::{Cascade, CascadeConfig, TierPolicy};
pub use curated::curated_products;
pub use merge::{CatalogSources, MergeOutcome, SourceFetch};
pub use service::Shelf;
