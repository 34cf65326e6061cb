//! Services for fetching, merging and aggregating usage

pub mod aggregator;
pub mod combiner;
pub mod config;
pub mod dependencies;
pub mod fetcher;
pub mod normalizer;

pub use aggregator::Aggregator;
pub use combiner::Combiner;
pub use config::Config;
pub use fetcher::{fetch_both, UsageSource};
pub use normalizer::{classify_date, normalize_date, NormalizedDate};
