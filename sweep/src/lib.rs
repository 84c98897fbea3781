//! Vintage Sweep - hides sold-out vintage listings from a store catalog
//!
//! Pages through the store's product listing (or looks up one product),
//! classifies each product against the vintage sold-out rules and unpublishes
//! the ones that qualify, tallying every outcome for a JSON report.

// Core modules
pub mod config;
pub mod error;
pub mod types;

// Main functionality modules
pub mod classifier;
pub mod client;
pub mod rate_limit;
pub mod runner;
pub mod tally;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types for convenience
pub use classifier::{classify, classify_product, Classification, ProductFacts, SkipReason};
pub use client::StoreClient;
pub use config::StoreConfig;
pub use error::{Result, SweepError};
pub use rate_limit::FixedDelay;
pub use runner::{run_sweep, ErrorPolicy, ProductOutcome, Sweep, Target};
pub use tally::{Outcome, OutcomeTally};
pub use traits::StoreApi;
pub use types::{HttpResponse, Product, ProductId, RawProduct, ResponseRecord, Variant};
