//! Currency rate lookup with TTL caching and request coalescing.

mod cache;
mod provider;

pub use cache::{RateCache, DEFAULT_TTL_MINUTES};
pub use provider::{Currency, HttpRateProvider, RateProvider};
