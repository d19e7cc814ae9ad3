//! TTL-bounded rate cache with request coalescing.
//!
//! One slot per currency pair, each behind its own async mutex. The slot
//! lock is held across the fetch, so concurrent lookups for the same
//! uncached pair wait on the first caller and then read the stored entry
//! instead of issuing their own request. Entries are superseded after the
//! TTL; an expired entry is never served, not even when the refetch fails.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OnceCell};

use crate::error::RateError;

use super::provider::{Currency, RateProvider};

/// Default time-to-live for cached rates.
pub const DEFAULT_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    fetched_at: DateTime<Utc>,
}

type PairKey = (String, String);
type Slot = Arc<Mutex<Option<CachedRate>>>;

/// Process-wide rate cache in front of a [`RateProvider`].
pub struct RateCache<P> {
    provider: P,
    ttl: Duration,
    slots: std::sync::Mutex<HashMap<PairKey, Slot>>,
    currencies: OnceCell<Vec<Currency>>,
}

impl<P: RateProvider> RateCache<P> {
    pub fn new(provider: P) -> Self {
        Self::with_ttl(provider, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    pub fn with_ttl(provider: P, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            slots: std::sync::Mutex::new(HashMap::new()),
            currencies: OnceCell::new(),
        }
    }

    /// Conversion rate for `from -> to`, served from cache while fresh.
    ///
    /// A provider failure is returned as-is: no stale value is served and
    /// other pairs keep their cached entries.
    pub async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        let from = from.trim().to_ascii_uppercase();
        let to = to.trim().to_ascii_uppercase();
        if from == to {
            return Ok(1.0);
        }

        let slot = self.slot(&from, &to);
        let mut guard = slot.lock().await;

        if let Some(entry) = *guard {
            if Utc::now() - entry.fetched_at <= self.ttl {
                return Ok(entry.rate);
            }
        }

        let rate = self.provider.fetch_rate(&from, &to).await?;
        *guard = Some(CachedRate {
            rate,
            fetched_at: Utc::now(),
        });
        Ok(rate)
    }

    /// Supported currencies, fetched once per process lifetime.
    ///
    /// Concurrent first calls coalesce into one request. A failed fetch
    /// leaves the cell empty so a later call can retry.
    pub async fn currencies(&self) -> Result<&[Currency], RateError> {
        self.currencies
            .get_or_try_init(|| self.provider.fetch_currencies())
            .await
            .map(Vec::as_slice)
    }

    fn slot(&self, from: &str, to: &str) -> Slot {
        let mut map = self.slots.lock().unwrap();
        map.entry((from.to_string(), to.to_string()))
            .or_default()
            .clone()
    }
}
