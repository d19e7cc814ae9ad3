//! Rate-lookup collaborator interface and HTTP implementation.

use serde::{Deserialize, Serialize};

use crate::error::RateError;

/// A currency supported by the rate service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    pub display_name: String,
}

/// External rate-lookup collaborator.
///
/// Both calls may fail transiently; the [`RateCache`](super::RateCache)
/// in front of implementations decides what failures mean for callers.
#[allow(async_fn_in_trait)]
pub trait RateProvider: Send + Sync {
    /// Conversion rate from `from` to `to` (both upper-case symbols).
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateError>;

    /// The full set of supported currencies.
    async fn fetch_currencies(&self) -> Result<Vec<Currency>, RateError>;
}

/// HTTP rate provider against the Tally rate service.
///
/// Endpoints:
/// - `GET {base}/v1/currencies` -> `[{"symbol": "USD", "name": "US Dollar"}, ..]`
/// - `GET {base}/v1/rates/{FROM}/{TO}` -> `{"rate": 1.0843}`
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct RateResponse {
    rate: f64,
}

#[derive(Deserialize)]
struct CurrencyEntry {
    symbol: String,
    name: String,
}

impl HttpRateProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl RateProvider for HttpRateProvider {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        let url = format!("{}/v1/rates/{}/{}", self.base_url, from, to);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RateError::UnsupportedPair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(RateError::InvalidResponse(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: RateResponse = response
            .json()
            .await
            .map_err(|e| RateError::InvalidResponse(e.to_string()))?;

        if !body.rate.is_finite() || body.rate <= 0.0 {
            return Err(RateError::InvalidResponse(format!(
                "non-positive rate {}",
                body.rate
            )));
        }
        Ok(body.rate)
    }

    async fn fetch_currencies(&self) -> Result<Vec<Currency>, RateError> {
        let url = format!("{}/v1/currencies", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RateError::InvalidResponse(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let entries: Vec<CurrencyEntry> = response
            .json()
            .await
            .map_err(|e| RateError::InvalidResponse(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|entry| Currency {
                symbol: entry.symbol,
                display_name: entry.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_rate_parses_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/rates/USD/EUR")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"rate": 1.0843}"#)
            .create_async()
            .await;

        let provider = HttpRateProvider::new(server.url());
        let rate = provider.fetch_rate("USD", "EUR").await.unwrap();
        assert!((rate - 1.0843).abs() < 1e-9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rate_unknown_pair_is_unsupported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/rates/USD/XXX")
            .with_status(404)
            .create_async()
            .await;

        let provider = HttpRateProvider::new(server.url());
        let err = provider.fetch_rate("USD", "XXX").await.unwrap_err();
        assert!(matches!(err, RateError::UnsupportedPair { .. }));
    }

    #[tokio::test]
    async fn test_fetch_rate_rejects_garbage_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/rates/USD/EUR")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = HttpRateProvider::new(server.url());
        let err = provider.fetch_rate("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, RateError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_rate_rejects_non_positive_rate() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/rates/USD/EUR")
            .with_status(200)
            .with_body(r#"{"rate": 0.0}"#)
            .create_async()
            .await;

        let provider = HttpRateProvider::new(server.url());
        let err = provider.fetch_rate("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, RateError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_currencies_maps_names() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/currencies")
            .with_status(200)
            .with_body(r#"[{"symbol": "USD", "name": "US Dollar"}, {"symbol": "EUR", "name": "Euro"}]"#)
            .create_async()
            .await;

        let provider = HttpRateProvider::new(server.url());
        let currencies = provider.fetch_currencies().await.unwrap();
        assert_eq!(currencies.len(), 2);
        assert_eq!(currencies[0].symbol, "USD");
        assert_eq!(currencies[0].display_name, "US Dollar");
    }
}
