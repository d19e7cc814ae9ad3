use clap::Subcommand;
use serde_json::json;
use tally_core::{Config, HttpRateProvider, RateCache};

#[derive(Subcommand)]
pub enum RateAction {
    /// Conversion rate between two currencies
    Get { from: String, to: String },
    /// List supported currencies
    Currencies,
}

pub fn run(action: RateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let provider = HttpRateProvider::new(config.rates.base_url.clone());
    let cache = RateCache::with_ttl(provider, chrono::Duration::minutes(config.rates.ttl_minutes));

    match action {
        RateAction::Get { from, to } => {
            // A failed lookup is an "unavailable" display value, not an
            // error exit.
            let output = match runtime.block_on(cache.get_rate(&from, &to)) {
                Ok(rate) => json!({ "from": from, "to": to, "rate": rate }),
                Err(err) => {
                    tracing::warn!("rate lookup failed: {err}");
                    json!({ "from": from, "to": to, "rate": null, "status": "unavailable" })
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        RateAction::Currencies => {
            let output = match runtime.block_on(cache.currencies()) {
                Ok(currencies) => json!({ "currencies": currencies }),
                Err(err) => {
                    tracing::warn!("currency list fetch failed: {err}");
                    json!({ "currencies": [], "status": "unavailable" })
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
