//! Price-quote collaborator.
//!
//! Quote lookups are best-effort: the ops layer logs a failed lookup and
//! keeps the stale price, so an unreachable vendor never fails a request.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{EngineError, ResultEngine};

#[async_trait]
pub trait PriceQuotes: Send + Sync {
    /// Latest price for a ticker symbol, in integer cents.
    async fn quote(&self, symbol: &str) -> ResultEngine<i64>;
}

/// Quote client over a JSON HTTP vendor exposing `GET {base}/stocks/{symbol}`
/// with a `{"price": <major units>}` body.
pub struct HttpQuotes {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    price: f64,
}

impl HttpQuotes {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PriceQuotes for HttpQuotes {
    async fn quote(&self, symbol: &str) -> ResultEngine<i64> {
        let url = format!("{}/stocks/{}", self.base_url.trim_end_matches('/'), symbol);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| EngineError::Unavailable(format!("quote lookup failed: {err}")))?;
        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|err| EngineError::Unavailable(format!("malformed quote body: {err}")))?;
        if !quote.price.is_finite() || quote.price < 0.0 {
            return Err(EngineError::Unavailable(format!(
                "vendor returned an invalid price for {symbol}"
            )));
        }
        Ok((quote.price * 100.0).round() as i64)
    }
}
