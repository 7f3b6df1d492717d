use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("fincalc/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct FloatRateEntry {
    #[serde(alias = "inverseRate")]
    inverse_rate: f64,
}

fn round_to_micros(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

// FloatRatesProvider implementation for CurrencyRateProvider
pub struct FloatRatesProvider {
    base_url: String,
}

impl FloatRatesProvider {
    pub fn new(base_url: &str) -> Self {
        FloatRatesProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for FloatRatesProvider {
    #[instrument(
        name = "FloatRatesFetch",
        skip(self),
        fields(base = %base, target = %target)
    )]
    async fn get_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<f64> {
        let pair = format!("{base}/{target}");
        let url = format!("{}/daily/{}.json", self.base_url, base.to_lowercase());
        debug!("Requesting currency rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            ));
        }

        let text = response.text().await?;

        let rates: HashMap<String, FloatRateEntry> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;

        let entry = rates
            .get(&target.to_lowercase())
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", pair))?;

        Ok(round_to_micros(entry.inverse_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_USD_JSON: &str = r#"{
        "eur": {
            "code": "EUR",
            "alphaCode": "EUR",
            "numericCode": "978",
            "name": "Euro",
            "rate": 0.9233,
            "date": "Mon, 19 Oct 2026 11:55:01 GMT",
            "inverseRate": 1.083071882
        },
        "inr": {
            "code": "INR",
            "rate": 83.1,
            "inverseRate": 0.0120336943
        }
    }"#;

    async fn create_mock_server(base: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/daily/{base}.json");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = create_mock_server("usd", 200, MOCK_USD_JSON).await;
        let provider = FloatRatesProvider::new(&mock_server.uri());

        let rate = provider
            .get_rate(&"USD".into(), &"eur".into())
            .await
            .expect("Failed to get rate");
        assert_eq!(rate, 1.083072);

        let rate = provider.get_rate(&"usd".into(), &"INR".into()).await.unwrap();
        assert_eq!(rate, 0.012034);
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = create_mock_server("usd", 200, MOCK_USD_JSON).await;
        let provider = FloatRatesProvider::new(&format!("{}/", mock_server.uri()));

        let rate = provider.get_rate(&"USD".into(), &"EUR".into()).await.unwrap();
        assert_eq!(rate, 1.083072);
    }

    #[tokio::test]
    async fn test_missing_target_currency() {
        let mock_server = create_mock_server("usd", 200, MOCK_USD_JSON).await;
        let provider = FloatRatesProvider::new(&mock_server.uri());

        let result = provider.get_rate(&"USD".into(), &"GBP".into()).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for currency pair: USD/GBP"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server("usd", 500, "").await;
        let provider = FloatRatesProvider::new(&mock_server.uri());

        let result = provider.get_rate(&"USD".into(), &"EUR".into()).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for currency pair: USD/EUR"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server("usd", 200, r#"{"eur": {"rate": 0.92}}"#).await;
        let provider = FloatRatesProvider::new(&mock_server.uri());

        let result = provider.get_rate(&"USD".into(), &"EUR".into()).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD/EUR")
        );
    }

    #[tokio::test]
    async fn test_unknown_base_currency() {
        let mock_server = MockServer::start().await;
        let provider = FloatRatesProvider::new(&mock_server.uri());

        // No mock mounted, wiremock answers 404.
        let result = provider.get_rate(&"XYZ".into(), &"EUR".into()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP error: 404"));
    }
}
