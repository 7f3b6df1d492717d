//! Currency codes, quotes and the rate provider abstraction

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A currency label such as `USD`.
///
/// Codes are trimmed and upper-cased on construction, so equality ignores case
/// and surrounding whitespace. They are not checked against any registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-cased form used by rate feeds keyed on `usd`, `eur`...
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ratio converting amounts in `target` into `base`:
/// `amount_in_base = amount_in_target * ratio`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeQuote {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub ratio: f64,
}

impl ExchangeQuote {
    /// Quote for a pair of identical currencies.
    pub fn identity(code: CurrencyCode) -> Self {
        Self {
            base: code.clone(),
            target: code,
            ratio: 1.0,
        }
    }

    pub fn convert_to_base(&self, amount_in_target: f64) -> f64 {
        amount_in_target * self.ratio
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns how many units of `base` one unit of `target` is worth.
    async fn get_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
}

const fn info(code: &'static str, name: &'static str) -> CurrencyInfo {
    CurrencyInfo { code, name }
}

pub const KNOWN_CURRENCIES: [CurrencyInfo; 25] = [
    info("USD", "United States Dollar"),
    info("EUR", "Euro"),
    info("GBP", "British Pound Sterling"),
    info("JPY", "Japanese Yen"),
    info("INR", "Indian Rupee"),
    info("BHD", "Bahraini Dinar"),
    info("AED", "United Arab Emirates Dirham"),
    info("SAR", "Saudi Riyal"),
    info("KWD", "Kuwaiti Dinar"),
    info("OMR", "Omani Rial"),
    info("QAR", "Qatari Rial"),
    info("AUD", "Australian Dollar"),
    info("CAD", "Canadian Dollar"),
    info("CHF", "Swiss Franc"),
    info("CNY", "Chinese Yuan"),
    info("SGD", "Singapore Dollar"),
    info("NZD", "New Zealand Dollar"),
    info("HKD", "Hong Kong Dollar"),
    info("MYR", "Malaysian Ringgit"),
    info("THB", "Thai Baht"),
    info("IDR", "Indonesian Rupiah"),
    info("PHP", "Philippine Peso"),
    info("PKR", "Pakistani Rupee"),
    info("BDT", "Bangladeshi Taka"),
    info("LKR", "Sri Lankan Rupee"),
];

/// Currencies whose code or name contains `filter`, ignoring case.
pub fn search_currencies(filter: &str) -> Vec<CurrencyInfo> {
    let needle = filter.trim().to_lowercase();
    KNOWN_CURRENCIES
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.code.to_lowercase().contains(&needle)
                || c.name.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalizes() {
        assert_eq!(CurrencyCode::new("  usd "), CurrencyCode::new("USD"));
        assert_eq!(CurrencyCode::new("eur").as_str(), "EUR");
        assert_eq!(CurrencyCode::new("Inr").to_lowercase(), "inr");
        assert!(CurrencyCode::new("   ").is_empty());
    }

    #[test]
    fn test_currency_code_serde_normalizes() {
        let code: CurrencyCode = serde_json::from_str("\" gbp\"").unwrap();
        assert_eq!(code.as_str(), "GBP");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"GBP\"");
    }

    #[test]
    fn test_quote_conversion() {
        let quote = ExchangeQuote {
            base: "USD".into(),
            target: "EUR".into(),
            ratio: 1.1,
        };
        assert!((quote.convert_to_base(100.0) - 110.0).abs() < 1e-9);
        assert_eq!(ExchangeQuote::identity("INR".into()).ratio, 1.0);
    }

    #[test]
    fn test_search_currencies() {
        assert_eq!(search_currencies("").len(), KNOWN_CURRENCIES.len());

        let dinars: Vec<_> = search_currencies("dinar").iter().map(|c| c.code).collect();
        assert_eq!(dinars, vec!["BHD", "KWD"]);

        let by_code = search_currencies("jp");
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].name, "Japanese Yen");

        assert!(search_currencies("zzz").is_empty());
    }
}
