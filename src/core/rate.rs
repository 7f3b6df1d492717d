//! Resolves the conversion ratio between the budget's two currencies.

use crate::core::currency::{CurrencyCode, CurrencyRateProvider, ExchangeQuote};
use anyhow::{Result, anyhow};
use tracing::debug;

/// Ratio converting `target` amounts into `base`.
///
/// Identical codes short-circuit to exactly `1.0` without asking the provider.
pub async fn resolve_ratio(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    base: &CurrencyCode,
    target: &CurrencyCode,
) -> Result<f64> {
    if base == target {
        debug!("Same currency {base}, using ratio 1");
        return Ok(1.0);
    }

    let ratio = provider.get_rate(base, target).await?;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(anyhow!(
            "Rejected rate {ratio} for currency pair: {base}/{target}"
        ));
    }
    Ok(ratio)
}

/// An outstanding lookup, stamped with the generation it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRequest {
    generation: u64,
    pub base: CurrencyCode,
    pub target: CurrencyCode,
}

impl RateRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn fetch(
        &self,
        provider: &(dyn CurrencyRateProvider + Send + Sync),
    ) -> Result<ExchangeQuote> {
        if self.base == self.target {
            return Ok(ExchangeQuote::identity(self.base.clone()));
        }
        let ratio = resolve_ratio(provider, &self.base, &self.target).await?;
        Ok(ExchangeQuote {
            base: self.base.clone(),
            target: self.target.clone(),
            ratio,
        })
    }
}

/// Hands out rate requests and decides whether a response is still wanted.
///
/// Only the most recently issued request may update the ledger; a response
/// that arrives after a newer request was issued is stale.
#[derive(Debug, Default)]
pub struct RateResolver {
    generation: u64,
}

impl RateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, base: CurrencyCode, target: CurrencyCode) -> RateRequest {
        self.generation += 1;
        debug!(generation = self.generation, %base, %target, "Issuing rate request");
        RateRequest {
            generation: self.generation,
            base,
            target,
        }
    }

    pub fn is_current(&self, request: &RateRequest) -> bool {
        request.generation == self.generation
    }
}
