//! Saves and restores the budget planner state.
//!
//! The state is kept as a single JSON document under [`BUDGET_STORAGE_KEY`].
//! Amounts and the exchange rate are written as text and re-parsed on load;
//! numbers are accepted too. Anything unreadable degrades to defaults instead
//! of failing the load.

use crate::core::budget::{BudgetLineItem, BudgetState};
use crate::core::currency::CurrencyCode;
use crate::core::store::KeyValueStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const BUDGET_STORAGE_KEY: &str = "pishukkan_budget";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for StoredNumber {
    fn default() -> Self {
        StoredNumber::Text(String::new())
    }
}

impl StoredNumber {
    fn from_value(value: f64) -> Self {
        StoredNumber::Text(value.to_string())
    }

    fn parse(&self) -> Option<f64> {
        let value = match self {
            StoredNumber::Number(n) => Some(*n),
            StoredNumber::Text(s) => s.trim().parse::<f64>().ok(),
            StoredNumber::Other(_) => None,
        };
        value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoredLineItem {
    source: String,
    amount: StoredNumber,
    currency: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredBudget {
    base_currency: String,
    foreign_currency: String,
    exchange_rate: StoredNumber,
    income: Vec<StoredLineItem>,
    expenses: Vec<StoredLineItem>,
}

impl From<&BudgetLineItem> for StoredLineItem {
    fn from(item: &BudgetLineItem) -> Self {
        Self {
            source: item.label.clone(),
            amount: StoredNumber::from_value(item.amount),
            currency: item.currency.to_string(),
        }
    }
}

impl From<StoredLineItem> for BudgetLineItem {
    fn from(item: StoredLineItem) -> Self {
        Self {
            label: item.source,
            amount: item.amount.parse().unwrap_or(0.0),
            currency: CurrencyCode::new(item.currency),
        }
    }
}

impl From<&BudgetState> for StoredBudget {
    fn from(state: &BudgetState) -> Self {
        Self {
            base_currency: state.base_currency.to_string(),
            foreign_currency: state.foreign_currency.to_string(),
            exchange_rate: StoredNumber::from_value(state.exchange_ratio),
            income: state.income.iter().map(StoredLineItem::from).collect(),
            expenses: state.expenses.iter().map(StoredLineItem::from).collect(),
        }
    }
}

impl From<StoredBudget> for BudgetState {
    fn from(stored: StoredBudget) -> Self {
        let exchange_ratio = match stored.exchange_rate.parse() {
            Some(ratio) if ratio > 0.0 => ratio,
            other => {
                warn!(stored = ?other, "Stored exchange rate unusable, using 1");
                1.0
            }
        };
        Self {
            base_currency: CurrencyCode::new(stored.base_currency),
            foreign_currency: CurrencyCode::new(stored.foreign_currency),
            exchange_ratio,
            income: stored.income.into_iter().map(BudgetLineItem::from).collect(),
            expenses: stored.expenses.into_iter().map(BudgetLineItem::from).collect(),
        }
    }
}

/// Reads and writes [`BudgetState`] through a [`KeyValueStore`].
#[derive(Clone)]
pub struct BudgetPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl BudgetPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: BUDGET_STORAGE_KEY.to_string(),
        }
    }

    pub fn save(&self, state: &BudgetState) -> Result<()> {
        let json = serde_json::to_string(&StoredBudget::from(state))
            .context("Failed to serialize budget state")?;
        self.store
            .write(&self.key, &json)
            .with_context(|| format!("Failed to write budget state to {}", self.key))?;
        debug!(
            income = state.income.len(),
            expenses = state.expenses.len(),
            "Saved budget state"
        );
        Ok(())
    }

    /// Returns `None` when nothing was saved yet or the saved value is unreadable.
    pub fn load(&self) -> Option<BudgetState> {
        let raw = match self.store.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved budget state under {}", self.key);
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read saved budget state");
                return None;
            }
        };

        match serde_json::from_str::<StoredBudget>(&raw) {
            Ok(stored) => Some(stored.into()),
            Err(e) => {
                warn!(error = %e, "Saved budget state is malformed, ignoring it");
                None
            }
        }
    }
}
