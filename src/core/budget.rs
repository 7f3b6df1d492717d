//! Two-currency budget planner.
//!
//! [`BudgetLedger`] owns the [`BudgetState`] and is the only way to change it.
//! Every successful change is written through [`BudgetPersistence`] before the
//! call returns. Totals are derived on demand and never stored.
//!
//! The ledger converts exactly one foreign currency into the base currency.
//! Rows tagged with any other currency are added 1:1 and reported through
//! [`BudgetTotals::unrecognized_rows`].

use crate::core::currency::{CurrencyCode, CurrencyRateProvider, ExchangeQuote};
use crate::core::persistence::BudgetPersistence;
use crate::core::rate::{RateRequest, RateResolver};
use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BudgetError {
    #[error("Currency code cannot be empty")]
    EmptyCurrency,
    #[error("Exchange rate must be a positive number, got {0}")]
    InvalidRatio(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerList {
    Income,
    Expenses,
}

impl Display for LedgerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LedgerList::Income => "income",
                LedgerList::Expenses => "expenses",
            }
        )
    }
}

impl FromStr for LedgerList {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "incomes" => Ok(LedgerList::Income),
            "expense" | "expenses" => Ok(LedgerList::Expenses),
            _ => Err(anyhow!("Invalid budget list: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLineItem {
    pub label: String,
    pub amount: f64,
    pub currency: CurrencyCode,
}

impl BudgetLineItem {
    pub fn new(label: impl Into<String>, amount: f64, currency: impl AsRef<str>) -> Self {
        Self {
            label: label.into(),
            amount,
            currency: CurrencyCode::new(currency),
        }
    }
}

/// Partial update for a line item; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemEdit {
    pub label: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<CurrencyCode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetState {
    pub base_currency: CurrencyCode,
    pub foreign_currency: CurrencyCode,
    pub exchange_ratio: f64,
    pub income: Vec<BudgetLineItem>,
    pub expenses: Vec<BudgetLineItem>,
}

impl BudgetState {
    pub fn new(base_currency: CurrencyCode, foreign_currency: CurrencyCode) -> Self {
        Self {
            base_currency,
            foreign_currency,
            exchange_ratio: 1.0,
            income: Vec::new(),
            expenses: Vec::new(),
        }
    }

    pub fn items(&self, list: LedgerList) -> &[BudgetLineItem] {
        match list {
            LedgerList::Income => &self.income,
            LedgerList::Expenses => &self.expenses,
        }
    }

    fn items_mut(&mut self, list: LedgerList) -> &mut Vec<BudgetLineItem> {
        match list {
            LedgerList::Income => &mut self.income,
            LedgerList::Expenses => &mut self.expenses,
        }
    }

    fn quote(&self) -> ExchangeQuote {
        ExchangeQuote {
            base: self.base_currency.clone(),
            target: self.foreign_currency.clone(),
            ratio: self.exchange_ratio,
        }
    }
}

/// Currencies a fresh budget starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDefaults {
    pub base_currency: CurrencyCode,
    pub foreign_currency: CurrencyCode,
}

impl Default for BudgetDefaults {
    fn default() -> Self {
        Self {
            base_currency: CurrencyCode::new("USD"),
            foreign_currency: CurrencyCode::new("EUR"),
        }
    }
}

/// Totals expressed in the base currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    /// Income minus expenses; negative when overspending.
    pub savings: f64,
    pub unrecognized_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    Updated(f64),
    /// A newer request was issued, or the currencies changed, before this
    /// response arrived.
    Stale,
    Unavailable(String),
}

fn finite_or_zero(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}

pub struct BudgetLedger {
    state: BudgetState,
    resolver: RateResolver,
    persistence: BudgetPersistence,
}

impl BudgetLedger {
    /// Restores the saved budget, or starts an empty one from `defaults`.
    pub fn open(persistence: BudgetPersistence, defaults: &BudgetDefaults) -> Self {
        let state = match persistence.load() {
            Some(mut state) => {
                if state.base_currency.is_empty() {
                    state.base_currency = defaults.base_currency.clone();
                }
                if state.foreign_currency.is_empty() {
                    state.foreign_currency = defaults.foreign_currency.clone();
                }
                let base = state.base_currency.clone();
                for item in state.income.iter_mut().chain(state.expenses.iter_mut()) {
                    if item.currency.is_empty() {
                        item.currency = base.clone();
                    }
                }
                debug!("Restored saved budget");
                state
            }
            None => BudgetState::new(
                defaults.base_currency.clone(),
                defaults.foreign_currency.clone(),
            ),
        };

        Self {
            state,
            resolver: RateResolver::new(),
            persistence,
        }
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn items(&self, list: LedgerList) -> &[BudgetLineItem] {
        self.state.items(list)
    }

    /// Non-finite amounts are stored as 0 and a blank currency as the base
    /// currency.
    pub fn add_line_item(&mut self, list: LedgerList, mut item: BudgetLineItem) {
        debug!(%list, label = %item.label, "Adding line item");
        item.amount = finite_or_zero(item.amount);
        if item.currency.is_empty() {
            item.currency = self.state.base_currency.clone();
        }
        self.state.items_mut(list).push(item);
        self.persist();
    }

    /// Returns `false` and changes nothing when `index` is out of range.
    pub fn remove_line_item(&mut self, list: LedgerList, index: usize) -> bool {
        let items = self.state.items_mut(list);
        if index >= items.len() {
            debug!(%list, index, "Ignoring remove of missing line item");
            return false;
        }
        items.remove(index);
        self.persist();
        true
    }

    /// Returns `false` and changes nothing when `index` is out of range.
    pub fn edit_line_item(&mut self, list: LedgerList, index: usize, edit: LineItemEdit) -> bool {
        let base = self.state.base_currency.clone();
        let Some(item) = self.state.items_mut(list).get_mut(index) else {
            debug!(%list, index, "Ignoring edit of missing line item");
            return false;
        };
        if let Some(label) = edit.label {
            item.label = label;
        }
        if let Some(amount) = edit.amount {
            item.amount = finite_or_zero(amount);
        }
        if let Some(currency) = edit.currency {
            item.currency = if currency.is_empty() { base } else { currency };
        }
        self.persist();
        true
    }

    /// Switches the currency pair.
    ///
    /// Rows already in the new foreign currency keep it; all other rows are
    /// re-tagged to the new base currency. The ratio is reset to 1 when both
    /// codes are the same, otherwise it is kept until the next refresh.
    pub fn set_currencies(
        &mut self,
        base: CurrencyCode,
        foreign: CurrencyCode,
    ) -> Result<(), BudgetError> {
        if base.is_empty() || foreign.is_empty() {
            return Err(BudgetError::EmptyCurrency);
        }

        for item in self
            .state
            .income
            .iter_mut()
            .chain(self.state.expenses.iter_mut())
        {
            if item.currency != foreign {
                item.currency = base.clone();
            }
        }

        if base == foreign {
            self.state.exchange_ratio = 1.0;
        }
        info!(%base, %foreign, "Budget currencies changed");
        self.state.base_currency = base;
        self.state.foreign_currency = foreign;
        self.persist();
        Ok(())
    }

    /// Manual override of the exchange ratio.
    pub fn set_exchange_ratio(&mut self, ratio: f64) -> Result<(), BudgetError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(BudgetError::InvalidRatio(ratio));
        }
        self.state.exchange_ratio = ratio;
        self.persist();
        Ok(())
    }

    /// Issues a rate request for the current pair. Any earlier request
    /// becomes stale.
    pub fn begin_rate_refresh(&mut self) -> RateRequest {
        self.resolver.begin(
            self.state.base_currency.clone(),
            self.state.foreign_currency.clone(),
        )
    }

    /// Completes a request started with [`BudgetLedger::begin_rate_refresh`].
    ///
    /// Failures keep the previous ratio.
    pub fn apply_rate(
        &mut self,
        request: &RateRequest,
        result: anyhow::Result<ExchangeQuote>,
    ) -> RateOutcome {
        if !self.resolver.is_current(request) {
            debug!(
                generation = request.generation(),
                "Discarding superseded rate response"
            );
            return RateOutcome::Stale;
        }

        let quote = match result {
            Ok(quote) => quote,
            Err(e) => {
                warn!(
                    error = %e,
                    ratio = self.state.exchange_ratio,
                    "Exchange rate unavailable, keeping previous ratio"
                );
                return RateOutcome::Unavailable(e.to_string());
            }
        };

        if quote.base != self.state.base_currency || quote.target != self.state.foreign_currency {
            debug!(base = %quote.base, target = %quote.target, "Discarding rate for old currency pair");
            return RateOutcome::Stale;
        }
        if !quote.ratio.is_finite() || quote.ratio <= 0.0 {
            warn!(ratio = quote.ratio, "Rejected exchange rate, keeping previous ratio");
            return RateOutcome::Unavailable(format!("invalid rate {}", quote.ratio));
        }

        info!(base = %quote.base, target = %quote.target, ratio = quote.ratio, "Exchange rate updated");
        self.state.exchange_ratio = quote.ratio;
        self.persist();
        RateOutcome::Updated(quote.ratio)
    }

    pub async fn refresh_rate(
        &mut self,
        provider: &(dyn CurrencyRateProvider + Send + Sync),
    ) -> RateOutcome {
        let request = self.begin_rate_refresh();
        let result = request.fetch(provider).await;
        self.apply_rate(&request, result)
    }

    pub fn recompute_totals(&self) -> BudgetTotals {
        let quote = self.state.quote();
        let mut unrecognized_rows = 0;

        let mut sum = |items: &[BudgetLineItem]| -> f64 {
            items
                .iter()
                .map(|item| {
                    if item.currency == quote.target {
                        quote.convert_to_base(item.amount)
                    } else {
                        if item.currency != quote.base {
                            unrecognized_rows += 1;
                        }
                        item.amount
                    }
                })
                .sum()
        };

        let total_income = sum(&self.state.income);
        let total_expenses = sum(&self.state.expenses);

        if unrecognized_rows > 0 {
            warn!(
                rows = unrecognized_rows,
                base = %quote.base,
                "Line items in a third currency were counted as base currency"
            );
        }

        BudgetTotals {
            total_income,
            total_expenses,
            savings: total_income - total_expenses,
            unrecognized_rows,
        }
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.state) {
            error!(error = %e, "Failed to save budget");
        }
    }
}
