//! Calculators, budget ledger and their supporting abstractions

pub mod budget;
pub mod config;
pub mod currency;
pub mod finance;
pub mod format;
pub mod log;
pub mod persistence;
pub mod rate;
pub mod store;

// Re-export main types for cleaner imports
pub use budget::{BudgetLedger, BudgetLineItem, BudgetState, BudgetTotals, LedgerList};
pub use currency::{CurrencyCode, CurrencyRateProvider, ExchangeQuote};
pub use finance::{CalcError, CalcResult};
pub use persistence::BudgetPersistence;
pub use store::KeyValueStore;
