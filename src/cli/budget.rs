use super::ui::{self, StyleType};
use crate::core::budget::{
    BudgetDefaults, BudgetLedger, BudgetLineItem, LedgerList, LineItemEdit, RateOutcome,
};
use crate::core::config::AppConfig;
use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use crate::core::format::{BUDGET_PRECISION, format_money};
use crate::core::persistence::BudgetPersistence;
use crate::providers::FloatRatesProvider;
use crate::store;
use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum BudgetAction {
    /// Show line items and totals
    Show,
    /// Append a line item to the income or expense list
    Add {
        /// `income` or `expense`
        list: LedgerList,
        /// Source or expense name
        #[arg(short, long, default_value = "")]
        label: String,
        /// Amount; anything that is not a number counts as 0
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        amount: String,
        /// Currency of the amount, defaults to the base currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// Remove a line item by its row number
    Remove {
        list: LedgerList,
        /// Row number as shown by `budget show`
        row: usize,
    },
    /// Change fields of a line item
    Edit {
        list: LedgerList,
        /// Row number as shown by `budget show`
        row: usize,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Set the base and foreign currency, then fetch the rate between them
    Currency { base: String, foreign: String },
    /// Override the exchange rate (base units per foreign unit)
    Rate { ratio: f64 },
    /// Fetch the latest exchange rate
    Refresh,
}

/// Parses a user-entered amount; unparseable input counts as zero.
pub fn parse_amount(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn row_index(row: usize) -> Option<usize> {
    row.checked_sub(1)
}

pub async fn run(action: BudgetAction, config: &AppConfig) -> Result<()> {
    let data_path = config.default_data_path()?;
    debug!("Using data path {}", data_path.display());

    let persistence = BudgetPersistence::new(store::open_store(&data_path));
    let mut ledger = BudgetLedger::open(persistence, &BudgetDefaults::from(&config.budget));
    let provider = FloatRatesProvider::new(config.floatrates_url());

    if let Some(notice) = apply_action(&mut ledger, action, &provider).await {
        println!("{notice}");
    }
    println!("{}", render_budget(&ledger));
    Ok(())
}

/// Applies `action` to the ledger and returns a message for the user, if any.
pub async fn apply_action(
    ledger: &mut BudgetLedger,
    action: BudgetAction,
    provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Option<String> {
    match action {
        BudgetAction::Show => None,
        BudgetAction::Add {
            list,
            label,
            amount,
            currency,
        } => {
            let currency = currency
                .map(CurrencyCode::new)
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| ledger.state().base_currency.clone());
            let item = BudgetLineItem {
                label,
                amount: parse_amount(&amount),
                currency,
            };
            ledger.add_line_item(list, item);
            None
        }
        BudgetAction::Remove { list, row } => {
            let removed = row_index(row).is_some_and(|i| ledger.remove_line_item(list, i));
            (!removed).then(|| missing_row(list, row))
        }
        BudgetAction::Edit {
            list,
            row,
            label,
            amount,
            currency,
        } => {
            let edit = LineItemEdit {
                label,
                amount: amount.as_deref().map(parse_amount),
                currency: currency.map(CurrencyCode::new).filter(|c| !c.is_empty()),
            };
            let edited = row_index(row).is_some_and(|i| ledger.edit_line_item(list, i, edit));
            (!edited).then(|| missing_row(list, row))
        }
        BudgetAction::Currency { base, foreign } => {
            if let Err(e) = ledger.set_currencies(CurrencyCode::new(base), CurrencyCode::new(foreign))
            {
                return Some(ui::style_text(&e.to_string(), StyleType::Error));
            }
            refresh(ledger, provider).await
        }
        BudgetAction::Rate { ratio } => ledger
            .set_exchange_ratio(ratio)
            .err()
            .map(|e| ui::style_text(&e.to_string(), StyleType::Error)),
        BudgetAction::Refresh => refresh(ledger, provider).await,
    }
}

fn missing_row(list: LedgerList, row: usize) -> String {
    ui::style_text(&format!("No {list} row {row}"), StyleType::Error)
}

async fn refresh(
    ledger: &mut BudgetLedger,
    provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Option<String> {
    let spinner = ui::new_spinner("Fetching exchange rate...");
    let outcome = ledger.refresh_rate(provider).await;
    spinner.finish_and_clear();

    match outcome {
        RateOutcome::Updated(_) | RateOutcome::Stale => None,
        RateOutcome::Unavailable(reason) => Some(ui::style_text(
            &format!(
                "Exchange rate unavailable ({reason}), keeping {}",
                ledger.state().exchange_ratio
            ),
            StyleType::Error,
        )),
    }
}

fn items_table(ledger: &BudgetLedger, list: LedgerList) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell(if list == LedgerList::Income {
            "Source"
        } else {
            "Expense"
        }),
        ui::header_cell("Amount"),
        ui::header_cell("Currency"),
    ]);
    for (i, item) in ledger.items(list).iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.label),
            ui::amount_cell(item.amount, BUDGET_PRECISION),
            Cell::new(item.currency.as_str()),
        ]);
    }
    table
}

/// Renders both lists, the exchange rate and the derived totals.
pub fn render_budget(ledger: &BudgetLedger) -> String {
    let state = ledger.state();
    let totals = ledger.recompute_totals();
    let base = state.base_currency.as_str();

    let mut out = Vec::new();
    out.push(ui::style_text("Income", StyleType::Title));
    out.push(items_table(ledger, LedgerList::Income).to_string());
    out.push(ui::style_text("Expenses", StyleType::Title));
    out.push(items_table(ledger, LedgerList::Expenses).to_string());

    out.push(ui::style_text(
        &format!(
            "1 {} = {} {}",
            state.foreign_currency, state.exchange_ratio, state.base_currency
        ),
        StyleType::Subtle,
    ));

    let mut summary = ui::new_styled_table();
    summary.add_row(vec![
        Cell::new(ui::style_text("Total Income", StyleType::TotalLabel)),
        Cell::new(format_money(totals.total_income, BUDGET_PRECISION, base))
            .set_alignment(comfy_table::CellAlignment::Right),
    ]);
    summary.add_row(vec![
        Cell::new(ui::style_text("Total Expenses", StyleType::TotalLabel)),
        Cell::new(format_money(totals.total_expenses, BUDGET_PRECISION, base))
            .set_alignment(comfy_table::CellAlignment::Right),
    ]);
    summary.add_row(vec![
        Cell::new(ui::style_text("Savings", StyleType::TotalLabel)),
        ui::signed_total_cell(
            format_money(totals.savings, BUDGET_PRECISION, base),
            totals.savings,
        ),
    ]);
    out.push(summary.to_string());

    if totals.unrecognized_rows > 0 {
        out.push(ui::style_text(
            &format!(
                "{} row(s) are in neither {} nor {} and were counted as {}",
                totals.unrecognized_rows, state.base_currency, state.foreign_currency, base
            ),
            StyleType::Error,
        ));
    }

    out.join("\n")
}
