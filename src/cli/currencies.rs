use super::ui::{self, StyleType};
use crate::core::currency::{CurrencyInfo, search_currencies};
use comfy_table::{Cell, Table};

fn currency_table(currencies: &[CurrencyInfo]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);
    for currency in currencies {
        table.add_row(vec![Cell::new(currency.code), Cell::new(currency.name)]);
    }
    table
}

/// Lists known currencies, optionally narrowed by `filter`.
pub fn run(filter: Option<&str>) -> anyhow::Result<()> {
    let matches = search_currencies(filter.unwrap_or_default());
    if matches.is_empty() {
        println!(
            "{}",
            ui::style_text("No matching currencies.", StyleType::Subtle)
        );
        return Ok(());
    }
    println!("{}", currency_table(&matches));
    Ok(())
}
