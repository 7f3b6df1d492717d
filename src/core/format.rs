//! Number rendering shared by every calculator view.

/// Fractional digits shown by the loan and investment calculators.
pub const CALCULATOR_PRECISION: usize = 2;
/// Fractional digits shown by the budget planner.
pub const BUDGET_PRECISION: usize = 3;

/// Formats `value` with `precision` fractional digits and comma thousands
/// separators, e.g. `1,234,567.891`. Non-finite values render as zero.
pub fn format_amount(value: f64, precision: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", precision, value.abs());

    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    // Avoid "-0.00" for values that round to zero.
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats an amount followed by its currency code.
pub fn format_money(value: f64, precision: usize, currency: &str) -> String {
    format!("{} {}", format_amount(value, precision), currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0, 2), "0.00");
        assert_eq!(format_amount(999.994, 2), "999.99");
        assert_eq!(format_amount(1_000.0, 2), "1,000.00");
        assert_eq!(format_amount(8_791.588_723, 2), "8,791.59");
        assert_eq!(format_amount(105_499.064_676, 2), "105,499.06");
        assert_eq!(format_amount(1_234_567.891_2, 3), "1,234,567.891");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(-150.0, 3), "-150.000");
        assert_eq!(format_amount(-1_234.5, 2), "-1,234.50");
        assert_eq!(format_amount(-0.0001, 2), "0.00");
    }

    #[test]
    fn test_format_amount_non_finite() {
        assert_eq!(format_amount(f64::NAN, 3), "0.000");
        assert_eq!(format_amount(f64::INFINITY, 2), "0.00");
    }

    #[test]
    fn test_format_amount_zero_precision() {
        assert_eq!(format_amount(1_234_567.6, 0), "1,234,568");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(820.0, BUDGET_PRECISION, "USD"), "820.000 USD");
    }
}
