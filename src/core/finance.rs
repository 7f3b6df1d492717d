//! Closed-form loan and investment formulas.
//!
//! Every function validates its inputs and returns [`CalcError::InvalidInput`]
//! instead of producing a meaningless number, so callers can tell "nothing to
//! show" apart from a computed result.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Monthly repayment schedule summary for an amortizing loan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmiBreakdown {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// Outcome of a fixed monthly contribution plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SipProjection {
    pub invested: f64,
    pub future_value: f64,
    pub returns: f64,
}

/// Outcome of a single upfront investment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpsumProjection {
    pub invested: f64,
    pub returns: f64,
    pub future_value: f64,
}

/// Largest loan a given monthly payment can service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordableLoan {
    pub principal: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

fn require_positive(name: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::InvalidInput(format!("{name} must be a finite number")));
    }
    if value <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "{name} must be greater than zero, got {value}"
        )));
    }
    Ok(value)
}

fn require_rate(value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::InvalidInput(
            "annual rate must be a finite number".to_string(),
        ));
    }
    if value < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "annual rate cannot be negative, got {value}"
        )));
    }
    Ok(value)
}

fn require_term(term_months: u32) -> CalcResult<f64> {
    if term_months == 0 {
        return Err(CalcError::InvalidInput(
            "term must be at least one month".to_string(),
        ));
    }
    Ok(f64::from(term_months))
}

fn require_finite(name: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::InvalidInput(format!(
            "{name} overflowed; try a shorter term or a lower rate"
        )))
    }
}

/// Converts an annual percentage rate to a monthly fraction (12% -> 0.01).
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 12.0 / 100.0
}

/// Equated monthly installment for `principal` over `term_months`.
///
/// A zero rate is amortized linearly rather than going through the annuity
/// formula, which would divide by zero.
pub fn compute_emi(
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> CalcResult<EmiBreakdown> {
    let principal = require_positive("principal", principal)?;
    let annual_rate_percent = require_rate(annual_rate_percent)?;
    let n = require_term(term_months)?;

    let monthly_payment = if annual_rate_percent == 0.0 {
        principal / n
    } else {
        let r = monthly_rate(annual_rate_percent);
        let growth = (1.0 + r).powf(n);
        principal * r * growth / (growth - 1.0)
    };
    let monthly_payment = require_finite("monthly payment", monthly_payment)?;

    let total_payment = monthly_payment * n;
    Ok(EmiBreakdown {
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}

/// Future value of `periodic_amount` paid at the start of every month.
pub fn compute_sip_future_value(
    periodic_amount: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> CalcResult<SipProjection> {
    let amount = require_positive("monthly amount", periodic_amount)?;
    let annual_rate_percent = require_rate(annual_rate_percent)?;
    let n = require_term(term_months)?;

    let future_value = if annual_rate_percent == 0.0 {
        amount * n
    } else {
        let r = monthly_rate(annual_rate_percent);
        amount * (((1.0 + r).powf(n) - 1.0) / r) * (1.0 + r)
    };
    let future_value = require_finite("future value", future_value)?;

    let invested = amount * n;
    Ok(SipProjection {
        invested,
        future_value,
        returns: future_value - invested,
    })
}

/// Annually compounded growth of a single investment.
///
/// `term_years` may be fractional. Negative rates are accepted and shrink the
/// principal.
pub fn compute_lumpsum_future_value(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
) -> CalcResult<LumpsumProjection> {
    let principal = require_positive("principal", principal)?;
    if !annual_rate_percent.is_finite() {
        return Err(CalcError::InvalidInput(
            "annual rate must be a finite number".to_string(),
        ));
    }
    if !term_years.is_finite() || term_years < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "term in years must be zero or more, got {term_years}"
        )));
    }

    let future_value = principal * (1.0 + annual_rate_percent / 100.0).powf(term_years);
    let future_value = require_finite("future value", future_value)?;

    Ok(LumpsumProjection {
        invested: principal,
        returns: future_value - principal,
        future_value,
    })
}

/// Monthly contribution needed to reach `target_future_value`.
///
/// Inverse of [`compute_sip_future_value`].
pub fn compute_required_sip(
    target_future_value: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> CalcResult<f64> {
    let target = require_positive("target amount", target_future_value)?;
    let annual_rate_percent = require_rate(annual_rate_percent)?;
    let n = require_term(term_months)?;

    let periodic_amount = if annual_rate_percent == 0.0 {
        target / n
    } else {
        let r = monthly_rate(annual_rate_percent);
        target / (((1.0 + r).powf(n) - 1.0) * (1.0 + r) / r)
    };
    require_finite("monthly amount", periodic_amount)
}

/// Principal that `monthly_payment` amortizes over `term_months`.
///
/// Inverse of [`compute_emi`].
pub fn compute_affordable_principal(
    monthly_payment: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> CalcResult<AffordableLoan> {
    let payment = require_positive("monthly payment", monthly_payment)?;
    let annual_rate_percent = require_rate(annual_rate_percent)?;
    let n = require_term(term_months)?;

    let principal = if annual_rate_percent == 0.0 {
        payment * n
    } else {
        let r = monthly_rate(annual_rate_percent);
        let growth = (1.0 + r).powf(n);
        payment * (growth - 1.0) / (r * growth)
    };
    let principal = require_finite("principal", principal)?;

    let total_payment = payment * n;
    Ok(AffordableLoan {
        principal,
        total_payment,
        total_interest: total_payment - principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_relative(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            ((actual - expected) / scale).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    const PRINCIPALS: [f64; 4] = [1.0, 2_500.0, 100_000.0, 7_654_321.5];
    const RATES: [f64; 5] = [0.0, 0.5, 7.25, 12.0, 24.0];
    const TERMS: [u32; 5] = [1, 6, 12, 120, 360];

    #[test]
    fn test_emi_reference_loan() {
        let emi = compute_emi(100_000.0, 10.0, 12).unwrap();
        assert_close(emi.monthly_payment, 8791.59, 0.005);
        assert_close(emi.total_payment, 105_499.06, 0.005);
        assert_close(emi.total_interest, 5_499.06, 0.005);
    }

    #[test]
    fn test_emi_zero_rate_is_linear() {
        let emi = compute_emi(120_000.0, 0.0, 7).unwrap();
        assert_eq!(emi.monthly_payment, 120_000.0 / 7.0);
        assert_eq!(emi.total_interest, emi.total_payment - 120_000.0);
    }

    #[test]
    fn test_emi_totals_are_consistent() {
        for principal in PRINCIPALS {
            for rate in RATES {
                for months in TERMS {
                    let emi = compute_emi(principal, rate, months).unwrap();
                    assert_eq!(emi.total_payment, emi.monthly_payment * f64::from(months));
                    assert_eq!(emi.total_interest, emi.total_payment - principal);
                    assert!(
                        emi.total_interest >= -1e-9 * principal,
                        "negative interest for {principal} {rate} {months}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_emi_rejects_invalid_input() {
        assert!(compute_emi(0.0, 10.0, 12).is_err());
        assert!(compute_emi(-5.0, 10.0, 12).is_err());
        assert!(compute_emi(f64::NAN, 10.0, 12).is_err());
        assert!(compute_emi(1000.0, f64::INFINITY, 12).is_err());
        assert!(compute_emi(1000.0, -1.0, 12).is_err());
        assert_eq!(
            compute_emi(1000.0, 10.0, 0),
            Err(CalcError::InvalidInput(
                "term must be at least one month".to_string()
            ))
        );
    }

    #[test]
    fn test_affordability_inverts_emi() {
        for principal in PRINCIPALS {
            for rate in RATES {
                for months in TERMS {
                    let emi = compute_emi(principal, rate, months).unwrap();
                    let loan =
                        compute_affordable_principal(emi.monthly_payment, rate, months).unwrap();
                    assert_relative(loan.principal, principal);
                    assert_eq!(loan.total_payment, emi.monthly_payment * f64::from(months));
                }
            }
        }
    }

    #[test]
    fn test_affordability_zero_rate() {
        let loan = compute_affordable_principal(500.0, 0.0, 24).unwrap();
        assert_eq!(loan.principal, 12_000.0);
        assert_eq!(loan.total_interest, 0.0);
    }

    #[test]
    fn test_affordability_rejects_non_positive_payment() {
        assert!(compute_affordable_principal(0.0, 8.0, 12).is_err());
        assert!(compute_affordable_principal(-10.0, 8.0, 12).is_err());
    }

    #[test]
    fn test_sip_reference_plan() {
        let sip = compute_sip_future_value(5_000.0, 12.0, 12).unwrap();
        assert_eq!(sip.invested, 60_000.0);
        assert_close(sip.future_value, 64_046.64, 0.005);
        assert_close(sip.returns, 4_046.64, 0.005);
    }

    #[test]
    fn test_sip_zero_rate_has_no_growth() {
        let sip = compute_sip_future_value(1_000.0, 0.0, 36).unwrap();
        assert_eq!(sip.future_value, 36_000.0);
        assert_eq!(sip.returns, 0.0);
    }

    #[test]
    fn test_required_sip_inverts_future_value() {
        for amount in PRINCIPALS {
            for rate in RATES {
                for months in TERMS {
                    let sip = compute_sip_future_value(amount, rate, months).unwrap();
                    let required = compute_required_sip(sip.future_value, rate, months).unwrap();
                    assert_relative(required, amount);
                }
            }
        }
    }

    #[test]
    fn test_required_sip_rejects_missing_target() {
        assert!(compute_required_sip(0.0, 12.0, 12).is_err());
        assert!(compute_required_sip(10_000.0, 12.0, 0).is_err());
    }

    #[test]
    fn test_lumpsum_fractional_years() {
        let lumpsum = compute_lumpsum_future_value(10_000.0, 12.0, 2.5).unwrap();
        assert_eq!(lumpsum.invested, 10_000.0);
        assert_close(lumpsum.future_value, 13_275.32, 0.005);
        assert_close(lumpsum.returns, 3_275.32, 0.005);
    }

    #[test]
    fn test_lumpsum_accepts_negative_rate() {
        let lumpsum = compute_lumpsum_future_value(1_000.0, -10.0, 1.0).unwrap();
        assert_close(lumpsum.future_value, 900.0, 1e-9);
        assert!(lumpsum.returns < 0.0);
    }

    #[test]
    fn test_lumpsum_rejects_invalid_input() {
        assert!(compute_lumpsum_future_value(0.0, 5.0, 1.0).is_err());
        assert!(compute_lumpsum_future_value(100.0, 5.0, -1.0).is_err());
        assert!(compute_lumpsum_future_value(100.0, f64::NAN, 1.0).is_err());
        // A -200% rate over half a year has no real result.
        assert!(compute_lumpsum_future_value(100.0, -200.0, 0.5).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = compute_sip_future_value(1e300, 1_000.0, 1_000);
        assert!(matches!(result, Err(CalcError::InvalidInput(_))));
    }
}
