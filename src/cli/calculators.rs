use super::ui::{self, StyleType};
use crate::core::finance::{
    CalcResult, compute_affordable_principal, compute_emi, compute_lumpsum_future_value,
    compute_required_sip, compute_sip_future_value,
};
use crate::core::format::CALCULATOR_PRECISION;
use clap::Args;
use comfy_table::Table;
use tracing::debug;

/// Loan or investment duration entered as years plus extra months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Args)]
pub struct Tenure {
    /// Whole years
    #[arg(short, long, default_value_t = 0)]
    pub years: u32,
    /// Extra months on top of the years
    #[arg(short, long, default_value_t = 0)]
    pub months: u32,
}

impl Tenure {
    pub fn total_months(&self) -> u32 {
        self.years.saturating_mul(12).saturating_add(self.months)
    }

    pub fn in_years(&self) -> f64 {
        f64::from(self.years) + f64::from(self.months) / 12.0
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct EmiArgs {
    /// Loan amount
    #[arg(short, long)]
    pub principal: f64,
    /// Annual interest rate in percent
    #[arg(short, long)]
    pub rate: f64,
    #[command(flatten)]
    pub tenure: Tenure,
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct SipArgs {
    /// Monthly contribution
    #[arg(short, long)]
    pub amount: f64,
    /// Expected annual return in percent
    #[arg(short, long)]
    pub rate: f64,
    #[command(flatten)]
    pub tenure: Tenure,
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct LumpsumArgs {
    /// One-time investment
    #[arg(short, long)]
    pub amount: f64,
    /// Expected annual return in percent, may be negative
    #[arg(short, long, allow_negative_numbers = true)]
    pub rate: f64,
    #[command(flatten)]
    pub tenure: Tenure,
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct GoalArgs {
    /// Amount to accumulate
    #[arg(short, long)]
    pub target: f64,
    /// Expected annual return in percent
    #[arg(short, long)]
    pub rate: f64,
    #[command(flatten)]
    pub tenure: Tenure,
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct AffordArgs {
    /// Monthly installment you can pay
    #[arg(short, long)]
    pub emi: f64,
    /// Annual interest rate in percent
    #[arg(short, long)]
    pub rate: f64,
    #[command(flatten)]
    pub tenure: Tenure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Calculation {
    Emi(EmiArgs),
    Sip(SipArgs),
    Lumpsum(LumpsumArgs),
    Goal(GoalArgs),
    Afford(AffordArgs),
}

/// Named results of one calculator run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorReport {
    pub title: &'static str,
    pub fields: Vec<(&'static str, f64)>,
}

impl CalculatorReport {
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    pub fn display_as_table(&self) -> Table {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Result"), ui::header_cell("Value")]);
        for (name, value) in &self.fields {
            table.add_row(vec![
                comfy_table::Cell::new(name),
                ui::amount_cell(*value, CALCULATOR_PRECISION),
            ]);
        }
        table
    }
}

pub fn evaluate(calculation: &Calculation) -> CalcResult<CalculatorReport> {
    debug!(?calculation, "Evaluating calculator");
    let report = match calculation {
        Calculation::Emi(args) => {
            let emi = compute_emi(args.principal, args.rate, args.tenure.total_months())?;
            CalculatorReport {
                title: "Loan EMI",
                fields: vec![
                    ("Monthly EMI", emi.monthly_payment),
                    ("Total Payment", emi.total_payment),
                    ("Total Interest", emi.total_interest),
                ],
            }
        }
        Calculation::Sip(args) => {
            let sip = compute_sip_future_value(args.amount, args.rate, args.tenure.total_months())?;
            CalculatorReport {
                title: "SIP Projection",
                fields: vec![
                    ("Invested Amount", sip.invested),
                    ("Estimated Returns", sip.returns),
                    ("Total Value", sip.future_value),
                ],
            }
        }
        Calculation::Lumpsum(args) => {
            let lumpsum =
                compute_lumpsum_future_value(args.amount, args.rate, args.tenure.in_years())?;
            CalculatorReport {
                title: "Lumpsum Projection",
                fields: vec![
                    ("Invested Amount", lumpsum.invested),
                    ("Estimated Returns", lumpsum.returns),
                    ("Total Value", lumpsum.future_value),
                ],
            }
        }
        Calculation::Goal(args) => {
            let monthly = compute_required_sip(args.target, args.rate, args.tenure.total_months())?;
            CalculatorReport {
                title: "Goal Planner",
                fields: vec![("Monthly SIP Needed", monthly)],
            }
        }
        Calculation::Afford(args) => {
            let loan =
                compute_affordable_principal(args.emi, args.rate, args.tenure.total_months())?;
            CalculatorReport {
                title: "Loan Affordability",
                fields: vec![
                    ("Affordable Loan", loan.principal),
                    ("Total Payment", loan.total_payment),
                    ("Total Interest", loan.total_interest),
                ],
            }
        }
    };
    Ok(report)
}

/// Prints the calculator result, or the reason nothing could be computed.
pub fn run(calculation: &Calculation) -> anyhow::Result<()> {
    match evaluate(calculation) {
        Ok(report) => {
            println!("{}", ui::style_text(report.title, StyleType::Title));
            println!("{}", report.display_as_table());
        }
        Err(e) => {
            println!("{}", ui::style_text(&e.to_string(), StyleType::Error));
        }
    }
    Ok(())
}
