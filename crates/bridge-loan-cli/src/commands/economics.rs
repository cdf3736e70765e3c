use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bridge_loan_core::bridge::economics;
use bridge_loan_core::bridge::scenario::LoanScenario;

use crate::input;

/// Arguments for a loan economics calculation
#[derive(Args)]
pub struct EconomicsArgs {
    /// Path to JSON scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a YAML or JSON fee schedule (defaults to the standard schedule)
    #[arg(long)]
    pub fees: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Rehab budget
    #[arg(long)]
    pub rehab_budget: Option<Decimal>,

    /// After-repair value (ARV)
    #[arg(long, alias = "arv")]
    pub after_repair_value: Option<Decimal>,

    /// Max leverage, percent of ARV (70 = 70%)
    #[arg(long)]
    pub max_leverage: Option<Decimal>,

    /// Origination fee, percent of loan amount
    #[arg(long)]
    pub origination_fee_rate: Option<Decimal>,

    /// Initial advance cap, percent of purchase price
    #[arg(long, alias = "ltv")]
    pub initial_ltv_cap: Option<Decimal>,

    /// Annual interest rate, percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Budget contingency, percent of purchase + rehab
    #[arg(long, default_value = "0")]
    pub budget_contingency_percent: Decimal,

    /// Down payment rate, percent (recorded but not used by any formula)
    #[arg(long, default_value = "0")]
    pub down_payment_rate_percent: Decimal,

    /// Borrower requested an interest reserve
    #[arg(long)]
    pub interest_reserve: bool,
}

impl EconomicsArgs {
    fn scenario_from_flags(&self) -> Result<LoanScenario, Box<dyn std::error::Error>> {
        Ok(LoanScenario {
            purchase_price: self.purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            rehab_budget: self.rehab_budget
                .ok_or("--rehab-budget is required (or provide --input)")?,
            after_repair_value: self.after_repair_value
                .ok_or("--after-repair-value is required (or provide --input)")?,
            max_leverage: self.max_leverage
                .ok_or("--max-leverage is required (or provide --input)")?,
            origination_fee_rate: self.origination_fee_rate
                .ok_or("--origination-fee-rate is required (or provide --input)")?,
            initial_ltv_cap: self.initial_ltv_cap
                .ok_or("--initial-ltv-cap is required (or provide --input)")?,
            interest_rate: self.interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            term_months: self.term_months
                .ok_or("--term-months is required (or provide --input)")?,
            interest_reserve_requested: self.interest_reserve,
            budget_contingency_percent: self.budget_contingency_percent,
            down_payment_rate_percent: self.down_payment_rate_percent,
        })
    }
}

pub fn run_economics(args: EconomicsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: LoanScenario = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        args.scenario_from_flags()?
    };
    let fees = input::file::fee_schedule_or_default(args.fees.as_deref())?;

    let result = economics::compute_loan_economics_with_fees(&scenario, &fees)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flags() -> EconomicsArgs {
        EconomicsArgs {
            input: None,
            fees: None,
            purchase_price: Some(dec!(38000)),
            rehab_budget: Some(dec!(30000)),
            after_repair_value: Some(dec!(84006)),
            max_leverage: Some(dec!(70)),
            origination_fee_rate: Some(dec!(2.0)),
            initial_ltv_cap: Some(dec!(100)),
            interest_rate: Some(dec!(12)),
            term_months: Some(6),
            budget_contingency_percent: Decimal::ZERO,
            down_payment_rate_percent: Decimal::ZERO,
            interest_reserve: true,
        }
    }

    #[test]
    fn test_scenario_from_flags() {
        let scenario = flags().scenario_from_flags().unwrap();
        assert_eq!(scenario.purchase_price, dec!(38000));
        assert_eq!(scenario.after_repair_value, dec!(84006));
        assert_eq!(scenario.term_months, 6);
        assert!(scenario.interest_reserve_requested);
        assert_eq!(scenario.budget_contingency_percent, Decimal::ZERO);
    }

    #[test]
    fn test_missing_flag_named_in_error() {
        let mut args = flags();
        args.term_months = None;
        let err = args.scenario_from_flags().unwrap_err();
        assert_eq!(err.to_string(), "--term-months is required (or provide --input)");
    }
}
