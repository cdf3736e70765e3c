use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::basis::BasisOutput;
use super::fees::FeeOutput;
use super::interest::InterestOutput;
use super::{pct_of, CONTINGENCY_BUFFER_PERCENT};
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalOutput {
    pub down_payment_shortfall: Money,
    pub contingency_buffer: Money,
    /// Origination + fixed fees + prorated closing interest.
    pub total_closing_fees: Money,
    pub estimated_cash_to_close: Money,
    pub required_proof_of_capital: Money,
    pub net_funding: Money,
}

/// Combine the earlier stages into the borrower's capital requirement.
///
/// The shortfall is counted once, inside cash-to-close; proof of capital
/// adds only the interest reserve and the rehab contingency buffer on top.
pub fn aggregate_capital(
    rehab_budget: Money,
    basis: &BasisOutput,
    fees: &FeeOutput,
    interest: &InterestOutput,
) -> CapitalOutput {
    let down_payment_shortfall =
        (basis.total_project_cost - basis.max_loan_amount).max(Decimal::ZERO);
    let contingency_buffer = pct_of(rehab_budget, CONTINGENCY_BUFFER_PERCENT);

    let total_closing_fees =
        fees.origination_fee + fees.fixed_fees_total + interest.prorated_closing_interest;
    let estimated_cash_to_close = down_payment_shortfall + total_closing_fees;
    let required_proof_of_capital =
        estimated_cash_to_close + interest.interest_reserve_amount + contingency_buffer;

    CapitalOutput {
        down_payment_shortfall,
        contingency_buffer,
        total_closing_fees,
        estimated_cash_to_close,
        required_proof_of_capital,
        net_funding: basis.max_loan_amount - fees.origination_fee,
    }
}
