use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::advance::calculate_advance;
use super::basis::{calculate_basis, LoanSizingConstraint};
use super::capital::aggregate_capital;
use super::fees::{calculate_fees, FeeSchedule};
use super::interest::calculate_interest;
use super::scenario::{validate_scenario, LoanScenario};
use super::{CONTINGENCY_BUFFER_PERCENT, DAYS_PER_MONTH, DAY_COUNT_BASIS, PRORATED_CLOSING_DAYS};
use crate::types::*;
use crate::BridgeLoanResult;

/// Leverage above this percent of ARV is computed honestly but flagged.
const UNUSUAL_LEVERAGE: Percent = dec!(100);
/// Initial LTV cap above this percent of purchase price is flagged.
const UNUSUAL_INITIAL_LTV: Percent = dec!(150);

// ---------------------------------------------------------------------------
// Output type
// ---------------------------------------------------------------------------

/// Underwriting figures for one scenario, as quoted on a term sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEconomics {
    pub contingency_amount: Money,
    pub total_project_cost: Money,
    pub max_loan_by_leverage: Money,
    pub max_loan_amount: Money,
    pub binding_constraint: LoanSizingConstraint,
    /// Negative when the rehab budget exceeds the loan; never clamped.
    pub max_initial_advance: Money,
    pub down_payment_shortfall: Money,
    pub origination_fee: Money,
    pub processing_fee: Money,
    pub application_fee: Money,
    pub doc_prep_fee: Money,
    pub daily_interest_rate: Percent,
    pub per_diem_interest: Money,
    pub monthly_interest_payment: Money,
    pub interest_reserve_amount: Money,
    pub prorated_closing_interest: Money,
    pub contingency_buffer: Money,
    pub total_closing_fees: Money,
    pub estimated_cash_to_close: Money,
    pub required_proof_of_capital: Money,
    pub net_funding: Money,
}

impl LoanEconomics {
    /// Look up a currency or percent figure by its serialized field name.
    pub fn metric(&self, name: &str) -> Option<Decimal> {
        let value = match name {
            "contingency_amount" => self.contingency_amount,
            "total_project_cost" => self.total_project_cost,
            "max_loan_by_leverage" => self.max_loan_by_leverage,
            "max_loan_amount" => self.max_loan_amount,
            "max_initial_advance" => self.max_initial_advance,
            "down_payment_shortfall" => self.down_payment_shortfall,
            "origination_fee" => self.origination_fee,
            "processing_fee" => self.processing_fee,
            "application_fee" => self.application_fee,
            "doc_prep_fee" => self.doc_prep_fee,
            "daily_interest_rate" => self.daily_interest_rate,
            "per_diem_interest" => self.per_diem_interest,
            "monthly_interest_payment" => self.monthly_interest_payment,
            "interest_reserve_amount" => self.interest_reserve_amount,
            "prorated_closing_interest" => self.prorated_closing_interest,
            "contingency_buffer" => self.contingency_buffer,
            "total_closing_fees" => self.total_closing_fees,
            "estimated_cash_to_close" => self.estimated_cash_to_close,
            "required_proof_of_capital" => self.required_proof_of_capital,
            "net_funding" => self.net_funding,
            _ => return None,
        };
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute bridge-loan economics under the standard fee schedule.
pub fn compute_loan_economics(
    scenario: &LoanScenario,
) -> BridgeLoanResult<ComputationOutput<LoanEconomics>> {
    compute_loan_economics_with_fees(scenario, &FeeSchedule::default())
}

/// Compute bridge-loan economics under a lender-specific fee schedule.
///
/// Inputs are validated before any stage runs, so the result is either a
/// complete record or an `InvalidInput` naming the offending field.
pub fn compute_loan_economics_with_fees(
    scenario: &LoanScenario,
    fees: &FeeSchedule,
) -> BridgeLoanResult<ComputationOutput<LoanEconomics>> {
    let start = Instant::now();

    validate_scenario(scenario)?;
    fees.validate()?;

    let economics = run_pipeline(scenario, fees);
    let warnings = collect_warnings(scenario, &economics);
    for w in &warnings {
        warn!(warning = %w, "bridge loan scenario flagged");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "day_count_basis": DAY_COUNT_BASIS.to_string(),
        "days_per_month": DAYS_PER_MONTH.to_string(),
        "prorated_closing_days": PRORATED_CLOSING_DAYS.to_string(),
        "contingency_buffer_percent": CONTINGENCY_BUFFER_PERCENT.to_string(),
        "fee_schedule": fees,
        "interest_reserve_requested": scenario.interest_reserve_requested,
    });

    Ok(with_metadata(
        "Bridge Loan Economics (simple interest, 30/360)",
        &assumptions,
        warnings,
        elapsed,
        economics,
    ))
}

/// Stages 1 through 5 over an already-validated scenario.
fn run_pipeline(scenario: &LoanScenario, schedule: &FeeSchedule) -> LoanEconomics {
    let basis = calculate_basis(scenario);
    debug!(
        total_project_cost = %basis.total_project_cost,
        max_loan_amount = %basis.max_loan_amount,
        binding = ?basis.binding_constraint,
        "basis resolved"
    );

    let advance = calculate_advance(scenario, &basis);
    debug!(max_initial_advance = %advance.max_initial_advance, "advance resolved");

    let fees = calculate_fees(basis.max_loan_amount, scenario.origination_fee_rate, schedule);
    let interest = calculate_interest(
        basis.max_loan_amount,
        scenario.interest_rate,
        scenario.term_months,
    );
    debug!(
        origination_fee = %fees.origination_fee,
        per_diem_interest = %interest.per_diem_interest,
        interest_reserve_amount = %interest.interest_reserve_amount,
        "fees and interest resolved"
    );

    let capital = aggregate_capital(scenario.rehab_budget, &basis, &fees, &interest);
    debug!(
        estimated_cash_to_close = %capital.estimated_cash_to_close,
        required_proof_of_capital = %capital.required_proof_of_capital,
        "capital aggregated"
    );

    LoanEconomics {
        contingency_amount: basis.contingency_amount,
        total_project_cost: basis.total_project_cost,
        max_loan_by_leverage: basis.max_loan_by_leverage,
        max_loan_amount: basis.max_loan_amount,
        binding_constraint: basis.binding_constraint,
        max_initial_advance: advance.max_initial_advance,
        down_payment_shortfall: capital.down_payment_shortfall,
        origination_fee: fees.origination_fee,
        processing_fee: fees.processing_fee,
        application_fee: fees.application_fee,
        doc_prep_fee: fees.doc_prep_fee,
        daily_interest_rate: interest.daily_interest_rate,
        per_diem_interest: interest.per_diem_interest,
        monthly_interest_payment: interest.monthly_interest_payment,
        interest_reserve_amount: interest.interest_reserve_amount,
        prorated_closing_interest: interest.prorated_closing_interest,
        contingency_buffer: capital.contingency_buffer,
        total_closing_fees: capital.total_closing_fees,
        estimated_cash_to_close: capital.estimated_cash_to_close,
        required_proof_of_capital: capital.required_proof_of_capital,
        net_funding: capital.net_funding,
    }
}

fn collect_warnings(scenario: &LoanScenario, economics: &LoanEconomics) -> Vec<String> {
    let mut warnings = Vec::new();

    if economics.max_initial_advance < Decimal::ZERO {
        warnings.push(format!(
            "Initial advance is negative ({}): rehab budget {} exceeds max loan amount {}.",
            economics.max_initial_advance.round_dp(2),
            scenario.rehab_budget,
            economics.max_loan_amount.round_dp(2),
        ));
    }
    if !scenario.down_payment_rate_percent.is_zero() {
        warnings.push(format!(
            "down_payment_rate_percent ({}) is not used by any formula; shortfall is derived from the cost basis.",
            scenario.down_payment_rate_percent,
        ));
    }
    if scenario.max_leverage > UNUSUAL_LEVERAGE {
        warnings.push(format!(
            "max_leverage of {}% exceeds 100% of ARV.",
            scenario.max_leverage
        ));
    }
    if scenario.initial_ltv_cap > UNUSUAL_INITIAL_LTV {
        warnings.push(format!(
            "initial_ltv_cap of {}% exceeds 150% of purchase price.",
            scenario.initial_ltv_cap
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
