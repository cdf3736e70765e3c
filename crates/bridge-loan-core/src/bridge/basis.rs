use serde::{Deserialize, Serialize};

use super::pct_of;
use super::scenario::LoanScenario;
use crate::types::Money;

/// Which cap sized the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanSizingConstraint {
    /// ARV × max leverage.
    Leverage,
    /// Purchase + rehab + contingency.
    TotalProjectCost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisOutput {
    pub contingency_amount: Money,
    pub total_project_cost: Money,
    pub max_loan_by_leverage: Money,
    pub max_loan_amount: Money,
    pub binding_constraint: LoanSizingConstraint,
}

/// Resolve the total project cost and size the loan against the lesser of
/// the leverage cap and the cost basis.
///
/// Expects a validated scenario; never fails.
pub fn calculate_basis(scenario: &LoanScenario) -> BasisOutput {
    let hard_cost = scenario.purchase_price + scenario.rehab_budget;
    let contingency_amount = pct_of(hard_cost, scenario.budget_contingency_percent);
    let total_project_cost = hard_cost + contingency_amount;

    let max_loan_by_leverage = pct_of(scenario.after_repair_value, scenario.max_leverage);

    let (max_loan_amount, binding_constraint) = if max_loan_by_leverage <= total_project_cost {
        (max_loan_by_leverage, LoanSizingConstraint::Leverage)
    } else {
        (total_project_cost, LoanSizingConstraint::TotalProjectCost)
    };

    BasisOutput {
        contingency_amount,
        total_project_cost,
        max_loan_by_leverage,
        max_loan_amount,
        binding_constraint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn scenario(arv: Money, leverage: Money, contingency: Money) -> LoanScenario {
        LoanScenario {
            purchase_price: dec!(38_000),
            rehab_budget: dec!(30_000),
            after_repair_value: arv,
            max_leverage: leverage,
            origination_fee_rate: dec!(2),
            initial_ltv_cap: dec!(100),
            interest_rate: dec!(12),
            term_months: 6,
            interest_reserve_requested: false,
            budget_contingency_percent: contingency,
            down_payment_rate_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_leverage_binds() {
        let out = calculate_basis(&scenario(dec!(84_006), dec!(70), Decimal::ZERO));
        assert_eq!(out.total_project_cost, dec!(68_000));
        assert_eq!(out.max_loan_by_leverage, dec!(58_804.20));
        assert_eq!(out.max_loan_amount, dec!(58_804.20));
        assert_eq!(out.binding_constraint, LoanSizingConstraint::Leverage);
    }

    #[test]
    fn test_cost_caps_loan() {
        // 150k * 70% = 105k > 68k project cost
        let out = calculate_basis(&scenario(dec!(150_000), dec!(70), Decimal::ZERO));
        assert_eq!(out.max_loan_amount, dec!(68_000));
        assert_eq!(out.binding_constraint, LoanSizingConstraint::TotalProjectCost);
    }

    #[test]
    fn test_contingency_added_to_cost() {
        // (38k + 30k) * 5% = 3.4k
        let out = calculate_basis(&scenario(dec!(84_006), dec!(70), dec!(5)));
        assert_eq!(out.contingency_amount, dec!(3_400));
        assert_eq!(out.total_project_cost, dec!(71_400));
    }

    #[test]
    fn test_tie_reports_leverage() {
        // 100k * 68% = 68k == project cost
        let out = calculate_basis(&scenario(dec!(100_000), dec!(68), Decimal::ZERO));
        assert_eq!(out.max_loan_amount, dec!(68_000));
        assert_eq!(out.binding_constraint, LoanSizingConstraint::Leverage);
    }
}
