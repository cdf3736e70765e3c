use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::basis::BasisOutput;
use super::pct_of;
use super::scenario::LoanScenario;
use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceConstraint {
    /// Purchase price × initial LTV cap.
    PurchaseLtvCap,
    /// Loan amount less the rehab budget held back for draws.
    NonRehabBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceOutput {
    pub advance_by_ltv_cap: Money,
    pub advance_by_basis: Money,
    /// May be negative when the rehab budget exceeds the loan amount.
    pub max_initial_advance: Money,
    pub binding_constraint: AdvanceConstraint,
}

impl AdvanceOutput {
    /// False when the rehab holdback alone exceeds the loan.
    pub fn is_feasible(&self) -> bool {
        self.max_initial_advance >= Decimal::ZERO
    }
}

/// Maximum amount disbursable at closing, before rehab draws.
///
/// The result is deliberately left unclamped: a negative advance marks an
/// under-leveraged deal and must reach the caller as such.
pub fn calculate_advance(scenario: &LoanScenario, basis: &BasisOutput) -> AdvanceOutput {
    let advance_by_ltv_cap = pct_of(scenario.purchase_price, scenario.initial_ltv_cap);
    let advance_by_basis = basis.max_loan_amount - scenario.rehab_budget;

    let (max_initial_advance, binding_constraint) = if advance_by_ltv_cap <= advance_by_basis {
        (advance_by_ltv_cap, AdvanceConstraint::PurchaseLtvCap)
    } else {
        (advance_by_basis, AdvanceConstraint::NonRehabBasis)
    };

    AdvanceOutput {
        advance_by_ltv_cap,
        advance_by_basis,
        max_initial_advance,
        binding_constraint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::basis::calculate_basis;
    use rust_decimal_macros::dec;

    fn scenario() -> LoanScenario {
        LoanScenario {
            purchase_price: dec!(38_000),
            rehab_budget: dec!(30_000),
            after_repair_value: dec!(84_006),
            max_leverage: dec!(70),
            origination_fee_rate: dec!(2),
            initial_ltv_cap: dec!(100),
            interest_rate: dec!(12),
            term_months: 6,
            interest_reserve_requested: false,
            budget_contingency_percent: Decimal::ZERO,
            down_payment_rate_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_basis_binds() {
        let s = scenario();
        let out = calculate_advance(&s, &calculate_basis(&s));
        // 58_804.20 - 30_000 < 38_000
        assert_eq!(out.max_initial_advance, dec!(28_804.20));
        assert_eq!(out.binding_constraint, AdvanceConstraint::NonRehabBasis);
        assert!(out.is_feasible());
    }

    #[test]
    fn test_ltv_cap_binds() {
        let mut s = scenario();
        s.initial_ltv_cap = dec!(50);
        let out = calculate_advance(&s, &calculate_basis(&s));
        assert_eq!(out.max_initial_advance, dec!(19_000));
        assert_eq!(out.binding_constraint, AdvanceConstraint::PurchaseLtvCap);
    }

    #[test]
    fn test_negative_advance_not_clamped() {
        let mut s = scenario();
        s.rehab_budget = dec!(80_000);
        s.after_repair_value = dec!(100_000);
        // loan = min(70k, 118k) = 70k; 70k - 80k = -10k
        let out = calculate_advance(&s, &calculate_basis(&s));
        assert_eq!(out.max_initial_advance, dec!(-10_000));
        assert!(!out.is_feasible());
    }
}
