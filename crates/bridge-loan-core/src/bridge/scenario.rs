use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MAX_MONEY, MAX_PERCENT, MAX_TERM_MONTHS};
use crate::types::{Money, Percent};
use crate::{BridgeLoanError, BridgeLoanResult};

/// Deal parameters for a single bridge-loan calculation.
///
/// Field aliases accept the camelCase names used by the borrower portal's
/// intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    #[serde(alias = "purchasePrice")]
    pub purchase_price: Money,
    #[serde(alias = "rehabBudget")]
    pub rehab_budget: Money,
    /// Projected value once rehab work is complete (ARV).
    #[serde(alias = "afterRepairValue")]
    pub after_repair_value: Money,
    /// Percent of ARV the lender will advance.
    #[serde(alias = "maxLeverage")]
    pub max_leverage: Percent,
    /// Percent of the loan amount charged at closing.
    #[serde(alias = "originationFeeRate")]
    pub origination_fee_rate: Percent,
    /// Percent of the purchase price advanceable at closing.
    #[serde(alias = "initialLtvCap")]
    pub initial_ltv_cap: Percent,
    /// Nominal annual rate, simple interest.
    #[serde(alias = "interestRate")]
    pub interest_rate: Percent,
    #[serde(alias = "termMonths")]
    pub term_months: u32,
    /// Has no numeric effect: the reserve always covers the full term.
    #[serde(default, alias = "interestReserveRequested")]
    pub interest_reserve_requested: bool,
    /// Cushion added on top of purchase + rehab when sizing the project cost.
    #[serde(default, alias = "budgetContingencyPercent")]
    pub budget_contingency_percent: Percent,
    /// Captured from the intake form but not consumed by any formula.
    #[serde(default, alias = "downPaymentRatePercent")]
    pub down_payment_rate_percent: Percent,
}

impl LoanScenario {
    fn money_fields(&self) -> [(&'static str, Decimal); 3] {
        [
            ("purchase_price", self.purchase_price),
            ("rehab_budget", self.rehab_budget),
            ("after_repair_value", self.after_repair_value),
        ]
    }

    fn percent_fields(&self) -> [(&'static str, Decimal); 6] {
        [
            ("max_leverage", self.max_leverage),
            ("origination_fee_rate", self.origination_fee_rate),
            ("initial_ltv_cap", self.initial_ltv_cap),
            ("interest_rate", self.interest_rate),
            ("budget_contingency_percent", self.budget_contingency_percent),
            ("down_payment_rate_percent", self.down_payment_rate_percent),
        ]
    }
}

/// Reject a scenario before any stage runs. The first offending field is
/// reported.
pub fn validate_scenario(scenario: &LoanScenario) -> BridgeLoanResult<()> {
    let money = scenario.money_fields().map(|(f, v)| (f, v, MAX_MONEY));
    let percents = scenario.percent_fields().map(|(f, v)| (f, v, MAX_PERCENT));
    for (field, value, ceiling) in money.into_iter().chain(percents) {
        check_range(field, value, ceiling)?;
    }
    if scenario.term_months == 0 {
        return Err(BridgeLoanError::invalid(
            "term_months",
            "Term must be a positive number of months.",
        ));
    }
    if scenario.term_months > MAX_TERM_MONTHS {
        return Err(BridgeLoanError::invalid(
            "term_months",
            format!("Term must not exceed {MAX_TERM_MONTHS} months."),
        ));
    }
    Ok(())
}

/// Non-negative and no larger than `ceiling`.
pub(crate) fn check_range(field: &str, value: Decimal, ceiling: Decimal) -> BridgeLoanResult<()> {
    if value < Decimal::ZERO {
        return Err(BridgeLoanError::invalid(
            field,
            format!("Must be non-negative, got {value}."),
        ));
    }
    if value > ceiling {
        return Err(BridgeLoanError::invalid(
            field,
            format!("Must not exceed {ceiling}, got {value}."),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scenario() -> LoanScenario {
        LoanScenario {
            purchase_price: dec!(38_000),
            rehab_budget: dec!(30_000),
            after_repair_value: dec!(84_006),
            max_leverage: dec!(70),
            origination_fee_rate: dec!(2.0),
            initial_ltv_cap: dec!(100),
            interest_rate: dec!(12),
            term_months: 6,
            interest_reserve_requested: false,
            budget_contingency_percent: Decimal::ZERO,
            down_payment_rate_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_valid_scenario_passes() {
        assert!(validate_scenario(&scenario()).is_ok());
    }

    #[test]
    fn test_negative_rehab_rejected() {
        let mut s = scenario();
        s.rehab_budget = dec!(-1);
        match validate_scenario(&s).unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "rehab_budget"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_zero_accepted() {
        let mut s = scenario();
        s.budget_contingency_percent = -Decimal::ZERO;
        assert!(validate_scenario(&s).is_ok());
    }

    #[test]
    fn test_money_above_ceiling_rejected() {
        let mut s = scenario();
        s.purchase_price = Decimal::MAX;
        match validate_scenario(&s).unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "purchase_price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_percent_above_ceiling_rejected() {
        let mut s = scenario();
        s.interest_rate = MAX_PERCENT + dec!(1);
        match validate_scenario(&s).unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "interest_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_ceiling_itself_accepted() {
        let mut s = scenario();
        s.after_repair_value = MAX_MONEY;
        s.max_leverage = MAX_PERCENT;
        assert!(validate_scenario(&s).is_ok());
    }

    #[test]
    fn test_term_above_ceiling_rejected() {
        let mut s = scenario();
        s.term_months = u32::MAX;
        match validate_scenario(&s).unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut s = scenario();
        s.term_months = 0;
        match validate_scenario(&s).unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_portal_field_names() {
        let json = serde_json::json!({
            "purchasePrice": "38000",
            "rehabBudget": 30000,
            "afterRepairValue": "84006",
            "maxLeverage": 70,
            "originationFeeRate": "2.0",
            "initialLtvCap": 100,
            "interestRate": 12,
            "termMonths": 6,
            "interestReserveRequested": true
        });
        let s: LoanScenario = serde_json::from_value(json).unwrap();
        assert_eq!(s.purchase_price, dec!(38000));
        assert_eq!(s.rehab_budget, dec!(30000));
        assert_eq!(s.term_months, 6);
        assert!(s.interest_reserve_requested);
        assert_eq!(s.budget_contingency_percent, Decimal::ZERO);
        assert_eq!(s.down_payment_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_fractional_term_fails_to_deserialize() {
        let mut json = serde_json::to_value(scenario()).unwrap();
        json["term_months"] = serde_json::json!(6.5);
        assert!(serde_json::from_value::<LoanScenario>(json).is_err());
    }
}
