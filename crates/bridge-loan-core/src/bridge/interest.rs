use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{pct_of, DAYS_PER_MONTH, DAY_COUNT_BASIS, PRORATED_CLOSING_DAYS};
use crate::types::{Money, Percent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestOutput {
    /// Percent per day.
    pub daily_interest_rate: Percent,
    pub per_diem_interest: Money,
    pub monthly_interest_payment: Money,
    /// Interest for the full term, whether or not a reserve was requested.
    pub interest_reserve_amount: Money,
    /// Two days of per-diem collected at closing.
    pub prorated_closing_interest: Money,
}

/// Simple interest on a 360-day year with 30-day months.
pub fn calculate_interest(
    max_loan_amount: Money,
    interest_rate: Percent,
    term_months: u32,
) -> InterestOutput {
    let daily_interest_rate = interest_rate / DAY_COUNT_BASIS;
    let per_diem_interest = pct_of(max_loan_amount, daily_interest_rate);
    let monthly_interest_payment = per_diem_interest * DAYS_PER_MONTH;
    let interest_reserve_amount = monthly_interest_payment * Decimal::from(term_months);

    InterestOutput {
        daily_interest_rate,
        per_diem_interest,
        monthly_interest_payment,
        interest_reserve_amount,
        prorated_closing_interest: per_diem_interest * PRORATED_CLOSING_DAYS,
    }
}
