//! Bridge-loan underwriting economics.
//!
//! A fixed pipeline of pure stages turns a [`scenario::LoanScenario`] into
//! [`economics::LoanEconomics`]: basis, initial advance, fees, interest and
//! the capital aggregation that yields the borrower's required proof of
//! capital. Percent inputs are whole-number percentages (12 = 12%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub mod advance;
pub mod basis;
pub mod capital;
pub mod economics;
pub mod fees;
pub mod interest;
pub mod reference;
pub mod scenario;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

/// Whole-number percentages are divided by this before use.
pub const PERCENT_DIVISOR: Decimal = dec!(100);

/// Actual/360 simple-interest convention.
pub const DAY_COUNT_BASIS: Decimal = dec!(360);

/// Days in a billing month under the 30/360 convention.
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// Days of interest collected at closing. An approximation of the accrual
/// between funding and the first scheduled payment, not a day-count-exact
/// figure.
pub const PRORATED_CLOSING_DAYS: Decimal = dec!(2);

/// Contingency buffer held against the rehab budget, in percent. Independent
/// of `budget_contingency_percent`.
pub const CONTINGENCY_BUFFER_PERCENT: Decimal = dec!(10);

/// Largest accepted currency amount. Keeps every stage's products and sums
/// inside `Decimal` range for any accepted scenario.
pub const MAX_MONEY: Decimal = dec!(1_000_000_000_000_000);

/// Largest accepted whole-number percentage.
pub const MAX_PERCENT: Decimal = dec!(1_000_000);

/// Longest accepted term, in months.
pub const MAX_TERM_MONTHS: u32 = 1_200;

pub(crate) fn pct_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / PERCENT_DIVISOR
}
