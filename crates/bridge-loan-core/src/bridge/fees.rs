use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::scenario::check_range;
use super::{pct_of, MAX_MONEY};
use crate::types::{Money, Percent};
use crate::BridgeLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_PROCESSING_FEE: Money = dec!(1745);
pub const DEFAULT_APPLICATION_FEE: Money = dec!(250);
pub const DEFAULT_DOC_PREP_FEE: Money = dec!(599);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Fixed closing fees charged by a lender, independent of loan size.
///
/// Missing fields fall back to the standard schedule, so a partial YAML/JSON
/// file only needs to name the fees it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    #[serde(alias = "processingFee")]
    pub processing_fee: Money,
    #[serde(alias = "applicationFee")]
    pub application_fee: Money,
    #[serde(alias = "docPrepFee")]
    pub doc_prep_fee: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            processing_fee: DEFAULT_PROCESSING_FEE,
            application_fee: DEFAULT_APPLICATION_FEE,
            doc_prep_fee: DEFAULT_DOC_PREP_FEE,
        }
    }
}

impl FeeSchedule {
    pub fn fixed_total(&self) -> Money {
        self.processing_fee + self.application_fee + self.doc_prep_fee
    }

    pub fn validate(&self) -> BridgeLoanResult<()> {
        let fees = [
            ("processing_fee", self.processing_fee),
            ("application_fee", self.application_fee),
            ("doc_prep_fee", self.doc_prep_fee),
        ];
        for (field, value) in fees {
            check_range(field, value, MAX_MONEY)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeOutput {
    pub origination_fee: Money,
    pub processing_fee: Money,
    pub application_fee: Money,
    pub doc_prep_fee: Money,
    pub fixed_fees_total: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Origination fee as a percent of the loan; fixed fees pass through.
pub fn calculate_fees(
    max_loan_amount: Money,
    origination_fee_rate: Percent,
    schedule: &FeeSchedule,
) -> FeeOutput {
    FeeOutput {
        origination_fee: pct_of(max_loan_amount, origination_fee_rate),
        processing_fee: schedule.processing_fee,
        application_fee: schedule.application_fee,
        doc_prep_fee: schedule.doc_prep_fee,
        fixed_fees_total: schedule.fixed_total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BridgeLoanError;
    use rust_decimal::Decimal;

    #[test]
    fn test_origination_fee() {
        let out = calculate_fees(dec!(58_804.20), dec!(2.0), &FeeSchedule::default());
        assert_eq!(out.origination_fee, dec!(1_176.084));
        assert_eq!(out.fixed_fees_total, dec!(2_594));
    }

    #[test]
    fn test_custom_schedule_passes_through() {
        let schedule = FeeSchedule {
            processing_fee: dec!(995),
            application_fee: Decimal::ZERO,
            doc_prep_fee: dec!(450),
        };
        let out = calculate_fees(dec!(100_000), dec!(1.5), &schedule);
        assert_eq!(out.origination_fee, dec!(1_500));
        assert_eq!(out.processing_fee, dec!(995));
        assert_eq!(out.application_fee, Decimal::ZERO);
        assert_eq!(out.doc_prep_fee, dec!(450));
    }

    #[test]
    fn test_partial_schedule_uses_defaults() {
        let schedule: FeeSchedule =
            serde_json::from_value(serde_json::json!({ "docPrepFee": "750" })).unwrap();
        assert_eq!(schedule.processing_fee, DEFAULT_PROCESSING_FEE);
        assert_eq!(schedule.application_fee, DEFAULT_APPLICATION_FEE);
        assert_eq!(schedule.doc_prep_fee, dec!(750));
    }

    #[test]
    fn test_oversized_fee_rejected() {
        let schedule = FeeSchedule {
            processing_fee: Decimal::MAX,
            ..FeeSchedule::default()
        };
        match schedule.validate().unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "processing_fee"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_fee_rejected() {
        let schedule = FeeSchedule {
            application_fee: dec!(-1),
            ..FeeSchedule::default()
        };
        match schedule.validate().unwrap_err() {
            BridgeLoanError::InvalidInput { field, .. } => assert_eq!(field, "application_fee"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
