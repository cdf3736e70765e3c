use napi::Result as NapiResult;
use napi_derive::napi;

use bridge_loan_core::bridge::fees::FeeSchedule;
use bridge_loan_core::bridge::scenario::LoanScenario;
use bridge_loan_core::bridge::sensitivity::{self, LoanSensitivityInput};
use bridge_loan_core::bridge::{economics, reference};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan economics
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_loan_economics(input_json: String) -> NapiResult<String> {
    let input: LoanScenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = economics::compute_loan_economics(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_loan_economics_with_fees(
    input_json: String,
    fees_json: String,
) -> NapiResult<String> {
    let input: LoanScenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let fees: FeeSchedule = serde_json::from_str(&fees_json).map_err(to_napi_error)?;
    let output =
        economics::compute_loan_economics_with_fees(&input, &fees).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference check
// ---------------------------------------------------------------------------

#[napi]
pub fn reference_check() -> NapiResult<String> {
    let output = reference::run_reference_check(&FeeSchedule::default()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_sensitivity(input_json: String) -> NapiResult<String> {
    let input: LoanSensitivityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sensitivity::run_loan_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
