use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use super::economics::compute_loan_economics_with_fees;
use super::fees::FeeSchedule;
use super::scenario::LoanScenario;
use crate::types::*;
use crate::{BridgeLoanError, BridgeLoanResult};

/// Upper bound on evaluated cells per sweep.
const MAX_GRID_CELLS: usize = 10_000;

/// Input for a one- or two-way sweep over scenario fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSensitivityInput {
    pub base_scenario: LoanScenario,
    /// Scenario field to sweep along rows.
    pub variable_1: SensitivityVariable,
    /// Optional scenario field to sweep along columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SensitivityVariable>,
    /// `LoanEconomics` field to report, e.g. "required_proof_of_capital".
    pub output_metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_schedule: Option<FeeSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSensitivityOutput {
    pub variable_1_name: String,
    pub variable_2_name: Option<String>,
    pub variable_1_values: Vec<Decimal>,
    /// Empty for a one-way sweep.
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: String,
    /// matrix[i][j] = metric at variable_1_values[i], variable_2_values[j].
    /// One-way sweeps have a single column.
    pub matrix: Vec<Vec<Decimal>>,
    pub base_case_value: Decimal,
}

/// Sweep one or two scenario fields and tabulate an output metric.
///
/// Every cell is an independent run of the full pipeline.
pub fn run_loan_sensitivity(
    input: &LoanSensitivityInput,
) -> BridgeLoanResult<ComputationOutput<LoanSensitivityOutput>> {
    let start = Instant::now();
    let fees = input.fee_schedule.clone().unwrap_or_default();

    let base = compute_loan_economics_with_fees(&input.base_scenario, &fees)?;
    let base_case_value = base.result.metric(&input.output_metric).ok_or_else(|| {
        BridgeLoanError::invalid(
            "output_metric",
            format!("'{}' is not a loan economics figure.", input.output_metric),
        )
    })?;

    let base_json = serde_json::to_value(&input.base_scenario)?;
    let v1_values = generate_sweep_values(&input.variable_1, &base_json)?;
    let v2_values = match &input.variable_2 {
        Some(var) => generate_sweep_values(var, &base_json)?,
        None => Vec::new(),
    };

    let cells = v1_values.len() * v2_values.len().max(1);
    if cells > MAX_GRID_CELLS {
        return Err(BridgeLoanError::invalid(
            "variable_1",
            format!("Sweep produces {cells} cells, limit is {MAX_GRID_CELLS}."),
        ));
    }

    let eval = |v1: Decimal, v2: Option<Decimal>| -> BridgeLoanResult<Decimal> {
        let mut json = base_json.clone();
        set_scenario_field(&mut json, &input.variable_1.name, v1)?;
        if let (Some(var), Some(v)) = (&input.variable_2, v2) {
            set_scenario_field(&mut json, &var.name, v)?;
        }
        let scenario: LoanScenario = serde_json::from_value(json)?;
        let out = compute_loan_economics_with_fees(&scenario, &fees)?;
        // metric name already resolved against the base case
        Ok(out.result.metric(&input.output_metric).unwrap_or_default())
    };

    let mut matrix = Vec::with_capacity(v1_values.len());
    for &v1 in &v1_values {
        let row = if v2_values.is_empty() {
            vec![eval(v1, None)?]
        } else {
            v2_values
                .iter()
                .map(|&v2| eval(v1, Some(v2)))
                .collect::<BridgeLoanResult<Vec<_>>>()?
        };
        matrix.push(row);
    }

    let output = LoanSensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.as_ref().map(|v| v.name.clone()),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric.clone(),
        matrix,
        base_case_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        if input.variable_2.is_some() {
            "2-Way Bridge Loan Sensitivity"
        } else {
            "1-Way Bridge Loan Sensitivity"
        },
        &serde_json::json!({
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.as_ref().map(|v| &v.name),
            "output_metric": input.output_metric,
        }),
        base.warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Sweep values from min to max by step, always including max.
fn generate_sweep_values(
    var: &SensitivityVariable,
    base_json: &Value,
) -> BridgeLoanResult<Vec<Decimal>> {
    let field = var.name.as_str();
    let slot = base_json
        .get(&var.name)
        .ok_or_else(|| BridgeLoanError::invalid(field, "Not a scenario field."))?;
    if slot.is_boolean() {
        return Err(BridgeLoanError::invalid(field, "Boolean fields cannot be swept."));
    }
    if var.step <= Decimal::ZERO {
        return Err(BridgeLoanError::invalid(field, "Step must be positive"));
    }
    if var.min > var.max {
        return Err(BridgeLoanError::invalid(field, "Min must be <= max"));
    }
    if var.min < Decimal::ZERO {
        return Err(BridgeLoanError::invalid(field, "Scenario fields cannot be negative."));
    }
    let too_many = || BridgeLoanError::invalid(field, "Too many sweep points.");
    let span_steps = (var.max - var.min)
        .checked_div(var.step)
        .ok_or_else(too_many)?
        .floor();
    if span_steps >= Decimal::from(MAX_GRID_CELLS) {
        return Err(too_many());
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }
    Ok(values)
}

/// Overwrite one field of a serialized scenario. Integer fields (the term)
/// only accept whole values.
fn set_scenario_field(obj: &mut Value, field: &str, value: Decimal) -> BridgeLoanResult<()> {
    let Some(slot) = obj.get_mut(field) else {
        return Err(BridgeLoanError::invalid(field, "Not a scenario field."));
    };
    *slot = if slot.is_number() {
        let whole = value
            .fract()
            .is_zero()
            .then(|| value.to_u64())
            .flatten()
            .ok_or_else(|| {
                BridgeLoanError::invalid(field, format!("{value} is not a whole number."))
            })?;
        Value::from(whole)
    } else {
        Value::String(value.to_string())
    };
    Ok(())
}
