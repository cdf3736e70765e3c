use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bridge_loan_core::bridge::scenario::LoanScenario;
use bridge_loan_core::bridge::sensitivity::{self, LoanSensitivityInput};
use bridge_loan_core::SensitivityVariable;

use crate::input;

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON file with the base case scenario
    #[arg(long)]
    pub input: String,

    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "max_leverage:60:75:5")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable (optional, creates a 2D table)
    #[arg(long)]
    pub var2: Option<String>,

    /// Loan economics figure to tabulate
    #[arg(long, default_value = "required_proof_of_capital")]
    pub metric: String,

    /// Path to a YAML or JSON fee schedule (defaults to the standard schedule)
    #[arg(long)]
    pub fees: Option<String>,
}

fn parse_sens_var(spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse::<Decimal>()?,
        max: parts[2].parse::<Decimal>()?,
        step: parts[3].parse::<Decimal>()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let base_scenario: LoanScenario = input::file::read_json(&args.input)?;
    let fee_schedule = match args.fees.as_deref() {
        Some(path) => Some(input::file::read_fee_schedule(path)?),
        None => None,
    };

    let request = LoanSensitivityInput {
        base_scenario,
        variable_1: parse_sens_var(&args.var1)?,
        variable_2: args.var2.as_deref().map(parse_sens_var).transpose()?,
        output_metric: args.metric,
        fee_schedule,
    };

    let result = sensitivity::run_loan_sensitivity(&request)?;
    Ok(serde_json::to_value(result)?)
}
