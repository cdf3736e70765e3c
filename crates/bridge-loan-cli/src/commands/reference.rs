use clap::Args;
use serde_json::Value;

use bridge_loan_core::bridge::reference;

use crate::input;

/// Arguments for the term sheet reference check
#[derive(Args)]
pub struct ReferenceCheckArgs {
    /// Path to a YAML or JSON fee schedule (defaults to the standard schedule)
    #[arg(long)]
    pub fees: Option<String>,
}

pub fn run_reference_check(args: ReferenceCheckArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fees = input::file::fee_schedule_or_default(args.fees.as_deref())?;
    let result = reference::run_reference_check(&fees)?;
    Ok(serde_json::to_value(result)?)
}

/// True when a serialized reference check reports drifted figures.
pub fn failed(value: &Value) -> bool {
    value.pointer("/result/passed") == Some(&Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schedule_passes() {
        let value = run_reference_check(ReferenceCheckArgs { fees: None }).unwrap();
        assert!(!failed(&value));
    }

    #[test]
    fn test_failed_reads_envelope() {
        let value = serde_json::json!({ "result": { "passed": false } });
        assert!(failed(&value));
        assert!(!failed(&serde_json::json!({})));
    }
}
