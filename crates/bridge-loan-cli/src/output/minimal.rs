use serde_json::Value;

use super::{display_scalar, result_of};

/// Figures printed by `--output minimal`, in priority order.
const PRIORITY_KEYS: [&str; 4] = [
    "required_proof_of_capital",
    "passed",
    "base_case_value",
    "max_loan_amount",
];

/// Print just the headline figure from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return display_scalar(val);
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, display_scalar(val));
        }
    }

    display_scalar(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proof_of_capital_first() {
        let v = json!({ "result": {
            "max_loan_amount": "58804.2",
            "required_proof_of_capital": "19533.3388000000000000000000",
        }});
        assert_eq!(headline(&v), "19533.3388");
    }

    #[test]
    fn test_reference_check_prints_pass_flag() {
        let v = json!({ "result": { "failures": 0, "passed": true } });
        assert_eq!(headline(&v), "true");
    }
}
