use serde_json::{Map, Value};
use std::io;

use super::{display_scalar, result_of};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Sensitivity results are written as a grid, reference checks as one row per
/// compared field, everything else as two-column field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(map) => {
            if let Some(Value::Array(matrix)) = map.get("matrix") {
                write_matrix(&mut wtr, map, matrix);
            } else if let Some(Value::Array(fields)) = map.get("fields") {
                write_rows(&mut wtr, fields);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &raw_scalar(val)]);
                }
            }
        }
        other => {
            let _ = wtr.write_record([&raw_scalar(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(raw_scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}

fn write_matrix(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>, matrix: &[Value]) {
    let empty = Vec::new();
    let v1_values = map
        .get("variable_1_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let v2_values = map
        .get("variable_2_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut header = vec![map.get("variable_1_name").map(raw_scalar).unwrap_or_default()];
    if v2_values.is_empty() {
        header.push(map.get("output_metric").map(raw_scalar).unwrap_or_default());
    } else {
        header.extend(v2_values.iter().map(raw_scalar));
    }
    let _ = wtr.write_record(&header);

    for (row_value, row) in v1_values.iter().zip(matrix) {
        let mut record = vec![raw_scalar(row_value)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(raw_scalar));
        }
        let _ = wtr.write_record(&record);
    }
}

/// CSV keeps full precision; nested values are embedded as JSON.
fn raw_scalar(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => display_scalar(other),
    }
}
