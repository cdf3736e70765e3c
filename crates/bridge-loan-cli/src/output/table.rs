use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{display_scalar, result_of};

/// Format a computation envelope as tables using the tabled crate.
///
/// Scalars go into a Field/Value table; a reference check's `fields` list and
/// a sensitivity `matrix` get their own tables.
pub fn print_table(value: &Value) {
    let result = result_of(value);
    let Value::Object(map) = result else {
        println!("{}", display_scalar(result));
        return;
    };

    print_scalars(map);

    if let Some(Value::Array(fields)) = map.get("fields") {
        println!();
        print_rows(fields);
    }
    if let Some(Value::Array(discrepancies)) = map.get("known_discrepancies") {
        if !discrepancies.is_empty() {
            println!("\nKnown discrepancies:");
            print_rows(discrepancies);
        }
    }
    if let Some(Value::Array(matrix)) = map.get("matrix") {
        println!();
        print_matrix(map, matrix);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_scalars(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if val.is_array() || val.is_object() {
            continue;
        }
        builder.push_record([key.as_str(), &display_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(display_scalar).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

/// Rows are variable 1, columns variable 2 (or the metric for a 1-way sweep).
fn print_matrix(map: &Map<String, Value>, matrix: &[Value]) {
    let empty = Vec::new();
    let v1_values = map
        .get("variable_1_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let v2_values = map
        .get("variable_2_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let v1_name = map.get("variable_1_name").map(display_scalar).unwrap_or_default();
    let metric = map.get("output_metric").map(display_scalar).unwrap_or_default();

    let mut builder = Builder::default();
    let mut header = vec![v1_name];
    if v2_values.is_empty() {
        header.push(metric);
    } else {
        let v2_name = map.get("variable_2_name").map(display_scalar).unwrap_or_default();
        header.extend(v2_values.iter().map(|v| format!("{}={}", v2_name, display_scalar(v))));
    }
    builder.push_record(header);

    for (row_value, row) in v1_values.iter().zip(matrix) {
        let mut record = vec![display_scalar(row_value)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(display_scalar));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}
