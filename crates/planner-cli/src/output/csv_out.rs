use serde_json::{Map, Value};
use std::io;

/// Arrays written as the CSV body when a result carries several, in order.
const SERIES_KEYS: [&str; 4] = ["projection", "rows", "readiness", "cashFlow"];

/// Write output as CSV to stdout.
///
/// Arrays of objects become one row per element. An object result is written
/// as its main series when it has one, otherwise as field/value pairs with
/// nested objects flattened to `parent.child`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = match value {
        Value::Object(map) => map.get("result").unwrap_or(value),
        _ => value,
    };

    match body {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => match SERIES_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_array))
        {
            Some(series) => write_rows(&mut wtr, series),
            None => write_fields(&mut wtr, map),
        },
        other => {
            let _ = wtr.write_record([format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (sub, v) in inner {
                    let _ = wtr.write_record([format!("{key}.{sub}"), format_csv_value(v)]);
                }
            }
            _ => {
                let _ = wtr.write_record([key.clone(), format_csv_value(val)]);
            }
        }
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
