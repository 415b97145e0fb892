use serde_json::Value;

/// Fields answering the question a command was asked, most specific first.
const PRIORITY_KEYS: [&str; 8] = [
    "monthlyIncomeEquivalent",
    "futureValueOfContributions",
    "totalBalance",
    "total",
    "difference",
    "path",
    "id",
    "version",
];

/// Print just the key answer from the output.
///
/// A plan analysis prints the monthly gap per market condition. Anything else
/// prints the first priority field present, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", format_minimal(result_obj));
        return;
    };

    if let Some(Value::Array(readiness)) = map.get("readiness") {
        for row in readiness {
            println!(
                "{}: {}",
                row.get("condition").map(format_minimal).unwrap_or_default(),
                row.get("monthlyGap").map(format_minimal).unwrap_or_default()
            );
        }
        return;
    }

    if let Some(val) = PRIORITY_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
    {
        println!("{}", format_minimal(val));
        return;
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, format_minimal(val));
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
