use crate::fetch::RESPONSE_FIELD;
use serde_json::Value;
use std::io::Write;

/// Lists are cut down to this many entries when shown
pub const PREVIEW_LIMIT: usize = 5;

/// Picks what gets shown: the first entries of `response` if that is a list, else the first
/// entries of the value if it is a list itself, else the whole value.
pub fn preview(json: &Value) -> Value {
    match json {
        Value::Object(map) => match map.get(RESPONSE_FIELD) {
            Some(Value::Array(items)) => first_entries(items),
            _ => json.clone(),
        },
        Value::Array(items) => first_entries(items),
        other => other.clone(),
    }
}

fn first_entries(items: &[Value]) -> Value {
    Value::Array(items.iter().take(PREVIEW_LIMIT).cloned().collect())
}

/// Two space indented JSON of [preview]
pub fn render(json: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&preview(json))
}

pub fn write_json<W: Write>(writer: &mut W, json: &Value) -> std::io::Result<()> {
    let rendered = render(json)?;
    writeln!(writer, "{}", rendered)
}

pub fn print_json(json: &Value) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write_json(&mut handle, json) {
        log::warn!("Failed to print json: {}", e);
    }
}
