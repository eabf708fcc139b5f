//! `read` prompts and input line parsing

use crate::types::Type;
use crate::value::{ArrayValue, RuntimeValue};

/// Prompt printed before reading a value of type `ty`
pub(super) fn prompt(ty: Type) -> String {
    match ty {
        Type::Bool => "introduce 1 bool value".to_string(),
        Type::Array { .. } => {
            format!("introduce {} int values", ty.array_size().unwrap_or(1))
        }
        Type::Int | Type::Text => "introduce 1 int value".to_string(),
    }
}

/// Parse one input line for a target of type `ty`
///
/// Accepts exactly one integer, exactly one of `true`/`false`, or exactly
/// as many comma-separated integers as the array has slots. Whitespace
/// around values is ignored. `None` when the line does not fit.
pub(super) fn parse_line(line: &str, ty: Type) -> Option<RuntimeValue> {
    let line = line.trim();
    match ty {
        Type::Int => parse_int(line).map(RuntimeValue::Int),
        Type::Bool => match line {
            "true" => Some(RuntimeValue::Bool(true)),
            "false" => Some(RuntimeValue::Bool(false)),
            _ => None,
        },
        Type::Array { lower, upper } => {
            let values = line
                .split(',')
                .map(|item| parse_int(item.trim()))
                .collect::<Option<Vec<_>>>()?;
            ArrayValue::new(lower, upper, values)
                .ok()
                .map(RuntimeValue::Array)
        }
        Type::Text => None,
    }
}

/// `-?[0-9]+` that fits in 64 bits
fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
