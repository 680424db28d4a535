use hbnb_types::{FieldSpec, FieldType, Value};

use crate::config::CoercionMode;
use crate::parse::{split_top_level, strip_quotes, unquote, UsageError};

/// Turn the raw `update` value token into a field value.
///
/// `spec` is the target field's declaration, if the record's kind declares
/// one. It is only consulted in [`CoercionMode::Schema`].
pub fn coerce(
    raw: &str,
    mode: CoercionMode,
    field: &str,
    spec: Option<&FieldSpec>,
) -> Result<Value, UsageError> {
    match (mode, spec) {
        (CoercionMode::Schema, Some(spec)) => by_schema(raw, spec.ty)
            .ok_or_else(|| UsageError::InvalidValue {
                field: field.to_string(),
            }),
        _ => Ok(syntactic(raw)),
    }
}

/// Quoted text is a string and `[a, b]` is a list of syntactically coerced
/// items; otherwise text containing `.` is a float and anything else an
/// integer. Text that fails to parse as what it looks like is kept as a
/// string.
pub fn syntactic(raw: &str) -> Value {
    if let Some(text) = unquote(raw) {
        return Value::Str(text.to_string());
    }
    if let Some(items) = parse_list(raw) {
        return Value::List(items);
    }
    let parsed = if raw.contains('.') {
        parse_float(raw).map(Value::Float)
    } else {
        raw.parse::<i64>().ok().map(Value::Int)
    };
    parsed.unwrap_or_else(|| Value::Str(raw.to_string()))
}

fn by_schema(raw: &str, ty: FieldType) -> Option<Value> {
    let text = strip_quotes(raw);
    match ty {
        FieldType::Str => Some(Value::Str(text.to_string())),
        FieldType::Int => text.parse::<i64>().ok().map(Value::Int),
        FieldType::Float => parse_float(text).map(Value::Float),
        FieldType::List => parse_list(raw).map(Value::List),
    }
}

/// Finite floats only; `inf` and `NaN` have no JSON form.
fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// `[a, "b", 3]` with items coerced syntactically.
fn parse_list(raw: &str) -> Option<Vec<Value>> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    Some(split_top_level(inner, ',').into_iter().map(syntactic).collect())
}
