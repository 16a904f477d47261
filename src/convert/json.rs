//! JSON-shaped cells: lists and nested structures

use serde_json::Value as Json;

use crate::error::ConvertError;
use crate::model::{Scalar, TypeTag, Value};

use super::to_number;

/// Convert decoded JSON, re-reading every number through `to_number`.
///
/// JSON decoders hand back `1.0` and `1` alike as doubles; going back
/// through the decimal text keeps integers as integers and short floats
/// narrow.
pub fn from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => {
                let f = n.as_f64().unwrap_or_default();
                to_number(&f.to_string()).unwrap_or(Value::Float64(f))
            }
        },
        Json::String(s) => Value::Str(s),
        Json::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        Json::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
    }
}

/// Parse text holding a JSON object or array
pub fn parse_structured(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Json>(raw) {
        Ok(json @ (Json::Object(_) | Json::Array(_))) => Some(from_json(json)),
        _ => None,
    }
}

/// `list,<scalar>`: a flat JSON array
pub(super) fn parse_list(tag: TypeTag, scalar: Scalar, raw: &str) -> Result<Value, ConvertError> {
    let items = parse_array(tag, raw)?;
    convert_elements(tag, scalar, raw, items)
}

/// `list,<list,<scalar>>`: an array of arrays
pub(super) fn parse_nested_list(
    tag: TypeTag,
    scalar: Scalar,
    raw: &str,
) -> Result<Value, ConvertError> {
    let rows = parse_array(tag, raw)?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match row {
            Json::Array(items) => out.push(convert_elements(tag, scalar, raw, items)?),
            other => {
                return Err(invalid(tag, raw, format!("expected an array, found {}", other)));
            }
        }
    }
    Ok(Value::List(out))
}

fn parse_array(tag: TypeTag, raw: &str) -> Result<Vec<Json>, ConvertError> {
    match serde_json::from_str::<Json>(raw) {
        Ok(Json::Array(items)) => Ok(items),
        Ok(other) => Err(invalid(tag, raw, format!("expected an array, found {}", other))),
        Err(e) => Err(invalid(tag, raw, e.to_string())),
    }
}

fn convert_elements(
    tag: TypeTag,
    scalar: Scalar,
    raw: &str,
    items: Vec<Json>,
) -> Result<Value, ConvertError> {
    items
        .into_iter()
        .map(|item| {
            if !scalar.accepts(&item) {
                return Err(invalid(tag, raw, format!("unexpected element {}", item)));
            }
            Ok(match (scalar, item) {
                (Scalar::Int, Json::Number(n)) => Value::Int(n.as_i64().unwrap_or_default()),
                (Scalar::Float, Json::Number(n)) => Value::Float64(n.as_f64().unwrap_or_default()),
                (_, item) => from_json(item),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn invalid(tag: TypeTag, raw: &str, reason: String) -> ConvertError {
    ConvertError::InvalidList {
        tag: tag.to_string(),
        value: raw.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_number_fixup() {
        let json: Json =
            serde_json::from_str("[1, 1.0, 0.1, 3.14159265, 1e21, null, false]").unwrap();
        assert_eq!(
            from_json(json),
            Value::List(vec![
                Value::Int(1),
                Value::Int(1),
                Value::Float32(0.1),
                Value::Float64(3.14159265),
                Value::Float64(1e21),
                Value::Nil,
                Value::Bool(false),
            ])
        );
    }

    #[test]
    fn test_parse_structured_only_objects_and_arrays() {
        assert!(parse_structured(r#"{"a": 1}"#).is_some());
        assert!(parse_structured("[]").is_some());
        assert!(parse_structured(r#""text""#).is_none());
        assert!(parse_structured("12").is_none());
        assert!(parse_structured("{oops").is_none());
    }

    #[test]
    fn test_nested_any_fixup() {
        let value = parse_nested_list(
            TypeTag::NestedList(Scalar::Any),
            Scalar::Any,
            r#"[[1, "a"], [{"x": 2.0}]]"#,
        )
        .unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::List(vec![Value::Int(1), Value::from("a")]),
                Value::List(vec![Value::Map([("x".to_string(), Value::Int(2))].into())]),
            ])
        );
    }

    #[test]
    fn test_invalid_list_message() {
        let err = parse_list(TypeTag::List(Scalar::Int), Scalar::Int, "[1, \"a\"]").unwrap_err();
        assert!(err.to_string().contains("list,int"));
    }
}
