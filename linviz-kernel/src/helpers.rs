//! Helpers turning JSON arguments into kernel values

use linviz_core::{KernelError, Line, Plane, Primitive, SquareMatrix};
use nalgebra::Vector3;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Fetch a required field from the argument object
pub fn field<'a>(
    args: &'a JsonValue,
    op: &str,
    arg: &str,
) -> Result<&'a JsonValue, KernelError> {
    match args {
        JsonValue::Object(map) => map
            .get(arg)
            .ok_or_else(|| KernelError::missing_argument(op, arg)),
        _ => Err(KernelError::invalid_argument(op, "arguments", "expected an object")),
    }
}

/// Extract a finite f64 from a Value
pub fn extract_number(value: &JsonValue, op: &str, arg: &str) -> Result<f64, KernelError> {
    let n = value
        .as_f64()
        .ok_or_else(|| unexpected(op, arg, "a number", value))?;
    if !n.is_finite() {
        return Err(KernelError::non_finite(op, arg));
    }
    Ok(n)
}

/// Extract a list of numbers from a Value
pub fn extract_number_list(
    value: &JsonValue,
    op: &str,
    arg: &str,
) -> Result<Vec<f64>, KernelError> {
    let items = value
        .as_array()
        .ok_or_else(|| unexpected(op, arg, "a list", value))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            extract_number(item, op, arg).map_err(|e| match e {
                KernelError::InvalidArgument { .. } => {
                    let reason = format!("element {} must be a number", i);
                    KernelError::invalid_argument(op, arg, reason)
                }
                other => other,
            })
        })
        .collect()
}

/// Extract a 2×2 or 3×3 matrix given as nested rows
pub fn extract_matrix(
    value: &JsonValue,
    op: &str,
    arg: &str,
) -> Result<SquareMatrix, KernelError> {
    let rows = value
        .as_array()
        .ok_or_else(|| unexpected(op, arg, "nested rows", value))?;

    let data = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if !row.is_array() {
                let reason = format!("row {} must be a list", i);
                return Err(KernelError::invalid_argument(op, arg, reason));
            }
            extract_number_list(row, op, arg)
        })
        .collect::<Result<Vec<_>, _>>()?;

    SquareMatrix::from_rows(&data)
}

/// Extract a vector with 3 components, or 2 components embedded with `z = 0`
pub fn extract_vector3(
    value: &JsonValue,
    op: &str,
    arg: &str,
) -> Result<Vector3<f64>, KernelError> {
    match extract_number_list(value, op, arg)?.as_slice() {
        [x, y] => Ok(Vector3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        other => Err(KernelError::invalid_argument(
            op,
            arg,
            format!("expected 2 or 3 components, got {}", other.len()),
        )),
    }
}

/// Extract a line `{"point": [..], "direction": [..]}`
pub fn extract_line(value: &JsonValue, op: &str, arg: &str) -> Result<Line, KernelError> {
    if !value.is_object() {
        return Err(unexpected(op, arg, "a line object", value));
    }
    let point = extract_vector3(field(value, op, "point")?, op, arg)?;
    let direction = extract_vector3(field(value, op, "direction")?, op, arg)?;
    Line::new(point, direction)
}

/// Extract a plane `{"a": .., "b": .., "c": .., "d": ..}`
pub fn extract_plane(value: &JsonValue, op: &str, arg: &str) -> Result<Plane, KernelError> {
    if !value.is_object() {
        return Err(unexpected(op, arg, "a plane object", value));
    }
    let coefficient = |name: &str| extract_number(field(value, op, name)?, op, arg);
    Plane::new(coefficient("a")?, coefficient("b")?, coefficient("c")?, coefficient("d")?)
}

/// Extract `{"line": {..}}` or `{"plane": {..}}`
pub fn extract_primitive(
    value: &JsonValue,
    op: &str,
    arg: &str,
) -> Result<Primitive, KernelError> {
    if let Some(line) = value.get("line") {
        return extract_line(line, op, arg).map(Primitive::Line);
    }
    if let Some(plane) = value.get("plane") {
        return extract_plane(plane, op, arg).map(Primitive::Plane);
    }
    Err(KernelError::invalid_argument(op, arg, "expected {\"line\": ..} or {\"plane\": ..}"))
}

/// Serialize a kernel result
pub fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, KernelError> {
    serde_json::to_value(value).map_err(|e| KernelError::internal(e.to_string()))
}

fn unexpected(op: &str, arg: &str, expected: &str, value: &JsonValue) -> KernelError {
    let reason = format!("expected {}, got {}", expected, type_name(value));
    KernelError::invalid_argument(op, arg, reason)
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linviz_core::codes;
    use serde_json::json;

    #[test]
    fn test_extract_matrix() {
        let m = extract_matrix(&json!([[1, 2], [3, 4]]), "test", "m").unwrap();
        assert_eq!(m.dimension(), 2);
        assert_eq!(m.get(0, 1), Some(2.0));

        let m = extract_matrix(&json!([[1, 0, 0], [0, 1, 0], [0, 0, 1.5]]), "test", "m").unwrap();
        assert_eq!(m.get(2, 2), Some(1.5));
    }

    #[test]
    fn test_extract_matrix_errors() {
        let err = extract_matrix(&json!([[1, 2], [3]]), "test", "m").unwrap_err();
        assert_eq!(err.code(), codes::DIMENSION);

        let err = extract_matrix(&json!([[1, "x"], [3, 4]]), "test", "m").unwrap_err();
        assert_eq!(err.code(), codes::INVALID_ARGUMENT);
        assert!(err.to_string().contains("element 1"));

        let err = extract_matrix(&json!([1, 2]), "test", "m").unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_extract_vector3() {
        assert_eq!(extract_vector3(&json!([1, 2]), "t", "v").unwrap(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(extract_vector3(&json!([1, 2, 3]), "t", "v").unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(extract_vector3(&json!([1]), "t", "v").is_err());
        assert!(extract_vector3(&json!("nope"), "t", "v").is_err());
    }

    #[test]
    fn test_extract_line_and_plane() {
        let line = extract_line(&json!({"point": [0, 0, 0], "direction": [0, 0, 1]}), "t", "l").unwrap();
        assert_eq!(line.direction(), Vector3::z());

        let err = extract_line(&json!({"point": [0, 0, 0], "direction": [0, 0, 0]}), "t", "l").unwrap_err();
        assert_eq!(err, KernelError::DegenerateLine);

        let err = extract_line(&json!({"point": [0, 0, 0]}), "t", "l").unwrap_err();
        assert_eq!(err.code(), codes::ARG_COUNT);

        let plane = extract_plane(&json!({"a": 0, "b": 0, "c": 1, "d": 5}), "t", "p").unwrap();
        assert_eq!(plane.offset(), 5.0);
        assert_eq!(
            extract_plane(&json!({"a": 0, "b": 0, "c": 0, "d": 5}), "t", "p").unwrap_err(),
            KernelError::DegeneratePlane
        );
    }

    #[test]
    fn test_extract_primitive() {
        let p = extract_primitive(&json!({"plane": {"a": 1, "b": 0, "c": 0, "d": 0}}), "t", "x").unwrap();
        assert!(matches!(p, Primitive::Plane(_)));
        let p = extract_primitive(&json!({"line": {"point": [0, 0], "direction": [1, 0]}}), "t", "x").unwrap();
        assert!(matches!(p, Primitive::Line(_)));
        assert!(extract_primitive(&json!({"circle": {}}), "t", "x").is_err());
    }

    #[test]
    fn test_field_requires_object() {
        assert!(field(&json!([1, 2]), "t", "x").is_err());
        assert_eq!(field(&json!({"x": 1}), "t", "x").unwrap(), &json!(1));
    }
}
