//! Shape validation for dynamically-typed call arguments.
//!
//! Every helper returns the call-specific diagnostic for the first violated
//! requirement. Validation never touches the writer backend; the dispatch
//! layer routes the diagnostic into the last-error channel.

use serde_json::Value;

use crate::model::{NameElement, NameHierarchy, SourceRange};

pub(crate) type MarshalResult<T> = std::result::Result<T, String>;

fn arg<'a>(args: &'a [Value], index: usize, call: &str, what: &str) -> MarshalResult<&'a Value> {
    args.get(index)
        .ok_or_else(|| format!("{call}: missing required argument {} ({what})", index + 1))
}

pub(crate) fn string_arg(
    args: &[Value],
    index: usize,
    call: &str,
    what: &str,
) -> MarshalResult<String> {
    let value = arg(args, index, call, what)?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| format!("{call}: argument {} ({what}) must be a string", index + 1))
}

/// Accepts any JSON number and truncates it to an integer. Range checking is
/// the backend's business, not the adapter's.
pub(crate) fn int_arg(args: &[Value], index: usize, call: &str, what: &str) -> MarshalResult<i64> {
    let value = arg(args, index, call, what)?;
    as_int(value).ok_or_else(|| format!("{call}: argument {} ({what}) must be a number", index + 1))
}

pub(crate) fn bool_arg(args: &[Value], index: usize, call: &str, what: &str) -> MarshalResult<bool> {
    let value = arg(args, index, call, what)?;
    value
        .as_bool()
        .ok_or_else(|| format!("{call}: argument {} ({what}) must be a boolean", index + 1))
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn field_string(object: &Value, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Validates a name hierarchy top to bottom: the delimiter must be a string,
/// the elements an array, and each element's `prefix`/`name`/`postfix` a
/// string read from that element. The first invalid element aborts the call.
pub(crate) fn name_hierarchy_arg(
    args: &[Value],
    index: usize,
    call: &str,
) -> MarshalResult<NameHierarchy> {
    let value = arg(args, index, call, "nameHierarchy")?;
    if !value.is_object() {
        return Err(format!(
            "{call}: argument {} (nameHierarchy) must be an object",
            index + 1
        ));
    }
    let name_delimiter = field_string(value, "nameDelimiter")
        .ok_or_else(|| format!("{call}: nameDelimiter must be a string"))?;
    let elements = value
        .get("nameElements")
        .and_then(Value::as_array)
        .ok_or_else(|| format!("{call}: nameElements must be an array"))?;

    let mut name_elements = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        if !element.is_object() {
            return Err(format!("{call}: nameElements[{i}] must be an object"));
        }
        let prefix = field_string(element, "prefix")
            .ok_or_else(|| format!("{call}: nameElements[{i}].prefix must be a string"))?;
        let name = field_string(element, "name")
            .ok_or_else(|| format!("{call}: nameElements[{i}].name must be a string"))?;
        let postfix = field_string(element, "postfix")
            .ok_or_else(|| format!("{call}: nameElements[{i}].postfix must be a string"))?;
        name_elements.push(NameElement {
            prefix,
            name,
            postfix,
        });
    }
    Ok(NameHierarchy::new(name_delimiter, name_elements))
}

/// Validates the five numeric fields of a source range, in declaration order.
/// No partial range is ever produced.
pub(crate) fn source_range_arg(
    args: &[Value],
    index: usize,
    call: &str,
) -> MarshalResult<SourceRange> {
    let value = arg(args, index, call, "sourceRange")?;
    if !value.is_object() {
        return Err(format!(
            "{call}: argument {} (sourceRange) must be an object",
            index + 1
        ));
    }
    let field = |name: &str| -> MarshalResult<i64> {
        value
            .get(name)
            .and_then(as_int)
            .ok_or_else(|| format!("{call}: source range field {name} must be a number"))
    };
    let file_id = field("fileId")?;
    let start_line = field("startLine")?;
    let start_column = field("startColumn")?;
    let end_line = field("endLine")?;
    let end_column = field("endColumn")?;
    Ok(SourceRange::new(
        file_id,
        start_line as i32,
        start_column as i32,
        end_line as i32,
        end_column as i32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_argument_names_position_and_shape() {
        let err = string_arg(&[], 0, "open", "databaseFilePath").unwrap_err();
        assert_eq!(err, "open: missing required argument 1 (databaseFilePath)");
    }

    #[test]
    fn wrong_kind_argument_is_rejected() {
        let err = string_arg(&[json!(5)], 0, "open", "databaseFilePath").unwrap_err();
        assert_eq!(err, "open: argument 1 (databaseFilePath) must be a string");
    }

    #[test]
    fn numbers_coerce_without_range_checks() {
        assert_eq!(int_arg(&[json!(7)], 0, "c", "id").unwrap(), 7);
        assert_eq!(int_arg(&[json!(7.9)], 0, "c", "id").unwrap(), 7);
        assert_eq!(int_arg(&[json!(-3.2)], 0, "c", "id").unwrap(), -3);
        assert!(int_arg(&[json!("7")], 0, "c", "id").is_err());
    }

    #[test]
    fn name_hierarchy_requires_string_delimiter() {
        let err = name_hierarchy_arg(
            &[json!({"nameDelimiter": 4, "nameElements": []})],
            0,
            "recordSymbol",
        )
        .unwrap_err();
        assert_eq!(err, "recordSymbol: nameDelimiter must be a string");
    }

    #[test]
    fn name_hierarchy_validates_each_element_in_order() {
        let err = name_hierarchy_arg(
            &[json!({
                "nameDelimiter": "::",
                "nameElements": [
                    {"prefix": "", "name": "ok", "postfix": ""},
                    {"prefix": "", "name": 3, "postfix": ""},
                ],
            })],
            0,
            "recordSymbol",
        )
        .unwrap_err();
        assert_eq!(err, "recordSymbol: nameElements[1].name must be a string");
    }

    #[test]
    fn name_hierarchy_preserves_element_order() {
        let hierarchy = name_hierarchy_arg(
            &[json!({
                "nameDelimiter": ".",
                "nameElements": [
                    {"prefix": "", "name": "outer", "postfix": ""},
                    {"prefix": "", "name": "inner", "postfix": "()"},
                ],
            })],
            0,
            "recordSymbol",
        )
        .unwrap();
        assert_eq!(hierarchy.name_delimiter, ".");
        assert_eq!(hierarchy.name_elements[0].name, "outer");
        assert_eq!(hierarchy.name_elements[1].name, "inner");
        assert_eq!(hierarchy.name_elements[1].postfix, "()");
    }

    #[test]
    fn source_range_requires_all_five_numeric_fields() {
        let err = source_range_arg(
            &[json!({
                "fileId": 1,
                "startLine": 2,
                "startColumn": "x",
                "endLine": 4,
                "endColumn": 5,
            })],
            0,
            "recordSymbolLocation",
        )
        .unwrap_err();
        assert_eq!(
            err,
            "recordSymbolLocation: source range field startColumn must be a number"
        );
    }

    #[test]
    fn missing_source_range_argument_names_its_position() {
        let err = source_range_arg(&[json!(1)], 1, "recordSymbolLocation").unwrap_err();
        assert_eq!(
            err,
            "recordSymbolLocation: missing required argument 2 (sourceRange)"
        );
    }

    #[test]
    fn source_range_marshals_in_field_order() {
        let range = source_range_arg(
            &[json!({
                "fileId": 1,
                "startLine": 2,
                "startColumn": 3,
                "endLine": 4,
                "endColumn": 5,
            })],
            0,
            "recordSymbolLocation",
        )
        .unwrap();
        assert_eq!(range, SourceRange::new(1, 2, 3, 4, 5));
    }
}
