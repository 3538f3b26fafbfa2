use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};

pub const REQUIRED: &str = "This field is required.";

/// Reads typed fields out of a JSON object body, collecting one error per field.
///
/// In partial mode absent fields are skipped instead of reported.
pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    partial: bool,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(body: &'a Value, partial: bool) -> Result<Self, ApiError> {
        let object = body
            .as_object()
            .ok_or_else(|| ApiError::invalid_json("Expected a JSON object"))?;
        Ok(Self {
            object,
            partial,
            errors: FieldErrors::new(),
        })
    }

    fn present(&mut self, name: &str) -> Option<&'a Value> {
        let object = self.object;
        match object.get(name) {
            None => {
                if !self.partial {
                    self.error(name, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.error(name, "This field may not be null.");
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Trimmed, non-blank string of at most `max_length` characters.
    pub fn string(&mut self, name: &str, max_length: usize) -> Option<String> {
        let value = self.present(name)?;
        let Some(raw) = value.as_str() else {
            self.error(name, "Not a valid string.");
            return None;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.error(name, "This field may not be blank.");
            return None;
        }
        if trimmed.chars().count() > max_length {
            self.error(name, format!("Ensure this field has no more than {} characters.", max_length));
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Integer given as a JSON number or a numeric string.
    pub fn integer(&mut self, name: &str) -> Option<i32> {
        let value = self.present(name)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.error(name, "A valid integer is required.");
        }
        parsed
    }

    /// Primary-key reference given as a JSON number or a numeric string.
    pub fn pk(&mut self, name: &str) -> Option<i64> {
        let value = self.present(name)?;
        let parsed = pk_value(value);
        if parsed.is_none() {
            self.error(name, format!("Incorrect type. Expected pk value, received {}.", type_name(value)));
        }
        parsed
    }

    /// JSON array of primary-key references.
    pub fn pk_list(&mut self, name: &str) -> Option<Vec<i64>> {
        let value = self.present(name)?;
        let Some(items) = value.as_array() else {
            self.error(name, format!("Expected a list of items but got type \"{}\".", type_name(value)));
            return None;
        };
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            match pk_value(item) {
                Some(id) => ids.push(id),
                None => {
                    self.error(name, format!("Incorrect type. Expected pk value, received {}.", type_name(item)));
                    return None;
                }
            }
        }
        Some(ids)
    }

    pub fn error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.entry(name.to_string()).or_insert_with(|| message.into());
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid input", Some(self.errors)))
        }
    }
}

fn pk_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(err: ApiError) -> FieldErrors {
        match err {
            ApiError::ValidationError { field_errors: Some(errors), .. } => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn reports_missing_and_null_fields() {
        let body = json!({"name": null});
        let mut reader = FieldReader::new(&body, false).unwrap();
        assert!(reader.string("name", 10).is_none());
        assert!(reader.string("title", 10).is_none());
        let errors = field_errors(reader.finish().unwrap_err());
        assert_eq!(errors["name"], "This field may not be null.");
        assert_eq!(errors["title"], REQUIRED);
    }

    #[test]
    fn partial_mode_skips_absent_fields() {
        let body = json!({});
        let mut reader = FieldReader::new(&body, true).unwrap();
        assert!(reader.integer("publication_year").is_none());
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn trims_and_bounds_strings() {
        let body = json!({"a": "  ok  ", "b": "   ", "c": "toolong"});
        let mut reader = FieldReader::new(&body, false).unwrap();
        assert_eq!(reader.string("a", 5).as_deref(), Some("ok"));
        assert!(reader.string("b", 5).is_none());
        assert!(reader.string("c", 5).is_none());
        let errors = field_errors(reader.finish().unwrap_err());
        assert_eq!(errors["b"], "This field may not be blank.");
        assert_eq!(errors["c"], "Ensure this field has no more than 5 characters.");
    }

    #[test]
    fn accepts_numeric_strings() {
        let body = json!({"year": "2001", "author": "3", "bad": true});
        let mut reader = FieldReader::new(&body, false).unwrap();
        assert_eq!(reader.integer("year"), Some(2001));
        assert_eq!(reader.pk("author"), Some(3));
        assert_eq!(reader.pk("bad"), None);
        let errors = field_errors(reader.finish().unwrap_err());
        assert_eq!(errors["bad"], "Incorrect type. Expected pk value, received bool.");
    }

    #[test]
    fn reads_pk_lists() {
        let body = json!({"books": [1, "2"], "bad": [1, true], "scalar": 3});
        let mut reader = FieldReader::new(&body, false).unwrap();
        assert_eq!(reader.pk_list("books"), Some(vec![1, 2]));
        assert!(reader.pk_list("bad").is_none());
        assert!(reader.pk_list("scalar").is_none());
        let errors = field_errors(reader.finish().unwrap_err());
        assert_eq!(errors["bad"], "Incorrect type. Expected pk value, received bool.");
        assert_eq!(errors["scalar"], "Expected a list of items but got type \"number\".");
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert!(matches!(FieldReader::new(&json!([1, 2]), false), Err(ApiError::InvalidJson(_))));
    }
}
