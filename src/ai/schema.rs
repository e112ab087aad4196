// SPDX-License-Identifier: MIT
//! Declarative boundary schemas.
//!
//! A [`Schema`] names the fields an object must carry at a boundary and
//! the constraints on each: text non-empty / length cap, integer range,
//! float range, string-list item bounds. `validate` reports every
//! violation in one pass. Flow inputs and flow outputs both go through
//! this — it is the only guarantee the AI layer makes about shapes.

use serde_json::Value;

#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A string. `non_empty` rejects whitespace-only values.
    Text { non_empty: bool, max_len: usize },
    /// A JSON integer (floats are rejected, even with a zero fraction).
    Integer { min: i64, max: i64 },
    /// A JSON number, inclusive range.
    Float { min: f64, max: f64 },
    /// A list of non-empty strings with item-count bounds.
    TextList { min_items: usize, max_items: usize },
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    /// Required non-empty text, generous length cap.
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                non_empty: true,
                max_len: 4000,
            },
            required: true,
        }
    }

    pub fn integer(name: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: FieldKind::Integer { min, max },
            required: true,
        }
    }

    pub fn float(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            kind: FieldKind::Float { min, max },
            required: true,
        }
    }

    pub fn text_list(name: &'static str, min_items: usize, max_items: usize) -> Self {
        Self {
            name,
            kind: FieldKind::TextList {
                min_items,
                max_items,
            },
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A declared object shape: named fields plus constraints. Unknown keys
/// are always violations — "conforms exactly" means no extras.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check `value` against this schema. `Ok(())` or every violation.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();

        let Some(obj) = value.as_object() else {
            return Err(vec![format!("{} payload must be a JSON object", self.name)]);
        };

        for key in obj.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                violations.push(format!("unknown field `{key}`"));
            }
        }

        for field in &self.fields {
            match obj.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        violations.push(format!("`{}` is required", field.name));
                    }
                }
                Some(v) => self.check_field(field, v, &mut violations),
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn check_field(&self, field: &FieldSpec, value: &Value, violations: &mut Vec<String>) {
        let name = field.name;
        match &field.kind {
            FieldKind::Text { non_empty, max_len } => match value.as_str() {
                None => violations.push(format!("`{name}` must be a string")),
                Some(s) => {
                    if *non_empty && s.trim().is_empty() {
                        violations.push(format!("`{name}` must be non-empty"));
                    }
                    if s.chars().count() > *max_len {
                        violations.push(format!("`{name}` exceeds {max_len} characters"));
                    }
                }
            },
            FieldKind::Integer { min, max } => match value.as_i64() {
                None => violations.push(format!("`{name}` must be an integer")),
                Some(n) if n < *min || n > *max => {
                    violations.push(format!("`{name}` must be between {min} and {max}"));
                }
                Some(_) => {}
            },
            FieldKind::Float { min, max } => match value.as_f64() {
                None => violations.push(format!("`{name}` must be a number")),
                Some(f) if f < *min || f > *max => {
                    violations.push(format!("`{name}` must be between {min} and {max}"));
                }
                Some(_) => {}
            },
            FieldKind::TextList {
                min_items,
                max_items,
            } => match value.as_array() {
                None => violations.push(format!("`{name}` must be a list of strings")),
                Some(items) => {
                    if items.len() < *min_items || items.len() > *max_items {
                        violations.push(format!(
                            "`{name}` must have between {min_items} and {max_items} items, got {}",
                            items.len()
                        ));
                    }
                    for (i, item) in items.iter().enumerate() {
                        match item.as_str() {
                            None => violations.push(format!("`{name}[{i}]` must be a string")),
                            Some(s) if s.trim().is_empty() => {
                                violations.push(format!("`{name}[{i}]` must be non-empty"));
                            }
                            Some(_) => {}
                        }
                    }
                }
            },
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn risk_output() -> Schema {
        Schema::new(
            "riskOutput",
            vec![
                FieldSpec::integer("riskScore", 0, 100),
                FieldSpec::text("riskFactors"),
            ],
        )
    }

    #[test]
    fn conforming_object_passes() {
        let v = json!({"riskScore": 72, "riskFactors": "New client in a volatile market."});
        assert!(risk_output().validate(&v).is_ok());
    }

    #[test]
    fn non_object_is_rejected_outright() {
        let err = risk_output().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].contains("JSON object"));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = risk_output().validate(&json!({"riskScore": 10})).unwrap_err();
        assert!(err.iter().any(|v| v.contains("riskFactors")), "{err:?}");
    }

    #[test]
    fn null_counts_as_missing() {
        let v = json!({"riskScore": 10, "riskFactors": null});
        assert!(risk_output().validate(&v).is_err());
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        let v = json!({"riskScore": 101, "riskFactors": "x"});
        let err = risk_output().validate(&v).unwrap_err();
        assert!(err[0].contains("between 0 and 100"), "{err:?}");
    }

    #[test]
    fn float_is_not_an_integer() {
        let v = json!({"riskScore": 85.0, "riskFactors": "x"});
        assert!(risk_output().validate(&v).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let v = json!({"riskScore": 10, "riskFactors": "x", "comment": "extra"});
        let err = risk_output().validate(&v).unwrap_err();
        assert!(err.iter().any(|e| e.contains("unknown field `comment`")), "{err:?}");
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        let v = json!({"riskScore": 10, "riskFactors": "   "});
        assert!(risk_output().validate(&v).is_err());
    }

    #[test]
    fn every_violation_is_collected() {
        let v = json!({"riskScore": -5, "riskFactors": "", "extra": 1});
        let err = risk_output().validate(&v).unwrap_err();
        assert_eq!(err.len(), 3, "{err:?}");
    }

    #[test]
    fn text_list_bounds_and_item_types() {
        let schema = Schema::new(
            "insight",
            vec![FieldSpec::text_list("recommendations", 2, 4)],
        );
        assert!(schema
            .validate(&json!({"recommendations": ["a", "b", "c"]}))
            .is_ok());
        assert!(schema.validate(&json!({"recommendations": ["a"]})).is_err());
        assert!(schema
            .validate(&json!({"recommendations": ["a", "b", "c", "d", "e"]}))
            .is_err());
        assert!(schema
            .validate(&json!({"recommendations": ["a", 2]}))
            .is_err());
        assert!(schema
            .validate(&json!({"recommendations": ["a", "  "]}))
            .is_err());
    }

    #[test]
    fn optional_field_may_be_absent_but_not_wrong() {
        let schema = Schema::new(
            "insight",
            vec![FieldSpec::float("confidence", 0.0, 1.0).optional()],
        );
        assert!(schema.validate(&json!({})).is_ok());
        assert!(schema.validate(&json!({"confidence": 0.8})).is_ok());
        // Integers are acceptable where a number is expected.
        assert!(schema.validate(&json!({"confidence": 1})).is_ok());
        assert!(schema.validate(&json!({"confidence": 1.5})).is_err());
        assert!(schema.validate(&json!({"confidence": "high"})).is_err());
    }
}
