use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::schema::{Constraint, FieldSpec, FieldType, ToolSchema};

/// An argument coerced to its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    List(Vec<String>),
}

impl ArgValue {
    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::String(v) => Value::String(v.clone()),
            ArgValue::Integer(v) => Value::from(*v),
            ArgValue::Boolean(v) => Value::Bool(*v),
            ArgValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Arguments that passed validation, in schema field order. Optional fields
/// the caller left out are absent; handlers apply their own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedArguments {
    values: Vec<(String, ArgValue)>,
}

impl ValidatedArguments {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ArgValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ArgValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(ArgValue::Boolean(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.get(name) {
            Some(ArgValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

/// Which validation step rejected the arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    UnknownField,
    MissingField,
    TypeMismatch,
    ConstraintViolation,
}

/// Rejection produced by [`validate`]. `hint` always names the offending
/// field(s) so an agent can repair the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} {hint}")]
pub struct ValidationFailure {
    pub reason: ValidationReason,
    pub message: String,
    pub hint: String,
    pub fields: Vec<String>,
}

impl ValidationFailure {
    fn new(
        reason: ValidationReason,
        message: String,
        hint: String,
        fields: Vec<String>,
    ) -> Self {
        Self {
            reason,
            message,
            hint,
            fields,
        }
    }
}

/// Validate `arguments` against `schema`.
///
/// Steps run in a fixed order and the first failing step is reported:
/// unknown keys, missing required fields, type checks, constraints.
/// Pure: no I/O, no shared state, same input gives the same output.
pub fn validate(
    schema: &ToolSchema,
    arguments: &Map<String, Value>,
) -> Result<ValidatedArguments, ValidationFailure> {
    reject_unknown_fields(schema, arguments)?;
    reject_missing_fields(schema, arguments)?;

    let mut present = Vec::new();
    for field in &schema.fields {
        match arguments.get(&field.name) {
            None | Some(Value::Null) if !field.required => {}
            None => {}
            Some(raw) => present.push((field, raw)),
        }
    }

    let mut typed = Vec::with_capacity(present.len());
    for (field, raw) in present {
        typed.push((field, coerce(schema, field, raw)?));
    }

    for (field, value) in &typed {
        check_constraints(schema, field, value)?;
    }

    Ok(ValidatedArguments {
        values: typed
            .into_iter()
            .map(|(field, value)| (field.name.clone(), value))
            .collect(),
    })
}

fn reject_unknown_fields(
    schema: &ToolSchema,
    arguments: &Map<String, Value>,
) -> Result<(), ValidationFailure> {
    if schema.allow_unknown_fields {
        return Ok(());
    }
    let mut unknown: Vec<String> = arguments
        .keys()
        .filter(|key| schema.field_named(key).is_none())
        .cloned()
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort();

    let allowed: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    let allowed = if allowed.is_empty() {
        "This tool accepts no parameters.".to_string()
    } else {
        format!("Allowed keys: {}.", allowed.join(", "))
    };
    Err(ValidationFailure::new(
        ValidationReason::UnknownField,
        format!("Unexpected parameters provided to {}.", schema.name),
        format!("Unsupported keys: {}. {allowed}", unknown.join(", ")),
        unknown,
    ))
}

fn reject_missing_fields(
    schema: &ToolSchema,
    arguments: &Map<String, Value>,
) -> Result<(), ValidationFailure> {
    let mut missing = Vec::new();
    let mut notes = Vec::new();

    for field in &schema.fields {
        let provided = arguments.get(&field.name);
        if field.required {
            if provided.is_none() {
                notes.push(format!("'{}' is required", field.name));
                missing.push(field.name.clone());
            }
            continue;
        }
        if provided.is_some_and(|value| !value.is_null()) {
            continue;
        }
        if let Some(when) = &field.required_when {
            let triggered = arguments
                .get(&when.field)
                .and_then(Value::as_str)
                .is_some_and(|value| value == when.equals);
            if triggered {
                notes.push(format!(
                    "'{}' is required when '{}' is '{}'",
                    field.name, when.field, when.equals
                ));
                missing.push(field.name.clone());
            }
        }
    }

    if missing.is_empty() {
        return Ok(());
    }
    Err(ValidationFailure::new(
        ValidationReason::MissingField,
        format!("Missing required parameters for {}.", schema.name),
        format!("{}.", notes.join("; ")),
        missing,
    ))
}

fn coerce(schema: &ToolSchema, field: &FieldSpec, raw: &Value) -> Result<ArgValue, ValidationFailure> {
    let coerced = match (field.field_type, raw) {
        (FieldType::String, Value::String(v)) => Some(ArgValue::String(v.clone())),
        (FieldType::Integer, Value::Number(n)) => n.as_i64().map(ArgValue::Integer),
        (FieldType::Boolean, Value::Bool(v)) => Some(ArgValue::Boolean(*v)),
        (FieldType::StringList | FieldType::StringSet, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(ArgValue::List),
        _ => None,
    };

    coerced.ok_or_else(|| {
        ValidationFailure::new(
            ValidationReason::TypeMismatch,
            format!("Invalid parameter type for {}.", schema.name),
            format!(
                "'{}' must be {}, got {}.",
                field.name,
                with_article(field.field_type.describe()),
                describe_json(raw)
            ),
            vec![field.name.clone()],
        )
    })
}

fn check_constraints(
    schema: &ToolSchema,
    field: &FieldSpec,
    value: &ArgValue,
) -> Result<(), ValidationFailure> {
    let violation = |detail: String| {
        ValidationFailure::new(
            ValidationReason::ConstraintViolation,
            format!("Invalid parameter value for {}.", schema.name),
            format!("'{}' {detail}.", field.name),
            vec![field.name.clone()],
        )
    };

    if let (FieldType::StringSet, ArgValue::List(items)) = (field.field_type, value) {
        let mut seen = HashSet::new();
        if let Some(dup) = items.iter().find(|item| !seen.insert(item.as_str())) {
            return Err(violation(format!("must not repeat items, '{dup}' appears twice")));
        }
    }

    for constraint in &field.constraints {
        match (constraint, value) {
            (Constraint::Range { min, max }, ArgValue::Integer(n)) => {
                let below = min.is_some_and(|min| *n < min);
                let above = max.is_some_and(|max| *n > max);
                if below || above {
                    let bounds = match (min, max) {
                        (Some(min), Some(max)) => format!("must be between {min} and {max}"),
                        (Some(min), None) => format!("must be at least {min}"),
                        (None, Some(max)) => format!("must be at most {max}"),
                        (None, None) => "is out of range".to_string(),
                    };
                    return Err(violation(format!("{bounds}, got {n}")));
                }
            }
            (Constraint::MinItems(count), ArgValue::List(items)) if items.len() < *count => {
                return Err(violation(format!(
                    "must contain at least {count} item(s), got {}",
                    items.len()
                )));
            }
            (Constraint::MaxItems(count), ArgValue::List(items)) if items.len() > *count => {
                return Err(violation(format!(
                    "must contain at most {count} item(s), got {}",
                    items.len()
                )));
            }
            (_, ArgValue::String(text)) => {
                if let Some(detail) = string_violation(constraint, text) {
                    return Err(violation(detail));
                }
            }
            (_, ArgValue::List(items)) => {
                for item in items {
                    if let Some(detail) = string_violation(constraint, item) {
                        return Err(violation(format!("items {detail}")));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn string_violation(constraint: &Constraint, text: &str) -> Option<String> {
    let len = text.chars().count();
    match constraint {
        Constraint::NonEmpty if text.trim().is_empty() => Some("must be a non-empty string".into()),
        Constraint::MinLength(min) if len < *min => {
            Some(format!("must be at least {min} characters, got {len}"))
        }
        Constraint::MaxLength(max) if len > *max => {
            Some(format!("must be at most {max} characters, got {len}"))
        }
        Constraint::OneOf(values) if !values.iter().any(|v| v == text) => Some(format!(
            "must be one of {}, got '{text}'",
            values.join(", ")
        )),
        _ => None,
    }
}

fn describe_json(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(items) if items.iter().all(Value::is_string) => "array of strings",
        Value::Array(_) => "array with non-string items",
        Value::Object(_) => "object",
    }
}

fn with_article(noun: &str) -> String {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {noun}"),
        _ => format!("a {noun}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_schema() -> ToolSchema {
        ToolSchema::new("search_music", "Search the catalog")
            .field(FieldSpec::string("term").required().non_empty().max_length(200))
            .field(
                FieldSpec::string_set("types")
                    .one_of(&["songs", "albums", "artists"])
                    .min_items(1),
            )
            .field(FieldSpec::integer("limit").range(1, 25))
            .field(FieldSpec::integer("offset").minimum(0))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_valid_search_in_schema_order() {
        let validated = validate(
            &search_schema(),
            &args(json!({"limit": 5, "types": ["songs"], "term": "Thriller"})),
        )
        .unwrap();
        assert_eq!(validated.names(), vec!["term", "types", "limit"]);
        assert_eq!(validated.str("term"), Some("Thriller"));
        assert_eq!(validated.integer("limit"), Some(5));
        assert_eq!(validated.list("types"), Some(&["songs".to_string()][..]));
        assert!(!validated.contains("offset"));
    }

    #[test]
    fn unknown_keys_are_named_and_sorted() {
        let err = validate(
            &search_schema(),
            &args(json!({"term": "x", "zeta": 1, "alpha": true})),
        )
        .unwrap_err();
        assert_eq!(err.reason, ValidationReason::UnknownField);
        assert_eq!(err.fields, vec!["alpha", "zeta"]);
        assert!(err.hint.starts_with("Unsupported keys: alpha, zeta."));
    }

    #[test]
    fn unknown_keys_win_over_other_problems() {
        let err = validate(&search_schema(), &args(json!({"limit": "many", "extra": 1})))
            .unwrap_err();
        assert_eq!(err.reason, ValidationReason::UnknownField);
    }

    #[test]
    fn missing_required_field_is_named() {
        let err = validate(&search_schema(), &args(json!({"limit": 5}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::MissingField);
        assert_eq!(err.fields, vec!["term"]);
        assert!(err.hint.contains("'term' is required"));
    }

    #[test]
    fn type_mismatch_describes_expected_and_actual() {
        let err = validate(&search_schema(), &args(json!({"term": "x", "limit": "5"})))
            .unwrap_err();
        assert_eq!(err.reason, ValidationReason::TypeMismatch);
        assert_eq!(err.hint, "'limit' must be an integer, got string.");

        let err = validate(&search_schema(), &args(json!({"term": "x", "limit": 2.5})))
            .unwrap_err();
        assert_eq!(err.hint, "'limit' must be an integer, got number.");
    }

    #[test]
    fn empty_term_violates_non_empty() {
        let err = validate(&search_schema(), &args(json!({"term": "", "limit": 5}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::ConstraintViolation);
        assert_eq!(err.fields, vec!["term"]);
        assert!(err.hint.contains("non-empty"));
    }

    #[test]
    fn bounds_and_enum_membership_are_enforced() {
        let err = validate(&search_schema(), &args(json!({"term": "x", "limit": 26})))
            .unwrap_err();
        assert_eq!(err.hint, "'limit' must be between 1 and 25, got 26.");

        let err = validate(&search_schema(), &args(json!({"term": "x", "offset": -1})))
            .unwrap_err();
        assert_eq!(err.hint, "'offset' must be at least 0, got -1.");

        let err = validate(
            &search_schema(),
            &args(json!({"term": "x", "types": ["songs", "videos"]})),
        )
        .unwrap_err();
        assert!(err.hint.contains("'videos'"));
    }

    #[test]
    fn sets_reject_duplicates() {
        let err = validate(
            &search_schema(),
            &args(json!({"term": "x", "types": ["songs", "songs"]})),
        )
        .unwrap_err();
        assert_eq!(err.reason, ValidationReason::ConstraintViolation);
        assert!(err.hint.contains("'songs' appears twice"));
    }

    #[test]
    fn null_optional_is_absent_but_null_required_is_mismatch() {
        let validated =
            validate(&search_schema(), &args(json!({"term": "x", "limit": null}))).unwrap();
        assert!(!validated.contains("limit"));

        let err = validate(&search_schema(), &args(json!({"term": null}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::TypeMismatch);
        assert_eq!(err.hint, "'term' must be a string, got null.");
    }

    #[test]
    fn conditional_requirement_applies_only_when_triggered() {
        let schema = ToolSchema::new("manage_queue", "queue")
            .field(FieldSpec::string("action").required().one_of(&["add", "view"]))
            .field(FieldSpec::string("track_id").required_when("action", "add"));

        assert!(validate(&schema, &args(json!({"action": "view"}))).is_ok());
        let err = validate(&schema, &args(json!({"action": "add"}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::MissingField);
        assert!(err.hint.contains("'track_id' is required when 'action' is 'add'"));
    }

    #[test]
    fn empty_schema_rejects_any_argument() {
        let schema = ToolSchema::new("mcp.health_check", "health");
        assert!(validate(&schema, &Map::new()).unwrap().is_empty());
        let err = validate(&schema, &args(json!({"unexpected": true}))).unwrap_err();
        assert!(err.hint.contains("accepts no parameters"));
    }

    #[test]
    fn validation_is_deterministic() {
        let schema = search_schema();
        let input = args(json!({"term": "Thriller", "types": ["songs", "albums"], "limit": 5}));
        assert_eq!(validate(&schema, &input), validate(&schema, &input));

        let bad = args(json!({"term": "", "extra": 1, "other": 2}));
        assert_eq!(validate(&schema, &bad), validate(&schema, &bad));
    }
}
