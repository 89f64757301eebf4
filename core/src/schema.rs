use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value, json};

/// Declared JSON type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    /// JSON integer, 64-bit signed
    Integer,
    Boolean,
    /// JSON array of strings
    StringList,
    /// JSON array of strings, items unique
    StringSet,
}

impl FieldType {
    /// Human-readable name used in validation hints.
    pub fn describe(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::StringList => "array of strings",
            FieldType::StringSet => "array of unique strings",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, FieldType::StringList | FieldType::StringSet)
    }
}

/// A bound or membership rule applied after the type check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// String (or every list item) must contain a non-whitespace character
    NonEmpty,
    /// Minimum length in characters
    MinLength(usize),
    /// Maximum length in characters
    MaxLength(usize),
    /// Inclusive integer bounds
    Range { min: Option<i64>, max: Option<i64> },
    /// String (or every list item) must be one of these values
    OneOf(Vec<String>),
    MinItems(usize),
    MaxItems(usize),
}

/// Makes a field required when another field carries a given string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredWhen {
    pub field: String,
    pub equals: String,
}

/// One argument of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub required_when: Option<RequiredWhen>,
    pub constraints: Vec<Constraint>,
    pub description: Option<String>,
    /// Advertised default. Documentation only: validation never injects it.
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            required_when: None,
            constraints: Vec::new(),
            description: None,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::StringList)
    }

    pub fn string_set(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::StringSet)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn required_when(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.required_when = Some(RequiredWhen {
            field: field.into(),
            equals: equals.into(),
        });
        self
    }

    pub fn non_empty(self) -> Self {
        self.constraint(Constraint::NonEmpty)
    }

    pub fn min_length(self, len: usize) -> Self {
        self.constraint(Constraint::MinLength(len))
    }

    pub fn max_length(self, len: usize) -> Self {
        self.constraint(Constraint::MaxLength(len))
    }

    pub fn range(self, min: i64, max: i64) -> Self {
        self.constraint(Constraint::Range {
            min: Some(min),
            max: Some(max),
        })
    }

    pub fn minimum(self, min: i64) -> Self {
        self.constraint(Constraint::Range {
            min: Some(min),
            max: None,
        })
    }

    pub fn one_of(self, values: &[&str]) -> Self {
        self.constraint(Constraint::OneOf(
            values.iter().map(|v| (*v).to_string()).collect(),
        ))
    }

    pub fn min_items(self, count: usize) -> Self {
        self.constraint(Constraint::MinItems(count))
    }

    pub fn max_items(self, count: usize) -> Self {
        self.constraint(Constraint::MaxItems(count))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// JSON Schema fragment for this field.
    pub fn json_schema(&self) -> Value {
        let mut item = Map::new();
        let mut schema = Map::new();

        match self.field_type {
            FieldType::String => {
                schema.insert("type".into(), json!("string"));
            }
            FieldType::Integer => {
                schema.insert("type".into(), json!("integer"));
            }
            FieldType::Boolean => {
                schema.insert("type".into(), json!("boolean"));
            }
            FieldType::StringList | FieldType::StringSet => {
                schema.insert("type".into(), json!("array"));
                item.insert("type".into(), json!("string"));
                if self.field_type == FieldType::StringSet {
                    schema.insert("uniqueItems".into(), json!(true));
                }
            }
        }

        // String-level rules go on the item schema for lists.
        let is_list = self.field_type.is_list();
        for constraint in &self.constraints {
            let target = if is_list { &mut item } else { &mut schema };
            match constraint {
                Constraint::NonEmpty => {
                    target.insert("minLength".into(), json!(1));
                }
                Constraint::MinLength(len) => {
                    target.insert("minLength".into(), json!(len));
                }
                Constraint::MaxLength(len) => {
                    target.insert("maxLength".into(), json!(len));
                }
                Constraint::OneOf(values) => {
                    target.insert("enum".into(), json!(values));
                }
                Constraint::Range { min, max } => {
                    if let Some(min) = min {
                        schema.insert("minimum".into(), json!(min));
                    }
                    if let Some(max) = max {
                        schema.insert("maximum".into(), json!(max));
                    }
                }
                Constraint::MinItems(count) => {
                    schema.insert("minItems".into(), json!(count));
                }
                Constraint::MaxItems(count) => {
                    schema.insert("maxItems".into(), json!(count));
                }
            }
        }

        if is_list {
            schema.insert("items".into(), Value::Object(item));
        }
        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        Value::Object(schema)
    }
}

/// Argument schema of one tool. Unknown fields are always rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
    pub allow_unknown_fields: bool,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
            allow_unknown_fields: false,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// JSON Schema advertised to the host as `inputSchema`.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut conditionals = Vec::new();

        for field in &self.fields {
            properties.insert(field.name.clone(), field.json_schema());
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
            if let Some(when) = &field.required_when {
                conditionals.push(json!({
                    "if": {
                        "properties": { (when.field.clone()): { "const": when.equals } },
                        "required": [when.field]
                    },
                    "then": { "required": [field.name] }
                }));
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
            "additionalProperties": self.allow_unknown_fields,
        });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        if !conditionals.is_empty() {
            schema["allOf"] = Value::Array(conditionals);
        }
        schema
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("tool '{0}' is registered more than once")]
    Duplicate(String),
    #[error("tool '{tool}' declares field '{field}' more than once")]
    DuplicateField { tool: String, field: String },
    #[error("tool '{tool}' field '{field}' depends on undeclared field '{depends_on}'")]
    UnknownDependency {
        tool: String,
        field: String,
        depends_on: String,
    },
    #[error("tool '{0}' has no handler")]
    MissingHandler(String),
    #[error("handler '{0}' has no registered schema")]
    MissingSchema(String),
}

/// Tool schemas keyed by exact, case-sensitive name. Filled once at startup
/// and read-only afterwards; registration order is the manifest order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<ToolSchema>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: ToolSchema) -> Result<(), RegistryError> {
        if self.index.contains_key(&schema.name) {
            return Err(RegistryError::Duplicate(schema.name));
        }

        let mut seen = HashSet::new();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RegistryError::DuplicateField {
                    tool: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        for field in &schema.fields {
            let Some(when) = &field.required_when else {
                continue;
            };
            if !seen.contains(when.field.as_str()) {
                return Err(RegistryError::UnknownDependency {
                    tool: schema.name.clone(),
                    field: field.name.clone(),
                    depends_on: when.field.clone(),
                });
            }
        }

        self.index.insert(schema.name.clone(), self.schemas.len());
        self.schemas.push(schema);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolSchema> {
        self.index.get(name).map(|&idx| &self.schemas[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSchema> {
        self.schemas.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// `[{name, description, inputSchema}]` in registration order.
    pub fn manifest(&self) -> Vec<Value> {
        self.schemas
            .iter()
            .map(|schema| {
                json!({
                    "name": schema.name,
                    "description": schema.description,
                    "inputSchema": schema.input_schema(),
                })
            })
            .collect()
    }
}
