//! Loading declarations from YAML or JSON text.
//!
//! ```yaml
//! name:   { type: String, required: true, minLength: 2 }
//! age:    { type: Number, min: 18 }
//! email:  { type: String, validate: email, message: "invalid email" }
//! tags:   [String]
//! favorites:
//!   movie: { type: String, default: LOTR }
//! ```
//!
//! `validate` names a predicate registered in a [`ValidatorSet`]; functions
//! cannot be written in the file itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value as Yaml};

use super::declaration::{FieldDeclaration, FieldOptions, SchemaDeclaration, TypeRef};
use super::errors::{SchemaError, SchemaResult};
use super::normalize::join_path;
use super::registry::{FieldType, TypeRegistry};
use super::spec::{DefaultValue, Validator};
use crate::value::Value;

/// Named predicates that declarations can refer to by `validate: <name>`.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    validators: HashMap<String, Validator>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, validator: Validator) -> &mut Self {
        self.validators.insert(name.into(), validator);
        self
    }

    pub fn with(mut self, name: impl Into<String>, validator: Validator) -> Self {
        self.register(name, validator);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Parse YAML (or JSON) text into a declaration.
pub fn declaration_from_str(src: &str, validators: &ValidatorSet) -> SchemaResult<SchemaDeclaration> {
    let root: Yaml = serde_yaml::from_str(src)?;
    declaration_from_value(&root, validators)
}

/// Convert an already parsed YAML value into a declaration.
pub fn declaration_from_value(root: &Yaml, validators: &ValidatorSet) -> SchemaResult<SchemaDeclaration> {
    match root {
        Yaml::Mapping(map) => parse_mapping(map, "", validators),
        _ => Err(SchemaError::NotAMapping),
    }
}

fn parse_mapping(map: &Mapping, prefix: &str, validators: &ValidatorSet) -> SchemaResult<SchemaDeclaration> {
    let mut decl = SchemaDeclaration::new();
    for (key, value) in map {
        let name = key_name(key, prefix)?;
        let path = join_path(prefix, &name);
        let field = parse_field(value, &path, validators)?;
        decl = decl.field(name, field);
    }
    Ok(decl)
}

fn key_name(key: &Yaml, prefix: &str) -> SchemaResult<String> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        _ => Err(SchemaError::InvalidOption {
            field: if prefix.is_empty() { "<root>".to_string() } else { prefix.to_string() },
            option: "key".to_string(),
            message: "field names must be scalars".to_string(),
        }),
    }
}

fn parse_field(value: &Yaml, path: &str, validators: &ValidatorSet) -> SchemaResult<FieldDeclaration> {
    match value {
        Yaml::Null => Err(SchemaError::MissingDefinition { field: path.to_string() }),
        Yaml::String(tag) => Ok(FieldDeclaration::Type(TypeRef::Tag(tag.clone()))),
        Yaml::Sequence(items) => items
            .iter()
            .map(|item| parse_field(item, path, validators))
            .collect::<SchemaResult<Vec<_>>>()
            .map(FieldDeclaration::List),
        Yaml::Mapping(map) if map.contains_key("type") => {
            parse_options(map, path, validators).map(FieldDeclaration::Options)
        }
        Yaml::Mapping(map) => parse_mapping(map, path, validators).map(FieldDeclaration::Nested),
        Yaml::Tagged(tagged) => parse_field(&tagged.value, path, validators),
        Yaml::Bool(_) | Yaml::Number(_) => Err(SchemaError::InvalidType {
            field: path.to_string(),
            type_name: scalar_text(value),
        }),
    }
}

fn parse_options(map: &Mapping, path: &str, validators: &ValidatorSet) -> SchemaResult<FieldOptions> {
    let mut opts = FieldOptions::default();

    match map.get("type") {
        Some(Yaml::String(tag)) => opts.field_type = Some(TypeRef::Tag(tag.clone())),
        Some(Yaml::Sequence(items)) => {
            opts.field_type = Some(TypeRef::Type(FieldType::Array));
            if let Some(first) = items.first() {
                opts.items = Some(Box::new(parse_field(first, path, validators)?));
            }
        }
        Some(Yaml::Null) | None => {}
        Some(other) => {
            return Err(SchemaError::InvalidType {
                field: path.to_string(),
                type_name: scalar_text(other),
            });
        }
    }

    if let Some(required) = map.get("required") {
        opts.required = required
            .as_bool()
            .ok_or_else(|| SchemaError::InvalidRequired { field: path.to_string() })?;
    }

    if let Some(validate) = map.get("validate") {
        let validator = validate
            .as_str()
            .and_then(|name| validators.get(name))
            .ok_or_else(|| SchemaError::InvalidValidator { field: path.to_string() })?;
        opts.validator = Some(validator.clone());
    }

    if let Some(message) = map.get("message") {
        opts.message = Some(string_option(message, path, "message")?);
    }

    if let Some(pattern) = map.get("pattern") {
        opts.pattern = Some(string_option(pattern, path, "pattern")?);
    }

    if let Some(values) = map.get("enum") {
        let Yaml::Sequence(items) = values else {
            return Err(option_error(path, "enum", "expected a list"));
        };
        let values = items
            .iter()
            .map(|v| literal(v, path))
            .collect::<SchemaResult<Vec<_>>>()?;
        opts.enum_values = Some(values);
    }

    opts.min = number_option(map, path, &["min"])?;
    opts.max = number_option(map, path, &["max"])?;
    opts.min_length = length_option(map, path, &["minLength", "min_length"])?;
    opts.max_length = length_option(map, path, &["maxLength", "max_length"])?;

    if let Some(item) = first_present(map, &["arrayType", "items"]) {
        if opts.items.is_some() {
            return Err(option_error(path, "arrayType", "conflicts with an array literal type"));
        }
        opts.items = Some(Box::new(parse_field(item, path, validators)?));
    }

    if let Some(default) = map.get("default") {
        let value = literal(default, path)?;
        opts.default = Some(DefaultValue::Static(date_default(&opts, value, path)?));
    }

    Ok(opts)
}

/// Date fields may spell their default as RFC 3339 text.
fn date_default(opts: &FieldOptions, value: Value, path: &str) -> SchemaResult<Value> {
    let is_date = match &opts.field_type {
        Some(TypeRef::Tag(tag)) => TypeRegistry::resolve(tag) == Some(FieldType::Date),
        Some(TypeRef::Type(ty)) => *ty == FieldType::Date,
        None => false,
    };
    match value {
        Value::String(s) if is_date => DateTime::parse_from_rfc3339(&s)
            .map(|d| Value::Date(d.with_timezone(&Utc)))
            .map_err(|e| option_error(path, "default", &e.to_string())),
        other => Ok(other),
    }
}

fn literal(value: &Yaml, path: &str) -> SchemaResult<Value> {
    Value::from_yaml(value).map_err(|source| SchemaError::Value { field: path.to_string(), source })
}

fn first_present<'a>(map: &'a Mapping, keys: &[&str]) -> Option<&'a Yaml> {
    keys.iter().find_map(|k| map.get(*k))
}

fn string_option(value: &Yaml, path: &str, option: &str) -> SchemaResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| option_error(path, option, "expected a string"))
}

fn number_option(map: &Mapping, path: &str, keys: &[&str]) -> SchemaResult<Option<f64>> {
    match first_present(map, keys) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| option_error(path, keys[0], "expected a number")),
    }
}

fn length_option(map: &Mapping, path: &str, keys: &[&str]) -> SchemaResult<Option<usize>> {
    match first_present(map, keys) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| option_error(path, keys[0], "expected a non-negative integer")),
    }
}

fn option_error(path: &str, option: &str, message: &str) -> SchemaError {
    SchemaError::InvalidOption {
        field: path.to_string(),
        option: option.to_string(),
        message: message.to_string(),
    }
}

fn scalar_text(value: &Yaml) -> String {
    match value {
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::String(s) => s.clone(),
        Yaml::Null => "null".to_string(),
        Yaml::Sequence(_) => "list".to_string(),
        Yaml::Mapping(_) => "mapping".to_string(),
        Yaml::Tagged(t) => scalar_text(&t.value),
    }
}
