//! Error types for schema construction and document validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::registry::FieldType;
use crate::value::ValueError;

/// Errors raised while building or loading a schema.
///
/// Construction is fail-fast: the first problem aborts the whole schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field was declared as `null`.
    #[error("definition cannot be null or absent for field {field}")]
    MissingDefinition { field: String },

    /// A type tag that the registry does not know.
    #[error("invalid type: {type_name} for field {field}")]
    InvalidType { field: String, type_name: String },

    /// `required` was given a non-boolean.
    #[error("required must be a boolean for field {field}")]
    InvalidRequired { field: String },

    /// `validate` does not resolve to a function.
    #[error("validate must be a function for field {field}")]
    InvalidValidator { field: String },

    /// `pattern` is not a valid regular expression.
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A static default that does not satisfy the field type.
    #[error("default for field {field} must be of type {expected}, got {actual}")]
    InvalidDefault {
        field: String,
        expected: FieldType,
        actual: &'static str,
    },

    /// An option with a malformed value.
    #[error("invalid option '{option}' for field {field}: {message}")]
    InvalidOption {
        field: String,
        option: String,
        message: String,
    },

    /// The same field name declared twice at one level.
    #[error("duplicate field: {field}")]
    DuplicateField { field: String },

    /// The declaration root is not a mapping.
    #[error("schema declaration must be a mapping")]
    NotAMapping,

    /// A literal value inside the declaration could not be converted.
    #[error("invalid value for field {field}: {source}")]
    Value {
        field: String,
        #[source]
        source: ValueError,
    },

    /// Declaration text is not valid YAML/JSON.
    #[error("failed to parse schema declaration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Error reading a schema file.
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error walking the schema directory.
    #[error("failed to read schema directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    /// Schema directory could not be resolved.
    #[error("schema directory does not exist: {0}")]
    MissingDir(String),

    /// Named schema not found in a repository.
    #[error("schema not found: {0}")]
    NotFound(String),
}

/// Convenience alias for schema construction results.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A single rule violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field (`favorites.movie`, `tags[2]`).
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of validating a document against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the document is valid.
    pub valid: bool,
    /// Violations in emission order (empty if valid).
    pub errors: Vec<Violation>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationResult {
    /// Create a successful validation result.
    pub fn success() -> Self {
        Self { valid: true, errors: vec![] }
    }

    /// Create a result from a list of violations.
    pub fn from_errors(errors: Vec<Violation>) -> Self {
        Self { valid: errors.is_empty(), errors }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Add a violation to the result.
    pub fn add_error(&mut self, error: Violation) {
        self.errors.push(error);
        self.valid = false;
    }

    /// Violation messages joined with `", "`.
    pub fn joined_messages(&self) -> String {
        self.errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Convert into `Err(ValidationFailure)` when invalid.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.valid { Ok(()) } else { Err(ValidationFailure { violations: self.errors }) }
    }
}

/// A document rejected before it reaches the store.
///
/// Displays as the violation messages joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", joined(.violations))]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

fn joined(violations: &[Violation]) -> String {
    violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>().join(", ")
}
