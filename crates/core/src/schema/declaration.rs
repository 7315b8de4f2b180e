//! Raw schema declarations, as written by callers.
//!
//! A field may be declared four ways:
//!
//! ```text
//! name:      String                        -> FieldDeclaration::Type
//! age:       { type: Number, min: 18 }     -> FieldDeclaration::Options
//! tags:      [String]                      -> FieldDeclaration::List
//! favorites: { movie: String }             -> FieldDeclaration::Nested
//! ```
//!
//! These are resolved into a [`SchemaTree`](super::spec::SchemaTree) by
//! [`Schema::new`](super::engine::Schema::new) and never consulted again.

use super::registry::FieldType;
use super::spec::{DefaultValue, Validator};
use crate::value::Value;

/// Reference to a field type: already resolved, or a tag still to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Type(FieldType),
    Tag(String),
}

impl From<FieldType> for TypeRef {
    fn from(ty: FieldType) -> Self {
        Self::Type(ty)
    }
}

impl From<&str> for TypeRef {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

/// One field of a raw declaration.
#[derive(Debug, Clone)]
pub enum FieldDeclaration {
    /// Bare type reference.
    Type(TypeRef),
    /// Options object.
    Options(FieldOptions),
    /// Array literal; the first element describes the items.
    List(Vec<FieldDeclaration>),
    /// Sub-document.
    Nested(SchemaDeclaration),
}

impl FieldDeclaration {
    /// Array-literal shorthand for a list of `item`.
    pub fn list_of(item: impl Into<FieldDeclaration>) -> Self {
        Self::List(vec![item.into()])
    }
}

impl From<FieldType> for FieldDeclaration {
    fn from(ty: FieldType) -> Self {
        Self::Type(TypeRef::Type(ty))
    }
}

impl From<&str> for FieldDeclaration {
    fn from(tag: &str) -> Self {
        Self::Type(TypeRef::from(tag))
    }
}

impl From<TypeRef> for FieldDeclaration {
    fn from(ty: TypeRef) -> Self {
        Self::Type(ty)
    }
}

impl From<FieldOptions> for FieldDeclaration {
    fn from(opts: FieldOptions) -> Self {
        Self::Options(opts)
    }
}

impl From<SchemaDeclaration> for FieldDeclaration {
    fn from(decl: SchemaDeclaration) -> Self {
        Self::Nested(decl)
    }
}

impl From<Vec<FieldDeclaration>> for FieldDeclaration {
    fn from(items: Vec<FieldDeclaration>) -> Self {
        Self::List(items)
    }
}

/// Options object for a field. Unset options fall back to an optional
/// `Mixed` field with no default and no validator.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub field_type: Option<TypeRef>,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub validator: Option<Validator>,
    pub message: Option<String>,
    pub enum_values: Option<Vec<Value>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    /// Element declaration for arrays (`arrayType`).
    pub items: Option<Box<FieldDeclaration>>,
}

impl FieldOptions {
    pub fn new(field_type: impl Into<TypeRef>) -> Self {
        Self { field_type: Some(field_type.into()), ..Default::default() }
    }

    /// Options for an `Array` of `item`.
    pub fn array_of(item: impl Into<FieldDeclaration>) -> Self {
        Self::new(FieldType::Array).items(item)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::value(value));
        self
    }

    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::producer(producer));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn items(mut self, item: impl Into<FieldDeclaration>) -> Self {
        self.items = Some(Box::new(item.into()));
        self
    }
}

/// Ordered set of field declarations; the root of a raw schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaDeclaration {
    pub fields: Vec<(String, FieldDeclaration)>,
}

impl SchemaDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field declaration.
    pub fn field(mut self, name: impl Into<String>, decl: impl Into<FieldDeclaration>) -> Self {
        self.fields.push((name.into(), decl.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
