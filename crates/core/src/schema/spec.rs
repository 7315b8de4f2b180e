//! Canonical schema tree.
//!
//! Every raw declaration form is normalized into these types once, at
//! construction time. Nothing here is mutated afterwards.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::registry::FieldType;
use crate::value::Value;

/// Signature of a custom field predicate.
///
/// `Ok(false)` is a plain failure; `Err(message)` is a raised error whose
/// text becomes the violation message.
pub type ValidatorFn = dyn Fn(&Value) -> Result<bool, String> + Send + Sync;

/// Signature of a lazily evaluated default.
pub type ProducerFn = dyn Fn() -> Value + Send + Sync;

/// A custom field predicate.
#[derive(Clone)]
pub struct Validator(Arc<ValidatorFn>);

impl Validator {
    /// Wrap a fallible predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap an infallible predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |v| Ok(f(v))))
    }

    pub fn check(&self, value: &Value) -> Result<bool, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Default for a missing field.
#[derive(Clone)]
pub enum DefaultValue {
    /// Used as-is.
    Static(Value),
    /// Called once per document that lacks the field.
    Producer(Arc<ProducerFn>),
}

impl DefaultValue {
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Static(v.into())
    }

    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Producer(Arc::new(f))
    }

    /// Produce the default for a field of type `ty`.
    ///
    /// Numeric results on `Date` fields are read as epoch milliseconds.
    pub fn resolve(&self, ty: FieldType) -> Value {
        let value = match self {
            Self::Static(v) => v.clone(),
            Self::Producer(f) => f(),
        };
        promote_date(ty, value)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Apply the integer-to-Date rule for `Date` fields.
pub(crate) fn promote_date(ty: FieldType, value: Value) -> Value {
    if ty != FieldType::Date {
        return value;
    }
    let millis = match value {
        Value::Int(i) => i,
        Value::Float(f) if f.is_finite() => f.trunc() as i64,
        other => return other,
    };
    Value::date_from_millis(millis).unwrap_or(Value::Int(millis))
}

/// Normalized specification of a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub validator: Option<Validator>,
    /// Message used when `validator` returns `false`.
    pub message: Option<String>,
    pub enum_values: Option<Vec<Value>>,

    // Number constraints
    pub min: Option<f64>,
    pub max: Option<f64>,

    // String constraints
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,

    /// Element specification for `Array` fields.
    pub items: Option<Box<FieldSpec>>,
}

impl FieldSpec {
    /// A bare, optional field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            validator: None,
            message: None,
            enum_values: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            items: None,
        }
    }

    /// An optional `Array` field whose elements follow `items`.
    pub fn array_of(items: FieldSpec) -> Self {
        Self { items: Some(Box::new(items)), ..Self::new(FieldType::Array) }
    }
}

/// A schema node: a leaf field or a nested sub-document.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Field(FieldSpec),
    Nested(SchemaTree),
}

/// Ordered mapping from field name to node.
#[derive(Debug, Clone, Default)]
pub struct SchemaTree {
    nodes: Vec<(String, SchemaNode)>,
}

impl SchemaTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node; returns `false` if the name is already taken.
    pub(crate) fn insert(&mut self, name: String, node: SchemaNode) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.nodes.push((name, node));
        true
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    /// Leaf spec at a dotted path (`favorites.movie`).
    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        let mut tree = self;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            match (tree.get(part)?, parts.peek()) {
                (SchemaNode::Field(spec), None) => return Some(spec),
                (SchemaNode::Nested(sub), Some(_)) => tree = sub,
                _ => return None,
            }
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Nodes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.nodes.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dotted paths of all required leaf fields, in declaration order.
    pub fn required_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_required(self, "", &mut out);
        out
    }
}

fn collect_required(tree: &SchemaTree, prefix: &str, out: &mut Vec<String>) {
    for (name, node) in tree.iter() {
        let path = if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") };
        match node {
            SchemaNode::Field(spec) if spec.required => out.push(path),
            SchemaNode::Field(_) => {}
            SchemaNode::Nested(sub) => collect_required(sub, &path, out),
        }
    }
}
