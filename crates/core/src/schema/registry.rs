//! Type registry: the closed set of field types and their predicates.

use crate::value::{ObjectId, Value};

/// Predicate testing whether a value conforms to a field type.
pub type TypePredicate = fn(&Value) -> bool;

/// Type tag of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// Integer or finite float.
    Number,
    /// Boolean.
    Boolean,
    /// Timestamp.
    Date,
    /// 12-byte document identifier.
    ObjectId,
    /// List of values.
    Array,
    /// Anything.
    Mixed,
    /// Raw bytes.
    Buffer,
    /// Key/value mapping.
    Map,
    /// Integer wider than 64 bits.
    BigInt,
}

impl FieldType {
    /// Every known type, in registry order.
    pub const ALL: [FieldType; 10] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Date,
        Self::ObjectId,
        Self::Array,
        Self::Mixed,
        Self::Buffer,
        Self::Map,
        Self::BigInt,
    ];

    /// Canonical tag name, as used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::ObjectId => "ObjectId",
            Self::Array => "Array",
            Self::Mixed => "Mixed",
            Self::Buffer => "Buffer",
            Self::Map => "Map",
            Self::BigInt => "BigInt",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRegistry::resolve(s).ok_or_else(|| format!("invalid type: {s}"))
    }
}

/// Lookup table from type tags to predicates.
///
/// The table is fixed; adding a type means adding a [`FieldType`] variant and
/// its arm in [`TypeRegistry::predicate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    /// Resolve a tag to its type.
    ///
    /// Accepts the canonical spelling (`"ObjectId"`) and the all-lowercase
    /// form (`"objectid"`).
    pub fn resolve(name: &str) -> Option<FieldType> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == name || ty.as_str().to_lowercase() == name)
    }

    /// Predicate for a type.
    pub fn predicate(ty: FieldType) -> TypePredicate {
        match ty {
            FieldType::String => is_string,
            FieldType::Number => is_number,
            FieldType::Boolean => is_boolean,
            FieldType::Date => is_date,
            FieldType::ObjectId => is_object_id,
            FieldType::Array => is_array,
            FieldType::Mixed => is_mixed,
            FieldType::Buffer => is_buffer,
            FieldType::Map => is_map,
            FieldType::BigInt => is_bigint,
        }
    }

    /// Run the predicate for `ty` against `value`.
    pub fn check(ty: FieldType, value: &Value) -> bool {
        Self::predicate(ty)(value)
    }

    /// Canonical names of all registered types.
    pub fn names() -> impl Iterator<Item = &'static str> {
        FieldType::ALL.into_iter().map(|ty| ty.as_str())
    }
}

fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

fn is_number(value: &Value) -> bool {
    match value {
        Value::Int(_) => true,
        Value::Float(f) => f.is_finite(),
        _ => false,
    }
}

fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

fn is_date(value: &Value) -> bool {
    matches!(value, Value::Date(_))
}

fn is_object_id(value: &Value) -> bool {
    match value {
        Value::ObjectId(_) => true,
        Value::String(s) => ObjectId::is_valid_hex(s),
        _ => false,
    }
}

fn is_array(value: &Value) -> bool {
    matches!(value, Value::Array(_))
}

fn is_mixed(_: &Value) -> bool {
    true
}

fn is_buffer(value: &Value) -> bool {
    matches!(value, Value::Binary(_))
}

fn is_map(value: &Value) -> bool {
    matches!(value, Value::Map(_))
}

fn is_bigint(value: &Value) -> bool {
    matches!(value, Value::BigInt(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Document;

    #[test]
    fn test_resolve_canonical_and_lowercase() {
        assert_eq!(TypeRegistry::resolve("String"), Some(FieldType::String));
        assert_eq!(TypeRegistry::resolve("objectid"), Some(FieldType::ObjectId));
        assert_eq!(TypeRegistry::resolve("BigInt"), Some(FieldType::BigInt));
        assert_eq!(TypeRegistry::resolve("Strng"), None);
        assert_eq!(TypeRegistry::resolve("STRING"), None);
    }

    #[test]
    fn test_every_type_round_trips_through_its_name() {
        for ty in FieldType::ALL {
            assert_eq!(ty.as_str().parse::<FieldType>().unwrap(), ty);
        }
        assert_eq!(TypeRegistry::names().count(), 10);
    }

    #[test]
    fn test_from_str_error_message() {
        assert_eq!("Float".parse::<FieldType>().unwrap_err(), "invalid type: Float");
    }

    #[test]
    fn test_number_predicate() {
        assert!(TypeRegistry::check(FieldType::Number, &Value::Int(3)));
        assert!(TypeRegistry::check(FieldType::Number, &Value::Float(1.5)));
        assert!(!TypeRegistry::check(FieldType::Number, &Value::Float(f64::NAN)));
        assert!(!TypeRegistry::check(FieldType::Number, &Value::from("30")));
    }

    #[test]
    fn test_object_id_accepts_hex_strings() {
        assert!(TypeRegistry::check(
            FieldType::ObjectId,
            &Value::from("507f1f77bcf86cd799439011")
        ));
        assert!(!TypeRegistry::check(FieldType::ObjectId, &Value::from("507f")));
    }

    #[test]
    fn test_mixed_accepts_everything() {
        for v in [Value::Null, Value::Int(1), Value::from("s"), Value::Map(Document::new())] {
            assert!(TypeRegistry::check(FieldType::Mixed, &v));
        }
    }

    #[test]
    fn test_structural_predicates() {
        assert!(TypeRegistry::check(FieldType::Array, &Value::Array(vec![])));
        assert!(TypeRegistry::check(FieldType::Map, &Value::Map(Document::new())));
        assert!(TypeRegistry::check(FieldType::Buffer, &Value::Binary(vec![1])));
        assert!(TypeRegistry::check(FieldType::BigInt, &Value::BigInt(1)));
        assert!(!TypeRegistry::check(FieldType::BigInt, &Value::Int(1)));
        assert!(!TypeRegistry::check(FieldType::Boolean, &Value::Int(0)));
    }
}
