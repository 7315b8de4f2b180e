//! In-memory document values.
//!
//! A [`Document`] maps field names to [`Value`]s. A key missing from the map is
//! treated as *undefined*; a key mapped to [`Value::Null`] is present.
//!
//! Values round-trip through JSON/YAML using extended wrappers for the types
//! neither format has natively:
//!
//! ```json
//! { "created": { "$date": "2025-01-01T00:00:00Z" },
//!   "owner":   { "$oid": "507f1f77bcf86cd799439011" },
//!   "blob":    { "$binary": "deadbeef" },
//!   "big":     { "$bigint": "170141183460469231731687303715884105727" } }
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

/// A document: field name to value.
pub type Document = BTreeMap<String, Value>;

/// Errors converting external data into values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid ObjectId '{0}': expected 24 hex characters")]
    InvalidObjectId(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("invalid binary payload: {0}")]
    InvalidBinary(String),

    #[error("invalid bigint '{0}'")]
    InvalidBigInt(String),

    #[error("number {0} cannot be represented")]
    UnrepresentableNumber(String),

    #[error("mapping keys must be strings")]
    NonStringKey,
}

/// A 12-byte document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Whether `s` is the 24-character hex form of an ObjectId.
    pub fn is_valid_hex(s: &str) -> bool {
        s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl FromStr for ObjectId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid_hex(s) {
            return Err(ValueError::InvalidObjectId(s.to_string()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| ValueError::InvalidObjectId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A single document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    BigInt(i128),
    String(String),
    Date(DateTime<Utc>),
    ObjectId(ObjectId),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Map(Document),
}

impl Value {
    /// Short lowercase name of the value's runtime kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::ObjectId(_) => "objectid",
            Self::Binary(_) => "buffer",
            Self::Array(_) => "array",
            Self::Map(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Equality that compares `Int` and `Float` by numeric value.
    ///
    /// Two `Int`s compare exactly; an `Int` against a `Float` compares without
    /// rounding the integer.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => {
                cmp_int_float(*i, *f) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }

    /// Order a numeric value against a bound. `None` for non-numbers and NaN.
    pub fn compare_number(&self, bound: f64) -> Option<Ordering> {
        match self {
            Self::Int(i) => cmp_int_float(*i, bound),
            Self::Float(f) => f.partial_cmp(&bound),
            _ => None,
        }
    }

    /// Build a `Date` from milliseconds since the Unix epoch.
    pub fn date_from_millis(millis: i64) -> Option<Value> {
        Utc.timestamp_millis_opt(millis).single().map(Value::Date)
    }

    /// Convert a JSON value, honouring the extended `$date`/`$oid`/`$binary`/`$bigint` wrappers.
    pub fn from_json(json: &serde_json::Value) -> Result<Value, ValueError> {
        use serde_json::Value as J;

        Ok(match json {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(*b),
            J::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(ValueError::UnrepresentableNumber(n.to_string()));
                }
            }
            J::String(s) => Value::String(s.clone()),
            J::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect::<Result<_, _>>()?)
            }
            J::Object(map) => {
                if let Some((key, inner)) = map.iter().next().filter(|_| map.len() == 1) {
                    if let Some(v) = extended_json(key, inner)? {
                        return Ok(v);
                    }
                }
                let mut doc = Document::new();
                for (k, v) in map {
                    doc.insert(k.clone(), Value::from_json(v)?);
                }
                Value::Map(doc)
            }
        })
    }

    /// Convert to JSON, emitting extended wrappers where needed.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Value as J, json};

        match self {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Int(i) => json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(J::Null, J::Number),
            Value::BigInt(i) => json!({ "$bigint": i.to_string() }),
            Value::String(s) => J::String(s.clone()),
            Value::Date(d) => json!({ "$date": d.to_rfc3339() }),
            Value::ObjectId(oid) => json!({ "$oid": oid.to_string() }),
            Value::Binary(bytes) => json!({ "$binary": hex::encode(bytes) }),
            Value::Array(items) => J::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(doc) => {
                J::Object(doc.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }

    /// Convert a YAML value. Same wrapper rules as [`Value::from_json`].
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, ValueError> {
        use serde_yaml::Value as Y;

        Ok(match yaml {
            Y::Null => Value::Null,
            Y::Bool(b) => Value::Bool(*b),
            Y::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(ValueError::UnrepresentableNumber(n.to_string()));
                }
            }
            Y::String(s) => Value::String(s.clone()),
            Y::Sequence(items) => {
                Value::Array(items.iter().map(Value::from_yaml).collect::<Result<_, _>>()?)
            }
            Y::Mapping(map) => {
                let json = serde_json::to_value(map).map_err(|_| ValueError::NonStringKey)?;
                Value::from_json(&json)?
            }
            Y::Tagged(tagged) => Value::from_yaml(&tagged.value)?,
        })
    }
}

/// Exact ordering of an integer against a float.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    // Saturating casts keep infinities and out-of-range floats ordered correctly.
    let i = i128::from(i);
    let floor = f.floor() as i128;
    if f.fract() == 0.0 || f.is_infinite() {
        return Some(i.cmp(&floor));
    }
    Some(if i <= floor { Ordering::Less } else { Ordering::Greater })
}

/// Decode a single-key extended JSON wrapper, if `key` names one.
fn extended_json(key: &str, inner: &serde_json::Value) -> Result<Option<Value>, ValueError> {
    use serde_json::Value as J;

    let value = match (key, inner) {
        ("$date", J::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|d| Value::Date(d.with_timezone(&Utc)))
            .map_err(|_| ValueError::InvalidDate(s.clone()))?,
        ("$date", J::Number(n)) => n
            .as_i64()
            .and_then(Value::date_from_millis)
            .ok_or_else(|| ValueError::InvalidDate(n.to_string()))?,
        ("$oid", J::String(s)) => Value::ObjectId(s.parse()?),
        ("$binary", J::String(s)) => {
            Value::Binary(hex::decode(s).map_err(|e| ValueError::InvalidBinary(e.to_string()))?)
        }
        ("$bigint", J::String(s)) => {
            Value::BigInt(s.parse().map_err(|_| ValueError::InvalidBigInt(s.clone()))?)
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::BigInt(i) => write!(f, "{i}"),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => f.write_str(&d.to_rfc3339()),
            Value::ObjectId(oid) => write!(f, "{oid}"),
            Value::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::Array(_) | Value::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Value::BigInt(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<ObjectId> for Value {
    fn from(oid: ObjectId) -> Self {
        Value::ObjectId(oid)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Map(doc)
    }
}
