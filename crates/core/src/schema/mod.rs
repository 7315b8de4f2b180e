//! Schema-driven document validation.
//!
//! This module lets a caller declare the shape of a document and then:
//! - fill in missing fields from declared defaults
//! - check a document against types, constraints and custom predicates,
//!   collecting every violation rather than stopping at the first
//!
//! Declarations are normalized once into an immutable [`SchemaTree`]; both
//! operations walk that tree without mutating it.
//!
//! # Example
//!
//! ```
//! use docshape_core::schema::{FieldOptions, FieldType, Schema, SchemaDeclaration};
//! use docshape_core::value::{Document, Value};
//!
//! let schema = Schema::new(
//!     SchemaDeclaration::new()
//!         .field("name", FieldOptions::new(FieldType::String).required())
//!         .field("age", FieldOptions::new(FieldType::Number).min(18.0))
//!         .field("role", FieldOptions::new(FieldType::String).default_value("member")),
//! )
//! .unwrap();
//!
//! let mut doc = Document::new();
//! doc.insert("age".into(), Value::Int(15));
//!
//! let prepared = schema.apply_defaults(&doc);
//! assert_eq!(prepared["role"], Value::from("member"));
//!
//! let result = schema.validate(&prepared);
//! assert!(!result.valid);
//! assert_eq!(result.joined_messages(), "name is required, age must be at least 18");
//! ```

pub mod declaration;
pub mod defaults;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod normalize;
pub mod registry;
pub mod spec;
pub mod validation;

// Re-export commonly used types
pub use declaration::{FieldDeclaration, FieldOptions, SchemaDeclaration, TypeRef};
pub use discovery::{SchemaInfo, SchemaRepository, discover_schemas};
pub use engine::Schema;
pub use errors::{SchemaError, SchemaResult, ValidationFailure, ValidationResult, Violation};
pub use loader::{ValidatorSet, declaration_from_str, declaration_from_value};
pub use registry::{FieldType, TypePredicate, TypeRegistry};
pub use spec::{DefaultValue, FieldSpec, SchemaNode, SchemaTree, Validator};
