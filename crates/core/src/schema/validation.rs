//! Document validation against a canonical schema tree.
//!
//! Every field is checked; a failure in one field never hides problems in
//! another. Within a single field the checks run in a fixed order and some
//! of them end the chain early:
//!
//! 1. required / missing (missing values end the chain)
//! 2. type (a mismatch ends the chain)
//! 3. enum membership
//! 4. string, number and array-element constraints
//! 5. custom validator

use std::cmp::Ordering;

use super::errors::{ValidationResult, Violation};
use super::normalize::join_path;
use super::registry::{FieldType, TypeRegistry};
use super::spec::{FieldSpec, SchemaNode, SchemaTree};
use crate::value::{Document, Value};

/// Validate a document, collecting every violation.
pub fn validate_document(tree: &SchemaTree, doc: &Document) -> ValidationResult {
    let mut result = ValidationResult::success();
    validate_tree(tree, doc, "", &mut result);
    result
}

fn validate_tree(tree: &SchemaTree, doc: &Document, prefix: &str, result: &mut ValidationResult) {
    for (name, node) in tree.iter() {
        let path = join_path(prefix, name);
        validate_node(node, doc.get(name), &path, result);
    }
}

fn validate_node(node: &SchemaNode, value: Option<&Value>, path: &str, result: &mut ValidationResult) {
    match node {
        SchemaNode::Nested(sub) => match value {
            None | Some(Value::Null) => report_missing_nested(sub, path, result),
            Some(Value::Map(inner)) => validate_tree(sub, inner, path, result),
            Some(_) => {
                result.add_error(Violation::new(path, format!("{path} must be an object")));
            }
        },
        SchemaNode::Field(spec) => validate_field(spec, value, path, result),
    }
}

/// An absent sub-document only reports its own required leaves.
fn report_missing_nested(tree: &SchemaTree, prefix: &str, result: &mut ValidationResult) {
    for (name, node) in tree.iter() {
        if let SchemaNode::Field(spec) = node {
            if spec.required {
                let path = join_path(prefix, name);
                result.add_error(Violation::new(&path, format!("{path} is required")));
            }
        }
    }
}

fn validate_field(spec: &FieldSpec, value: Option<&Value>, path: &str, result: &mut ValidationResult) {
    match value {
        None | Some(Value::Null) => {
            if spec.required {
                result.add_error(Violation::new(path, format!("{path} is required")));
            }
        }
        Some(value) => check_value(spec, value, path, result),
    }
}

/// Type, enum, constraint and custom checks for a present value.
fn check_value(spec: &FieldSpec, value: &Value, path: &str, result: &mut ValidationResult) {
    if spec.field_type != FieldType::Mixed && !TypeRegistry::check(spec.field_type, value) {
        result.add_error(Violation::new(
            path,
            format!("{path} must be of type {}", spec.field_type),
        ));
        return;
    }

    if let Some(allowed) = &spec.enum_values {
        if !allowed.iter().any(|candidate| candidate.loosely_equals(value)) {
            let list = allowed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            result.add_error(Violation::new(path, format!("{path} must be one of: {list}")));
        }
    }

    match (spec.field_type, value) {
        (FieldType::String, Value::String(s)) => check_string(spec, s, path, result),
        (FieldType::Number, _) => check_number(spec, value, path, result),
        (FieldType::Array, Value::Array(items)) => {
            if let Some(item_spec) = &spec.items {
                for (i, item) in items.iter().enumerate() {
                    check_value(item_spec, item, &format!("{path}[{i}]"), result);
                }
            }
        }
        _ => {}
    }

    if let Some(validator) = &spec.validator {
        match validator.check(value) {
            Ok(true) => {}
            Ok(false) => {
                let message = spec
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("{path} failed custom validation"));
                result.add_error(Violation::new(path, message));
            }
            Err(message) => result.add_error(Violation::new(path, message)),
        }
    }
}

fn check_string(spec: &FieldSpec, s: &str, path: &str, result: &mut ValidationResult) {
    let len = s.chars().count();

    if let Some(min) = spec.min_length {
        if len < min {
            result.add_error(Violation::new(
                path,
                format!("{path} must be at least {min} characters long"),
            ));
        }
    }
    if let Some(max) = spec.max_length {
        if len > max {
            result.add_error(Violation::new(
                path,
                format!("{path} must be at most {max} characters long"),
            ));
        }
    }
    if let Some(re) = &spec.pattern {
        if !re.is_match(s) {
            result.add_error(Violation::new(
                path,
                format!("{path} must match pattern {}", re.as_str()),
            ));
        }
    }
}

fn check_number(spec: &FieldSpec, value: &Value, path: &str, result: &mut ValidationResult) {
    if let Some(min) = spec.min {
        if value.compare_number(min) == Some(Ordering::Less) {
            result.add_error(Violation::new(path, format!("{path} must be at least {min}")));
        }
    }
    if let Some(max) = spec.max {
        if value.compare_number(max) == Some(Ordering::Greater) {
            result.add_error(Violation::new(path, format!("{path} must be at most {max}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::declaration::{FieldDeclaration, FieldOptions, SchemaDeclaration};
    use crate::schema::normalize::build_tree;
    use crate::schema::spec::Validator;

    fn check(decl: SchemaDeclaration, fields: &[(&str, Value)]) -> ValidationResult {
        let tree = build_tree(decl).unwrap();
        let doc: Document = fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        validate_document(&tree, &doc)
    }

    fn messages(result: &ValidationResult) -> Vec<&str> {
        result.errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_required_missing() {
        let result = check(
            SchemaDeclaration::new().field("name", FieldOptions::new("String").required()),
            &[],
        );
        assert!(!result.valid);
        assert_eq!(result.errors, vec![Violation::new("name", "name is required")]);
    }

    #[test]
    fn test_required_null_counts_as_missing() {
        let result = check(
            SchemaDeclaration::new().field("name", FieldOptions::new("String").required()),
            &[("name", Value::Null)],
        );
        assert_eq!(messages(&result), vec!["name is required"]);
    }

    #[test]
    fn test_optional_missing_is_valid() {
        let result = check(
            SchemaDeclaration::new()
                .field("age", FieldOptions::new("Number").min(18.0))
                .field("nick", FieldType::String),
            &[("nick", Value::Null)],
        );
        assert!(result.valid);
    }

    #[test]
    fn test_type_mismatch_stops_chain() {
        let result = check(
            SchemaDeclaration::new().field(
                "age",
                FieldOptions::new("Number")
                    .min(18.0)
                    .one_of([20, 30])
                    .validator(Validator::predicate(|_| false)),
            ),
            &[("age", Value::from("30"))],
        );
        assert_eq!(messages(&result), vec!["age must be of type Number"]);
    }

    #[test]
    fn test_number_bounds() {
        let decl = || SchemaDeclaration::new().field("age", FieldOptions::new("Number").min(18.0).max(100.0));
        assert_eq!(messages(&check(decl(), &[("age", Value::Int(15))])), vec!["age must be at least 18"]);
        assert_eq!(
            messages(&check(decl(), &[("age", Value::Float(100.5))])),
            vec!["age must be at most 100"]
        );
        assert!(check(decl(), &[("age", Value::Int(30))]).valid);
    }

    #[test]
    fn test_string_constraints_accumulate() {
        let result = check(
            SchemaDeclaration::new().field(
                "code",
                FieldOptions::new("String").min_length(3).pattern("^[0-9]+$"),
            ),
            &[("code", Value::from("ab"))],
        );
        assert_eq!(
            messages(&result),
            vec!["code must be at least 3 characters long", "code must match pattern ^[0-9]+$"]
        );
    }

    #[test]
    fn test_max_length_counts_characters() {
        let decl = || SchemaDeclaration::new().field("s", FieldOptions::new("String").max_length(3));
        assert!(check(decl(), &[("s", Value::from("äöü"))]).valid);
        assert_eq!(
            messages(&check(decl(), &[("s", Value::from("abcd"))])),
            vec!["s must be at most 3 characters long"]
        );
    }

    #[test]
    fn test_enum_membership() {
        let decl = || SchemaDeclaration::new().field("status", FieldOptions::new("String").one_of(["open", "done"]));
        assert!(check(decl(), &[("status", Value::from("open"))]).valid);
        assert_eq!(
            messages(&check(decl(), &[("status", Value::from("later"))])),
            vec!["status must be one of: open, done"]
        );
    }

    #[test]
    fn test_enum_on_mixed_compares_numbers_loosely() {
        let decl = || SchemaDeclaration::new().field("level", FieldOptions::default().one_of([1, 2]));
        assert!(check(decl(), &[("level", Value::Float(2.0))]).valid);
        assert!(!check(decl(), &[("level", Value::from("2"))]).valid);
    }

    #[test]
    fn test_enum_compares_large_integers_exactly() {
        let result = check(
            SchemaDeclaration::new()
                .field("id", FieldOptions::new("Number").one_of([Value::Int(9_007_199_254_740_993)])),
            &[("id", Value::Int(9_007_199_254_740_992))],
        );
        assert_eq!(messages(&result), vec!["id must be one of: 9007199254740993"]);
    }

    #[test]
    fn test_number_bounds_keep_integer_precision() {
        let result = check(
            SchemaDeclaration::new()
                .field("n", FieldOptions::new("Number").max(9_007_199_254_740_992.0)),
            &[("n", Value::Int(9_007_199_254_740_993))],
        );
        assert_eq!(messages(&result), vec!["n must be at most 9007199254740992"]);
    }

    #[test]
    fn test_array_elements_checked_per_index() {
        let result = check(
            SchemaDeclaration::new().field(
                "tags",
                FieldDeclaration::list_of(FieldOptions::new("String").min_length(3)),
            ),
            &[("tags", Value::Array(vec!["rust".into(), Value::Int(1), "go".into()]))],
        );
        assert_eq!(
            messages(&result),
            vec!["tags[1] must be of type String", "tags[2] must be at least 3 characters long"]
        );
        assert_eq!(result.errors[1].field, "tags[2]");
    }

    #[test]
    fn test_nested_arrays_recurse() {
        let result = check(
            SchemaDeclaration::new().field(
                "grid",
                FieldDeclaration::list_of(FieldDeclaration::list_of(
                    FieldOptions::new("Number").max(9.0),
                )),
            ),
            &[("grid", Value::Array(vec![Value::Array(vec![Value::Int(1), Value::Int(10)])]))],
        );
        assert_eq!(messages(&result), vec!["grid[0][1] must be at most 9"]);
    }

    #[test]
    fn test_custom_validator_false_uses_message() {
        let decl = |msg: Option<&str>| {
            let mut opts = FieldOptions::new("String")
                .validator(Validator::predicate(|v| v.as_str().is_some_and(|s| s.contains('@'))));
            if let Some(m) = msg {
                opts = opts.message(m);
            }
            SchemaDeclaration::new().field("email", opts)
        };
        assert_eq!(
            messages(&check(decl(None), &[("email", Value::from("nope"))])),
            vec!["email failed custom validation"]
        );
        assert_eq!(
            messages(&check(decl(Some("bad email")), &[("email", Value::from("nope"))])),
            vec!["bad email"]
        );
        assert!(check(decl(None), &[("email", Value::from("a@b"))]).valid);
    }

    #[test]
    fn test_custom_validator_error_becomes_violation() {
        let result = check(
            SchemaDeclaration::new()
                .field(
                    "a",
                    FieldOptions::new("String").validator(Validator::new(|_| Err("lookup failed".into()))),
                )
                .field("b", FieldOptions::new("String").required()),
            &[("a", Value::from("x"))],
        );
        assert_eq!(messages(&result), vec!["lookup failed", "b is required"]);
    }

    #[test]
    fn test_nested_absent_reports_required_children_only() {
        let decl = || {
            SchemaDeclaration::new().field(
                "address",
                SchemaDeclaration::new()
                    .field("street", FieldOptions::new("String").required())
                    .field("zip", FieldOptions::new("String").min_length(5))
                    .field("city", FieldOptions::new("String").required())
                    .field("geo", SchemaDeclaration::new().field("lat", FieldOptions::new("Number").required())),
            )
        };
        for doc in [vec![], vec![("address", Value::Null)]] {
            let result = check(decl(), &doc);
            assert_eq!(messages(&result), vec!["address.street is required", "address.city is required"]);
        }
    }

    #[test]
    fn test_nested_non_object() {
        let result = check(
            SchemaDeclaration::new()
                .field("address", SchemaDeclaration::new().field("street", FieldOptions::new("String").required())),
            &[("address", Value::Array(vec![]))],
        );
        assert_eq!(result.errors, vec![Violation::new("address", "address must be an object")]);
    }

    #[test]
    fn test_nested_present_recurses() {
        let mut inner = Document::new();
        inner.insert("street".into(), Value::Int(5));
        let result = check(
            SchemaDeclaration::new()
                .field("address", SchemaDeclaration::new().field("street", FieldOptions::new("String").required())),
            &[("address", Value::Map(inner))],
        );
        assert_eq!(result.errors, vec![Violation::new("address.street", "address.street must be of type String")]);
    }

    #[test]
    fn test_errors_follow_declaration_order() {
        let result = check(
            SchemaDeclaration::new()
                .field("zeta", FieldOptions::new("String").required())
                .field("alpha", FieldOptions::new("Number").required()),
            &[],
        );
        assert_eq!(messages(&result), vec!["zeta is required", "alpha is required"]);
    }
}
