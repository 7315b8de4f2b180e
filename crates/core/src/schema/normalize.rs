//! Normalization of raw declarations into the canonical tree.

use regex::Regex;

use super::declaration::{FieldDeclaration, FieldOptions, SchemaDeclaration, TypeRef};
use super::errors::{SchemaError, SchemaResult};
use super::registry::{FieldType, TypeRegistry};
use super::spec::{DefaultValue, FieldSpec, SchemaNode, SchemaTree, promote_date};

/// Build the canonical tree for a declaration.
///
/// Fields are processed in declaration order and the first problem aborts
/// the build.
pub fn build_tree(decl: SchemaDeclaration) -> SchemaResult<SchemaTree> {
    build_level(decl, "")
}

/// Join a parent path and a field name with `.`.
pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
}

fn build_level(decl: SchemaDeclaration, prefix: &str) -> SchemaResult<SchemaTree> {
    let mut tree = SchemaTree::new();
    for (name, field) in decl.fields {
        let path = join_path(prefix, &name);
        let node = build_node(field, &path)?;
        if !tree.insert(name, node) {
            return Err(SchemaError::DuplicateField { field: path });
        }
    }
    Ok(tree)
}

fn build_node(decl: FieldDeclaration, path: &str) -> SchemaResult<SchemaNode> {
    let node = match decl {
        FieldDeclaration::List(items) => SchemaNode::Field(array_literal(items, path)?),
        FieldDeclaration::Nested(sub) => SchemaNode::Nested(build_level(sub, path)?),
        FieldDeclaration::Type(ty) => SchemaNode::Field(FieldSpec::new(resolve_type(&ty, path)?)),
        FieldDeclaration::Options(opts) => SchemaNode::Field(build_field(opts, path)?),
    };
    Ok(node)
}

fn resolve_type(ty: &TypeRef, path: &str) -> SchemaResult<FieldType> {
    match ty {
        TypeRef::Type(ty) => Ok(*ty),
        TypeRef::Tag(tag) => TypeRegistry::resolve(tag).ok_or_else(|| SchemaError::InvalidType {
            field: path.to_string(),
            type_name: tag.clone(),
        }),
    }
}

fn array_literal(items: Vec<FieldDeclaration>, path: &str) -> SchemaResult<FieldSpec> {
    let element = element_spec(items.into_iter().next(), path)?;
    Ok(FieldSpec::array_of(element))
}

/// Element spec for an array. Bare tags become `{type: tag}`; missing or
/// sub-document elements are `Mixed`.
fn element_spec(decl: Option<FieldDeclaration>, path: &str) -> SchemaResult<FieldSpec> {
    match decl {
        None | Some(FieldDeclaration::Nested(_)) => Ok(FieldSpec::new(FieldType::Mixed)),
        Some(FieldDeclaration::Type(ty)) => Ok(FieldSpec::new(resolve_type(&ty, path)?)),
        Some(FieldDeclaration::Options(opts)) => build_field(opts, path),
        Some(FieldDeclaration::List(inner)) => array_literal(inner, path),
    }
}

fn build_field(opts: FieldOptions, path: &str) -> SchemaResult<FieldSpec> {
    let field_type = match &opts.field_type {
        Some(ty) => resolve_type(ty, path)?,
        None if opts.items.is_some() => FieldType::Array,
        None => FieldType::Mixed,
    };

    let items = match opts.items {
        Some(_) if field_type != FieldType::Array => {
            return Err(invalid_option(path, "arrayType", "only allowed on Array fields"));
        }
        Some(decl) => Some(Box::new(element_spec(Some(*decl), path)?)),
        None => None,
    };

    let pattern = opts
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|source| SchemaError::InvalidPattern { field: path.to_string(), source })?;

    if let (Some(min), Some(max)) = (opts.min, opts.max) {
        if min > max {
            return Err(invalid_option(path, "min", "must not exceed max"));
        }
    }
    if let (Some(min), Some(max)) = (opts.min_length, opts.max_length) {
        if min > max {
            return Err(invalid_option(path, "minLength", "must not exceed maxLength"));
        }
    }

    let default = match opts.default {
        Some(DefaultValue::Static(value)) => {
            let value = promote_date(field_type, value);
            if !value.is_null() && !TypeRegistry::check(field_type, &value) {
                return Err(SchemaError::InvalidDefault {
                    field: path.to_string(),
                    expected: field_type,
                    actual: value.kind(),
                });
            }
            Some(DefaultValue::Static(value))
        }
        other => other,
    };

    Ok(FieldSpec {
        field_type,
        required: opts.required,
        default,
        validator: opts.validator,
        message: opts.message,
        enum_values: opts.enum_values,
        min: opts.min,
        max: opts.max,
        min_length: opts.min_length,
        max_length: opts.max_length,
        pattern,
        items,
    })
}

fn invalid_option(path: &str, option: &str, message: &str) -> SchemaError {
    SchemaError::InvalidOption {
        field: path.to_string(),
        option: option.to_string(),
        message: message.to_string(),
    }
}
