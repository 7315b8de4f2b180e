//! Default application.

use super::spec::{SchemaNode, SchemaTree};
use crate::value::{Document, Value};

/// Return a copy of `doc` with declared defaults filled in.
///
/// Only keys absent from the document are filled; an explicit `null` counts
/// as present. Sub-documents that would end up empty are left out entirely.
pub fn apply_defaults(tree: &SchemaTree, doc: &Document) -> Document {
    let mut out = doc.clone();

    for (name, node) in tree.iter() {
        if out.contains_key(name) {
            continue;
        }

        match node {
            SchemaNode::Nested(sub) => {
                let nested = apply_defaults(sub, &Document::new());
                if !nested.is_empty() {
                    out.insert(name.to_string(), Value::Map(nested));
                }
            }
            SchemaNode::Field(spec) => {
                if let Some(default) = &spec.default {
                    out.insert(name.to_string(), default.resolve(spec.field_type));
                }
            }
        }
    }

    out
}
