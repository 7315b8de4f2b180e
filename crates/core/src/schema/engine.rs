//! The schema engine: a compiled, immutable schema tree and the operations
//! that walk it.

use std::path::Path;

use super::declaration::SchemaDeclaration;
use super::defaults::apply_defaults;
use super::errors::{SchemaError, SchemaResult, ValidationFailure, ValidationResult};
use super::loader::{ValidatorSet, declaration_from_str};
use super::normalize::build_tree;
use super::spec::SchemaTree;
use super::validation::validate_document;
use crate::value::Document;

/// A compiled schema.
///
/// Built once from a declaration; `apply_defaults` and `validate` may then be
/// called from any number of threads.
#[derive(Debug, Clone)]
pub struct Schema {
    tree: SchemaTree,
}

impl Schema {
    /// Normalize a declaration into a schema, failing on the first malformed field.
    pub fn new(decl: SchemaDeclaration) -> SchemaResult<Self> {
        let tree = build_tree(decl)?;
        tracing::debug!(fields = tree.len(), "compiled schema");
        Ok(Self { tree })
    }

    /// Build a schema from YAML or JSON declaration text.
    pub fn from_str_with(src: &str, validators: &ValidatorSet) -> SchemaResult<Self> {
        Self::new(declaration_from_str(src, validators)?)
    }

    /// Build a schema from a YAML or JSON file.
    pub fn from_file(path: &Path, validators: &ValidatorSet) -> SchemaResult<Self> {
        let src = std::fs::read_to_string(path)
            .map_err(|source| SchemaError::Io { path: path.to_path_buf(), source })?;
        Self::from_str_with(&src, validators)
    }

    /// The canonical tree.
    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// Copy of `doc` with missing fields filled from their defaults.
    pub fn apply_defaults(&self, doc: &Document) -> Document {
        apply_defaults(&self.tree, doc)
    }

    /// Check `doc` and report every violation.
    pub fn validate(&self, doc: &Document) -> ValidationResult {
        validate_document(&self.tree, doc)
    }

    /// Apply defaults, then validate; the prepared document is returned only
    /// if it is valid.
    pub fn prepare(&self, doc: &Document) -> Result<Document, ValidationFailure> {
        let prepared = self.apply_defaults(doc);
        let result = self.validate(&prepared);
        if !result.valid {
            tracing::debug!(violations = result.errors.len(), "document rejected");
        }
        result.into_result().map(|()| prepared)
    }
}
