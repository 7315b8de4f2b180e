//! Schema file discovery and loading.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::engine::Schema;
use super::errors::{SchemaError, SchemaResult};
use super::loader::ValidatorSet;

/// Information about a discovered schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInfo {
    /// Schema name (filename without extension).
    pub name: String,

    /// Full path to the file.
    pub path: PathBuf,
}

/// Discover schema files in a directory.
///
/// Finds `.yaml`, `.yml` and `.json` files directly inside `root`.
/// Returns an empty list if the directory doesn't exist.
pub fn discover_schemas(root: &Path) -> SchemaResult<Vec<SchemaInfo>> {
    if !root.exists() {
        return Ok(vec![]);
    }

    let root = root
        .canonicalize()
        .map_err(|_| SchemaError::MissingDir(root.display().to_string()))?;

    let mut out = Vec::new();

    for entry in WalkDir::new(&root).max_depth(1) {
        let entry = entry.map_err(|e| SchemaError::WalkError(root.display().to_string(), e))?;

        let path = entry.path();
        if !path.is_file() || !is_schema_file(path) {
            continue;
        }

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();

        if !name.is_empty() {
            out.push(SchemaInfo { name, path: path.to_path_buf() });
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    tracing::debug!(dir = %root.display(), count = out.len(), "discovered schemas");
    Ok(out)
}

fn is_schema_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml" | "json"))
}

/// Repository of schema files in one directory.
pub struct SchemaRepository {
    /// Root directory.
    pub root: PathBuf,
    /// Discovered schema files.
    pub schemas: Vec<SchemaInfo>,
}

impl SchemaRepository {
    /// Create a repository from a directory.
    ///
    /// Returns an empty repository if the directory doesn't exist.
    pub fn new(root: &Path) -> SchemaResult<Self> {
        let schemas = discover_schemas(root)?;
        Ok(Self { root: root.to_path_buf(), schemas })
    }

    /// List all discovered schemas.
    pub fn list_all(&self) -> &[SchemaInfo] {
        &self.schemas
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.iter().any(|s| s.name == name)
    }

    /// Load and compile a schema by name.
    pub fn load(&self, name: &str, validators: &ValidatorSet) -> SchemaResult<Schema> {
        let info = self
            .schemas
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        Schema::from_file(&info.path, validators)
    }
}
