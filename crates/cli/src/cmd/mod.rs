pub mod defaults;
pub mod doctor;
pub mod list;
pub mod validate;

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use docshape_core::config::ConfigError;
use docshape_core::config::types::ResolvedConfig;
use docshape_core::schema::{Schema, SchemaRepository, ValidatorSet};
use docshape_core::value::{Document, Value};

use crate::SchemaArgs;

/// Resolve the schema named on the command line.
///
/// `--schema-file` is read directly and needs no config; `--schema` is
/// looked up in the active profile's `schemas_dir`. Named validators are
/// not available from the command line, so declarations using `validate`
/// fail to load here.
pub fn load_schema(
    config: Result<ResolvedConfig, ConfigError>,
    args: &SchemaArgs,
) -> Result<Schema> {
    let validators = ValidatorSet::new();

    if let Some(ref path) = args.schema_file {
        return Schema::from_file(path, &validators)
            .wrap_err_with(|| format!("failed to load schema {}", path.display()));
    }

    let Some(ref name) = args.schema else {
        bail!("either --schema or --schema-file is required");
    };

    let rc = config.wrap_err("failed to load config")?;
    let repo = SchemaRepository::new(&rc.schemas_dir)
        .wrap_err_with(|| format!("failed to scan {}", rc.schemas_dir.display()))?;
    repo.load(name, &validators).wrap_err_with(|| format!("failed to load schema '{name}'"))
}

/// Read a JSON file holding either one document or an array of documents.
pub fn read_documents(path: &Path) -> Result<Vec<Document>> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .wrap_err_with(|| format!("failed to parse JSON in {}", path.display()))?;

    let value =
        Value::from_json(&json).wrap_err_with(|| format!("invalid value in {}", path.display()))?;

    match value {
        Value::Map(doc) => Ok(vec![doc]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Map(doc) => Ok(doc),
                other => Err(eyre!(
                    "{}[{i}]: expected an object, got {}",
                    path.display(),
                    other.kind()
                )),
            })
            .collect(),
        other => bail!("{}: expected an object or array, got {}", path.display(), other.kind()),
    }
}
