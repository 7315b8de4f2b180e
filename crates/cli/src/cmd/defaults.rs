use std::process::ExitCode;

use color_eyre::eyre::{Result, bail};
use docshape_core::config::loader::ConfigError;
use docshape_core::config::types::ResolvedConfig;
use docshape_core::value::Value;

use super::{load_schema, read_documents};
use crate::DefaultsArgs;

pub fn run(config: Result<ResolvedConfig, ConfigError>, args: &DefaultsArgs) -> Result<ExitCode> {
    let schema = load_schema(config, &args.schema)?;
    let mut docs = read_documents(&args.path)?;

    let doc = match docs.len() {
        1 => docs.remove(0),
        n => bail!("{}: expected a single document, found {n}", args.path.display()),
    };

    let prepared = schema.apply_defaults(&doc);
    println!("{}", serde_json::to_string_pretty(&Value::Map(prepared).to_json())?);
    Ok(ExitCode::SUCCESS)
}
