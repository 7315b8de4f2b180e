//! List command implementation.

use std::process::ExitCode;

use color_eyre::eyre::{Result, WrapErr};
use docshape_core::config::loader::ConfigError;
use docshape_core::config::types::ResolvedConfig;
use docshape_core::schema::SchemaRepository;

pub fn run(config: Result<ResolvedConfig, ConfigError>) -> Result<ExitCode> {
    let rc = config.wrap_err("failed to load config")?;
    let repo = SchemaRepository::new(&rc.schemas_dir)
        .wrap_err_with(|| format!("failed to scan {}", rc.schemas_dir.display()))?;

    let schemas = repo.list_all();
    if schemas.is_empty() {
        println!("(no schemas found)");
        return Ok(ExitCode::SUCCESS);
    }

    for info in schemas {
        println!("{}", info.name);
    }
    println!("-- {} schemas --", schemas.len());
    Ok(ExitCode::SUCCESS)
}
