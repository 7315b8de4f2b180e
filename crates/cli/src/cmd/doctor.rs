use std::path::Path;
use std::process::ExitCode;

use docshape_core::config::loader::{ConfigError, default_config_path};
use docshape_core::config::types::ResolvedConfig;
use docshape_core::schema::discover_schemas;

pub fn run(cfg_path: Option<&Path>, config: Result<ResolvedConfig, ConfigError>) -> ExitCode {
    match config {
        Ok(rc) => {
            println!("OK   docshape doctor");
            println!(
                "path: {}",
                cfg_path.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("schemas_dir: {}", rc.schemas_dir.display());
            match discover_schemas(&rc.schemas_dir) {
                Ok(found) => println!("schemas: {}", found.len()),
                Err(e) => println!("schemas: unreadable ({e})"),
            }
            println!("logging.level: {}", rc.logging.level);
            if let Some(ref file) = rc.logging.file {
                println!("logging.file: {}", file.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("FAIL docshape doctor");
            println!("{e}");
            if cfg_path.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            ExitCode::FAILURE
        }
    }
}
