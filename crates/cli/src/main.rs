mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use docshape_core::config::loader::ConfigLoader;
use docshape_core::config::types::LoggingConfig;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "docshape", version, about = "Validate documents against declared schemas")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// List schema names discovered under schemas_dir
    List,

    /// Validate JSON documents against a schema
    Validate(ValidateArgs),

    /// Print a document with schema defaults applied
    Defaults(DefaultsArgs),
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Schema name in the configured schemas directory
    #[arg(long, required_unless_present = "schema_file", conflicts_with = "schema_file")]
    pub schema: Option<String>,

    /// Path to a schema declaration (YAML or JSON)
    #[arg(long)]
    pub schema_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// JSON files holding a document or an array of documents
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Apply defaults before validating
    #[arg(long)]
    pub with_defaults: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DefaultsArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// JSON file holding a single document
    pub path: PathBuf,
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref(), cli.profile.as_deref());
    let default_logging = LoggingConfig::default();
    let log_cfg = config.as_ref().map(|rc| &rc.logging).unwrap_or(&default_logging);
    logging::init(log_cfg)?;

    match cli.command {
        Commands::Doctor => Ok(cmd::doctor::run(cli.config.as_deref(), config)),
        Commands::List => cmd::list::run(config),
        Commands::Validate(args) => cmd::validate::run(config, &args),
        Commands::Defaults(args) => cmd::defaults::run(config, &args),
    }
}
