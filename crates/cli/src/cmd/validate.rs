//! Validate command implementation.

use std::process::ExitCode;

use color_eyre::eyre::Result;
use docshape_core::config::loader::ConfigError;
use docshape_core::config::types::ResolvedConfig;
use docshape_core::schema::{Schema, ValidationResult};
use docshape_core::value::Document;
use serde::Serialize;

use super::{load_schema, read_documents};
use crate::ValidateArgs;

/// Outcome for one document, labelled by file and position.
#[derive(Debug, Serialize)]
struct DocumentReport {
    source: String,
    valid: bool,
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    field: String,
    message: String,
}

impl DocumentReport {
    fn new(source: String, result: ValidationResult) -> Self {
        let errors = result
            .errors
            .into_iter()
            .map(|v| ErrorEntry { field: v.field, message: v.message })
            .collect();
        Self { source, valid: result.valid, errors }
    }
}

pub fn run(config: Result<ResolvedConfig, ConfigError>, args: &ValidateArgs) -> Result<ExitCode> {
    let schema = load_schema(config, &args.schema)?;

    let mut reports = Vec::new();
    for path in &args.paths {
        let docs = read_documents(path)?;
        let multi = docs.len() > 1;
        for (i, doc) in docs.iter().enumerate() {
            let source = if multi {
                format!("{}[{i}]", path.display())
            } else {
                path.display().to_string()
            };
            reports.push(DocumentReport::new(source, check(&schema, doc, args.with_defaults)));
        }
    }

    let invalid = reports.iter().filter(|r| !r.valid).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
        println!();
        println!("{} documents checked, {} invalid", reports.len(), invalid);
    }

    Ok(if invalid == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn check(schema: &Schema, doc: &Document, with_defaults: bool) -> ValidationResult {
    if with_defaults {
        schema.validate(&schema.apply_defaults(doc))
    } else {
        schema.validate(doc)
    }
}

fn print_reports(reports: &[DocumentReport]) {
    for report in reports {
        if report.valid {
            println!("OK   {}", report.source);
            continue;
        }
        println!("FAIL {}", report.source);
        for err in &report.errors {
            println!("  - {}: {}", err.field, err.message);
        }
    }
}
