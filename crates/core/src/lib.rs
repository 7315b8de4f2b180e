//! Schema-driven document validation and default application.
//!
//! - [`value`]: in-memory document values
//! - [`schema`]: declarations, the type registry and the schema engine
//! - [`config`]: configuration file loading for front ends

pub mod config;
pub mod schema;
pub mod value;
