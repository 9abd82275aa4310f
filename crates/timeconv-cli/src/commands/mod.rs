//! CLI commands

pub mod convert;
pub mod functions;
pub mod query;
pub mod render;
