//! Timeconv Engine - time conversions inside MiniJinja templates
//!
//! This crate registers every `timeconv_core` conversion with a MiniJinja
//! environment, both as a global function and as a filter:
//! - `timezone`, `format`, `parse`, `parse_in_location`
//! - `zone_name`, `zone_offset`, `aws_at`
//! - `aws_cron`, `unix_cron`
//! - `now()` and the `time(...)` query
//!
//! Render failures come back as [`TemplateError`] with the failing line and
//! a "did you mean" suggestion where one can be found.

pub mod engine;
pub mod error;
pub mod functions;
pub mod suggestions;

pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, TemplateError, TemplateErrorKind};
pub use functions::FUNCTION_SIGNATURES;
pub use suggestions::{AVAILABLE_FILTERS, AVAILABLE_FUNCTIONS};
