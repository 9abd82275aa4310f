//! Template functions (global functions available in templates)
//!
//! Each function is a thin wrapper over `timeconv_core::convert`; core
//! errors surface as `InvalidOperation` errors carrying the core message.

use minijinja::value::Kwargs;
use minijinja::{Error, ErrorKind, Value};
use timeconv_core::{CoreError, TimeQuery, Timestamp, convert};

/// Name and call shape of every function, as listed by `timeconv functions`
pub const FUNCTION_SIGNATURES: &[(&str, &str)] = &[
    ("timezone", "timezone(timestamp, zone) -> RFC3339 timestamp in zone"),
    ("format", "format(timestamp, layout) -> timestamp rendered with a reference layout"),
    ("parse", "parse(layout, input) -> RFC3339 timestamp; layout may be none"),
    (
        "parse_in_location",
        "parse_in_location(layout, input, zone) -> RFC3339 timestamp; zone-less input is read in zone",
    ),
    ("zone_name", "zone_name(timestamp) -> zone abbreviation"),
    ("zone_offset", "zone_offset(timestamp) -> seconds east of UTC"),
    ("aws_at", "aws_at(timestamp) -> at(2006-01-02T15:04:05)"),
    ("aws_cron", "aws_cron(expression) -> normalized cron(...)"),
    ("unix_cron", "unix_cron(expression) -> five-field cron(...)"),
    ("now", "now() -> current RFC3339 timestamp in UTC"),
    (
        "time",
        "time(input=, input_format=, input_location=, output_format=, output_location=) -> time report",
    ),
];

/// Core errors keep the core message as detail and ride along as the source
pub(crate) fn core_error(err: CoreError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

/// True when a render error came out of a time conversion
pub(crate) fn is_core_error(err: &Error) -> bool {
    std::error::Error::source(err).is_some_and(|source| source.is::<CoreError>())
}

/// Convert a timestamp to another zone
///
/// Usage: {{ timezone("2024-08-31T01:23:45Z", "Asia/Tokyo") }}
pub fn timezone(timestamp: String, zone: String) -> Result<String, Error> {
    convert::timezone(&timestamp, &zone).map_err(core_error)
}

/// Render a timestamp with a reference layout
///
/// Usage: {{ format("2024-08-31T01:23:45Z", "2006-01-02 15:04:05") }}
pub fn format(timestamp: String, layout: String) -> Result<String, Error> {
    convert::format(&timestamp, &layout).map_err(core_error)
}

/// Parse a time string into RFC3339
///
/// Usage: {{ parse("ANSIC", "Wed Aug  7 01:23:45 2024") }} or {{ parse(none, ts) }}
pub fn parse(layout: Option<String>, input: String) -> Result<String, Error> {
    convert::parse(layout.as_deref(), &input).map_err(core_error)
}

/// Parse a time string, reading zone-less input in the given zone
///
/// Usage: {{ parse_in_location("2006-01-02 15:04", "2024-08-31 01:23", "Asia/Tokyo") }}
pub fn parse_in_location(layout: Option<String>, input: String, zone: String) -> Result<String, Error> {
    convert::parse_in_location(layout.as_deref(), &input, &zone).map_err(core_error)
}

pub fn zone_name(timestamp: String) -> Result<String, Error> {
    convert::zone_name(&timestamp).map_err(core_error)
}

pub fn zone_offset(timestamp: String) -> Result<i32, Error> {
    convert::zone_offset(&timestamp).map_err(core_error)
}

pub fn aws_at(timestamp: String) -> Result<String, Error> {
    convert::aws_at(&timestamp).map_err(core_error)
}

/// Validate an AWS cron expression
///
/// Usage: {{ aws_cron("0 12 * * ? *") }} → cron(0 12 * * ? *)
pub fn aws_cron(expression: String) -> Result<String, Error> {
    convert::aws_cron(&expression).map_err(core_error)
}

/// Translate an AWS cron expression to Unix cron
///
/// Usage: {{ unix_cron("0 12 * * ? *") }} → cron(0 12 * * *)
pub fn unix_cron(expression: String) -> Result<String, Error> {
    convert::unix_cron(&expression).map_err(core_error)
}

/// Current time as RFC3339 in UTC
pub fn now() -> String {
    Timestamp::now().to_rfc3339()
}

/// Run a time query and return its report as a map
///
/// Usage: {{ time(input="2023-02-15T16:35:00+09:00", output_location="UTC").aws_cron }}
pub fn time(kwargs: Kwargs) -> Result<Value, Error> {
    let query = TimeQuery {
        input: kwargs.get("input")?,
        input_format: kwargs.get("input_format")?,
        input_location: kwargs.get("input_location")?,
        output_format: kwargs.get("output_format")?,
        output_location: kwargs.get("output_location")?,
    };
    kwargs.assert_all_used()?;

    let report = query.evaluate().map_err(core_error)?;
    Ok(Value::from_serialize(&report))
}

/// Filter form of [`parse`]: the piped value is the input
///
/// Usage: {{ "Wed Aug  7 01:23:45 2024" | parse("ANSIC") }}
pub fn parse_filter(input: String, layout: Option<String>) -> Result<String, Error> {
    parse(layout, input)
}

/// Filter form of [`parse_in_location`]
///
/// Usage: {{ "2024-08-31 01:23:45" | parse_in_location("Asia/Tokyo", "DateTime") }}
pub fn parse_in_location_filter(input: String, zone: String, layout: Option<String>) -> Result<String, Error> {
    parse_in_location(layout, input, zone)
}
