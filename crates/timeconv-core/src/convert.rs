//! String-in, string-out conversions
//!
//! Each function takes plain strings and returns the rendered result, the
//! shape the template engine and the CLI both consume.

use tracing::debug;

use crate::cron::AwsCron;
use crate::error::Result;
use crate::layout::RFC3339;
use crate::timestamp::Timestamp;
use crate::zone::Location;

/// Re-zone an RFC3339 timestamp, keeping the instant
pub fn timezone(timestamp: &str, zone: &str) -> Result<String> {
    let ts = Timestamp::parse_rfc3339(timestamp)?;
    let location = Location::load(zone)?;
    let output = ts.in_location(&location).format(RFC3339);
    debug!(timestamp, zone, %output, "timezone");
    Ok(output)
}

/// Render an RFC3339 timestamp with a reference layout
pub fn format(timestamp: &str, layout: &str) -> Result<String> {
    let ts = Timestamp::parse_rfc3339(timestamp)?;
    Ok(ts.format(layout))
}

/// Parse `input` with `layout` (RFC3339 when `None`) and render it as RFC3339
pub fn parse(layout: Option<&str>, input: &str) -> Result<String> {
    Ok(Timestamp::parse(layout, input)?.to_rfc3339())
}

/// Like [`parse`], reading zone-less input as wall-clock time in `zone`
pub fn parse_in_location(layout: Option<&str>, input: &str, zone: &str) -> Result<String> {
    let location = Location::load(zone)?;
    Ok(Timestamp::parse_in_location(layout, input, &location)?.to_rfc3339())
}

pub fn zone_name(timestamp: &str) -> Result<String> {
    Ok(Timestamp::parse_rfc3339(timestamp)?.zone_name().to_string())
}

/// Seconds east of UTC
pub fn zone_offset(timestamp: &str) -> Result<i32> {
    Ok(Timestamp::parse_rfc3339(timestamp)?.zone_offset())
}

/// EventBridge Scheduler one-time expression in the timestamp's own zone
pub fn aws_at(timestamp: &str) -> Result<String> {
    Ok(Timestamp::parse_rfc3339(timestamp)?.aws_at())
}

/// Validate and normalize an AWS cron expression, wrapped in `cron(...)`
pub fn aws_cron(expression: &str) -> Result<String> {
    let cron = AwsCron::parse(expression)?;
    Ok(format!("cron({})", cron))
}

/// Translate an AWS cron expression to Unix cron, wrapped in `cron(...)`
pub fn unix_cron(expression: &str) -> Result<String> {
    let unix = AwsCron::parse(expression)?.to_unix();
    debug!(expression, %unix, "unix_cron");
    Ok(format!("cron({})", unix))
}
