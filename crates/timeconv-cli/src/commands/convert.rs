//! Single conversion commands
//!
//! One function per conversion; each prints its result on a line of its own.

use timeconv_core::convert;

use crate::error::{CliError, Result};

pub fn timezone(timestamp: &str, zone: &str) -> Result<()> {
    print(convert::timezone(timestamp, zone)?)
}

pub fn format(timestamp: &str, layout: &str) -> Result<()> {
    print(convert::format(timestamp, layout)?)
}

pub fn parse(layout: Option<&str>, input: &str) -> Result<()> {
    print(convert::parse(layout, input).map_err(with_layout_help)?)
}

pub fn parse_in_location(layout: Option<&str>, input: &str, zone: &str) -> Result<()> {
    print(convert::parse_in_location(layout, input, zone).map_err(with_layout_help)?)
}

pub fn zone_name(timestamp: &str) -> Result<()> {
    print(convert::zone_name(timestamp)?)
}

pub fn zone_offset(timestamp: &str) -> Result<()> {
    print(convert::zone_offset(timestamp)?)
}

pub fn aws_at(timestamp: &str) -> Result<()> {
    print(convert::aws_at(timestamp)?)
}

pub fn aws_cron(expression: &str) -> Result<()> {
    print(convert::aws_cron(expression)?)
}

pub fn unix_cron(expression: &str) -> Result<()> {
    print(convert::unix_cron(expression)?)
}

fn print(value: impl std::fmt::Display) -> Result<()> {
    println!("{value}");
    Ok(())
}

fn with_layout_help(err: timeconv_core::CoreError) -> CliError {
    match err {
        err @ timeconv_core::CoreError::Parse { .. } => CliError::input_with_help(
            err.to_string(),
            format!(
                "Named layouts: {}",
                timeconv_core::layout::layout_names().join(", ")
            ),
        ),
        other => other.into(),
    }
}
