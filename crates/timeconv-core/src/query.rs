//! Time query
//!
//! Bundles the conversions into a single report: parse an input time in
//! one location, show it in another, and derive the schedule expressions
//! that fire at that moment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::layout::RFC3339;
use crate::timestamp::Timestamp;
use crate::zone::Location;

const DEFAULT_LOCATION: &str = "Local";

/// Query configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeQuery {
    /// Time to convert; the current time when absent or empty
    pub input: Option<String>,
    /// Layout of `input` (RFC3339 by default)
    pub input_format: Option<String>,
    /// Location for zone-less input (`Local` by default)
    pub input_location: Option<String>,
    /// Layout of `output` (RFC3339 by default)
    pub output_format: Option<String>,
    /// Location the output is shown in (`Local` by default)
    pub output_location: Option<String>,
}

/// Everything a query computes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeReport {
    pub input: Option<String>,
    pub input_format: String,
    pub input_location: String,
    pub output: String,
    pub output_format: String,
    pub output_location: String,
    /// One-shot AWS cron expression in the output location
    pub aws_cron: String,
    /// Deprecated alias of `aws_cron`
    pub cron: String,
    /// EventBridge Scheduler `at(...)` expression in UTC
    pub aws_at: String,
    /// Seconds since the Unix epoch
    pub unix: i64,
}

impl TimeQuery {
    /// Load from a file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `key=value` overrides; `key=null` clears a field
    pub fn apply_overrides(&mut self, set_args: &[String]) -> Result<()> {
        for arg in set_args {
            let (key, val) = arg
                .split_once('=')
                .ok_or_else(|| CoreError::InvalidOverride { arg: arg.clone() })?;

            let slot = match key.trim() {
                "input" => &mut self.input,
                "input_format" => &mut self.input_format,
                "input_location" => &mut self.input_location,
                "output_format" => &mut self.output_format,
                "output_location" => &mut self.output_location,
                other => {
                    return Err(CoreError::UnknownQueryKey {
                        key: other.to_string(),
                    });
                }
            };

            *slot = if val == "null" {
                None
            } else {
                Some(val.to_string())
            };
        }
        Ok(())
    }

    /// Evaluate against the current time
    pub fn evaluate(&self) -> Result<TimeReport> {
        self.evaluate_at(Timestamp::now())
    }

    /// Evaluate with `now` standing in for the current time
    pub fn evaluate_at(&self, now: Timestamp) -> Result<TimeReport> {
        let input_format = non_empty(&self.input_format).unwrap_or(RFC3339);
        let input_location_name = non_empty(&self.input_location).unwrap_or(DEFAULT_LOCATION);
        let output_format = non_empty(&self.output_format).unwrap_or(RFC3339);
        let output_location_name = non_empty(&self.output_location).unwrap_or(DEFAULT_LOCATION);

        let input_location = Location::load(input_location_name)
            .map_err(|e| e.in_stage("Input location loading error"))?;

        let input = match non_empty(&self.input) {
            Some(text) => Timestamp::parse_in_location(Some(input_format), text, &input_location)
                .map_err(|e| e.in_stage("Input time string parsing error"))?,
            None => now.in_location(&input_location),
        };

        let output_location = Location::load(output_location_name)
            .map_err(|e| e.in_stage("Output location loading error"))?;
        let output = input.in_location(&output_location);

        tracing::debug!(
            input = %input,
            output = %output,
            input_location = %input_location,
            output_location = %output_location,
            "evaluated time query"
        );

        let aws_cron = output.aws_cron_once();
        Ok(TimeReport {
            input: self.input.clone(),
            input_format: input_format.to_string(),
            input_location: input_location_name.to_string(),
            output: output.format(output_format),
            output_format: output_format.to_string(),
            output_location: output_location_name.to_string(),
            cron: aws_cron.clone(),
            aws_cron,
            aws_at: output.in_location(&Location::Utc).aws_at(),
            unix: output.unix(),
        })
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
