//! AWS EventBridge and Unix cron expressions
//!
//! An AWS expression has six fields (`minutes hours day-of-month month
//! day-of-week year`) and exactly one of the two day fields must be `?`.
//! A Unix expression drops the year and has no `?`, so the translation
//! only goes one way. `L`, `W` and `#` are carried over as written.

mod field;
mod parser;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use field::{Field, FieldKind, Item, StepStart, Value};
pub use parser::parse_field;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("expected 6 fields, found {found}: {expression:?}")]
    FieldCount { expression: String, found: usize },

    #[error("invalid {field} field {text:?}: {reason}")]
    Field {
        field: &'static str,
        text: String,
        reason: String,
    },

    #[error("exactly one of day-of-month and day-of-week must be '?'")]
    DayConflict,
}

/// A validated six-field AWS cron expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCron {
    pub minute: Field,
    pub hour: Field,
    pub day_of_month: Field,
    pub month: Field,
    pub day_of_week: Field,
    pub year: Field,
}

impl AwsCron {
    /// Parse an expression, with or without its `cron(...)` wrapper
    pub fn parse(expression: &str) -> Result<Self, CronError> {
        let expression = unwrap_cron(expression);
        let parts: Vec<&str> = expression.split_whitespace().collect();
        if parts.len() != FieldKind::ALL.len() {
            return Err(CronError::FieldCount {
                expression: expression.to_string(),
                found: parts.len(),
            });
        }

        let field = |idx: usize| parse_field(FieldKind::ALL[idx], parts[idx]);
        let cron = AwsCron {
            minute: field(0)?,
            hour: field(1)?,
            day_of_month: field(2)?,
            month: field(3)?,
            day_of_week: field(4)?,
            year: field(5)?,
        };

        if cron.day_of_month.is_no_value() == cron.day_of_week.is_no_value() {
            return Err(CronError::DayConflict);
        }

        tracing::trace!(expression, normalized = %cron, "parsed cron expression");
        Ok(cron)
    }

    /// Translate to the five-field Unix dialect
    pub fn to_unix(&self) -> UnixCron {
        UnixCron {
            fields: [
                self.minute.to_unix(FieldKind::Minute),
                self.hour.to_unix(FieldKind::Hour),
                self.day_of_month.to_unix(FieldKind::DayOfMonth),
                self.month.to_unix(FieldKind::Month),
                self.day_of_week.to_unix(FieldKind::DayOfWeek),
            ],
        }
    }
}

impl fmt::Display for AwsCron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week, self.year
        )
    }
}

impl FromStr for AwsCron {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A five-field Unix cron expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnixCron {
    fields: [String; 5],
}

impl UnixCron {
    pub fn fields(&self) -> &[String; 5] {
        &self.fields
    }
}

impl fmt::Display for UnixCron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.join(" "))
    }
}

fn unwrap_cron(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed
        .strip_prefix("cron(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed)
}
