//! Timeconv Core - time zone conversion and schedule expressions
//!
//! This crate provides the conversions the rest of timeconv is built on:
//! - `layout`: reference-time layouts (`2006-01-02T15:04:05Z07:00`) for formatting and parsing
//! - `zone`: UTC, the system zone and the IANA database
//! - `Timestamp`: an instant with the zone it is shown in
//! - `cron`: AWS EventBridge cron validation and translation to Unix cron
//! - `TimeQuery`: one report bundling several conversions
//! - `convert`: string-in, string-out wrappers over all of the above

pub mod convert;
pub mod cron;
pub mod error;
pub mod layout;
pub mod query;
pub mod timestamp;
pub mod zone;

pub use cron::{AwsCron, CronError, UnixCron};
pub use error::{CoreError, Result};
pub use layout::LayoutError;
pub use query::{TimeQuery, TimeReport};
pub use timestamp::Timestamp;
pub use zone::Location;
