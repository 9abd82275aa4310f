//! Zoned timestamps

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::layout::{self, LayoutError, Parsed, RFC3339};
use crate::zone::{self, Location};

/// An instant together with the zone it is shown in
///
/// The zone name is the abbreviation in effect (`JST`, `PDT`), `UTC`, or
/// empty for a bare offset no location claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    zone: String,
}

impl Timestamp {
    /// The current time in UTC
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// A UTC instant shown in UTC
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        Self {
            instant: utc.fixed_offset(),
            zone: "UTC".to_string(),
        }
    }

    /// Parse an RFC3339 timestamp
    pub fn parse_rfc3339(input: &str) -> Result<Self> {
        Self::parse(None, input)
    }

    /// Parse `input` with `layout` (RFC3339 when absent)
    ///
    /// Zone-less times are read as UTC. Zone abbreviations and offsets are
    /// named after the system zone when it uses them.
    pub fn parse(layout: Option<&str>, input: &str) -> Result<Self> {
        Self::parse_with_zones(layout, input, &Location::Utc, &Location::local())
    }

    /// Parse `input` with `layout`, interpreting zone-less times in `location`
    pub fn parse_in_location(layout: Option<&str>, input: &str, location: &Location) -> Result<Self> {
        Self::parse_with_zones(layout, input, location, location)
    }

    /// Parse reading wall-clock time in `wall` and resolving zones against `zones`
    fn parse_with_zones(
        layout: Option<&str>,
        input: &str,
        wall: &Location,
        zones: &Location,
    ) -> Result<Self> {
        let layout = layout::resolve(layout.filter(|l| !l.is_empty()).unwrap_or(RFC3339));
        tracing::trace!(layout, input, wall = %wall, zones = %zones, "parsing time");

        let wrap = |source: LayoutError| CoreError::Parse {
            layout: layout.to_string(),
            input: input.to_string(),
            source,
        };

        let parsed = layout::parse(&layout::tokenize(layout), input).map_err(wrap)?;
        Self::from_parsed(parsed, wall, zones).map_err(wrap)
    }

    /// Settle the zone of a parsed wall-clock time
    fn from_parsed(
        parsed: Parsed,
        wall: &Location,
        zones: &Location,
    ) -> std::result::Result<Self, LayoutError> {
        let out_of_range = || LayoutError::OutOfRange("time");

        if parsed.utc {
            return Ok(Self {
                instant: parsed.datetime.and_utc().fixed_offset(),
                zone: "UTC".to_string(),
            });
        }

        if let Some(offset) = parsed.offset {
            let instant = offset
                .from_local_datetime(&parsed.datetime)
                .single()
                .ok_or_else(out_of_range)?;
            let (location_offset, location_zone) = zones.offset_at(&instant.naive_utc());
            let named = parsed
                .abbreviation
                .as_ref()
                .is_none_or(|abbreviation| *abbreviation == location_zone);
            let zone = if location_offset == offset && named {
                location_zone
            } else {
                parsed.abbreviation.unwrap_or_default()
            };
            return Ok(Self { instant, zone });
        }

        if let Some(abbreviation) = parsed.abbreviation {
            let offset = zones
                .abbreviation_offset(&abbreviation, &parsed.datetime)
                .unwrap_or_else(|| zone::fabricated_offset(&abbreviation));
            let instant = offset
                .from_local_datetime(&parsed.datetime)
                .single()
                .ok_or_else(out_of_range)?;
            return Ok(Self {
                instant,
                zone: abbreviation,
            });
        }

        let (instant, zone) = wall
            .from_local(&parsed.datetime)
            .ok_or_else(|| LayoutError::NonexistentLocalTime(wall.name().to_string()))?;
        Ok(Self { instant, zone })
    }

    /// The same instant shown in another location
    pub fn in_location(&self, location: &Location) -> Self {
        let (offset, zone) = location.offset_at(&self.instant.naive_utc());
        Self {
            instant: self.instant.with_timezone(&offset),
            zone,
        }
    }

    /// Render with a reference layout or layout name
    pub fn format(&self, layout: &str) -> String {
        layout::format_with(layout, &self.instant, &self.zone)
    }

    pub fn to_rfc3339(&self) -> String {
        self.format(RFC3339)
    }

    pub fn zone_name(&self) -> &str {
        &self.zone
    }

    /// Seconds east of UTC
    pub fn zone_offset(&self) -> i32 {
        self.instant.offset().local_minus_utc()
    }

    /// Seconds since the Unix epoch
    pub fn unix(&self) -> i64 {
        self.instant.timestamp()
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// EventBridge Scheduler one-time expression, `at(2006-01-02T15:04:05)`
    pub fn aws_at(&self) -> String {
        format!("at({})", self.format("2006-01-02T15:04:05"))
    }

    /// Six-field AWS cron expression firing once at this minute
    pub fn aws_cron_once(&self) -> String {
        let dt = &self.instant;
        format!(
            "{} {} {} {} ? {}",
            dt.minute(),
            dt.hour(),
            dt.day(),
            dt.month(),
            dt.year()
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_rfc3339(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
