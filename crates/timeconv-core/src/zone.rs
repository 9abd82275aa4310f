//! Time zone locations
//!
//! A [`Location`] is either UTC or a named zone from the IANA database
//! bundled by `chrono-tz`. `Local` resolves to the system zone.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};

/// Where a wall-clock time is interpreted or rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Utc,
    Zone(Tz),
}

impl Location {
    /// Load a location by name
    ///
    /// `""` and `"UTC"` are UTC, `"Local"` is the system zone, anything else
    /// must be an IANA zone name such as `Asia/Tokyo`.
    pub fn load(name: &str) -> Result<Self> {
        match name {
            "" | "UTC" => Ok(Location::Utc),
            "Local" => Ok(Self::local()),
            _ => name
                .parse::<Tz>()
                .map(Location::Zone)
                .map_err(|_| CoreError::UnknownLocation {
                    name: name.to_string(),
                }),
        }
    }

    /// The system zone: `TZ` if set, then the `/etc/localtime` link, then UTC
    pub fn local() -> Self {
        if let Ok(tz) = std::env::var("TZ") {
            let tz = tz.trim_start_matches(':');
            if tz.is_empty() || tz == "UTC" {
                return Location::Utc;
            }
            return match tz.parse::<Tz>() {
                Ok(zone) => Location::Zone(zone),
                Err(_) => {
                    tracing::debug!(tz, "TZ names an unknown zone, using UTC");
                    Location::Utc
                }
            };
        }

        if let Ok(target) = std::fs::read_link("/etc/localtime") {
            let target = target.to_string_lossy();
            if let Some((_, name)) = target.split_once("zoneinfo/") {
                if let Ok(zone) = name.parse::<Tz>() {
                    return Location::Zone(zone);
                }
            }
        }

        Location::Utc
    }

    /// IANA name of the location
    pub fn name(&self) -> &'static str {
        match self {
            Location::Utc => "UTC",
            Location::Zone(tz) => tz.name(),
        }
    }

    /// Offset and abbreviation in effect at a UTC instant
    pub fn offset_at(&self, utc: &NaiveDateTime) -> (FixedOffset, String) {
        match self {
            Location::Utc => (Utc.fix(), "UTC".to_string()),
            Location::Zone(tz) => {
                let offset = tz.offset_from_utc_datetime(utc);
                (offset.fix(), offset.to_string())
            }
        }
    }

    /// Interpret a wall-clock time in this location
    ///
    /// Returns `None` when a DST transition skips the time; an ambiguous time
    /// resolves to the earlier instant.
    pub fn from_local(&self, local: &NaiveDateTime) -> Option<(DateTime<FixedOffset>, String)> {
        match self {
            Location::Utc => Some((local.and_utc().fixed_offset(), "UTC".to_string())),
            Location::Zone(tz) => {
                let dt = tz.from_local_datetime(local).earliest()?;
                Some((dt.fixed_offset(), dt.offset().to_string()))
            }
        }
    }

    /// Offset of an abbreviation this location uses in the year of `local`
    ///
    /// Checks the time itself and both halves of the year so that `PST`
    /// resolves in July and `PDT` in January.
    pub fn abbreviation_offset(&self, abbreviation: &str, local: &NaiveDateTime) -> Option<FixedOffset> {
        let Location::Zone(tz) = self else {
            return (abbreviation == "UTC").then(|| Utc.fix());
        };

        let year = local.year();
        let candidates = [
            Some(*local),
            NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            NaiveDate::from_ymd_opt(year, 7, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        ];

        candidates.into_iter().flatten().find_map(|at| {
            let offset = tz.offset_from_utc_datetime(&at);
            (offset.to_string() == abbreviation).then(|| offset.fix())
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Offset implied by an abbreviation no location claims
///
/// `GMT+3` and numeric names like `+0530` carry their offset; any other
/// name is taken as zero offset.
pub fn fabricated_offset(abbreviation: &str) -> FixedOffset {
    let numeric = abbreviation
        .strip_prefix("GMT")
        .unwrap_or(abbreviation);
    numeric_offset_secs(numeric)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn numeric_offset_secs(name: &str) -> Option<i32> {
    let sign = match name.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits = &name[1..];
    let (hours, minutes): (i32, i32) = match digits.len() {
        1 | 2 => (digits.parse().ok()?, 0),
        4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        _ => return None,
    };
    Some(sign * (hours * 3600 + minutes * 60))
}
