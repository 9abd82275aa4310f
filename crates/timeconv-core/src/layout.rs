//! Reference-time layouts
//!
//! A layout describes a textual time format by writing out the reference
//! instant `Mon Jan 2 15:04:05 MST 2006` the way the desired format would
//! render it. Numbering the components in order gives the same instant as
//! `01/02 03:04:05PM '06 -0700`.
//!
//! A layout is tokenized once into [`Component`]s and the same component
//! list drives both [`format`] and [`parse`]. Text that is not a recognized
//! component is copied (or matched) literally.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use phf::phf_map;
use thiserror::Error;

pub const LAYOUT: &str = "01/02 03:04:05PM '06 -0700";
pub const ANSIC: &str = "Mon Jan _2 15:04:05 2006";
pub const UNIX_DATE: &str = "Mon Jan _2 15:04:05 MST 2006";
pub const RUBY_DATE: &str = "Mon Jan 02 15:04:05 -0700 2006";
pub const RFC822: &str = "02 Jan 06 15:04 MST";
pub const RFC822Z: &str = "02 Jan 06 15:04 -0700";
pub const RFC850: &str = "Monday, 02-Jan-06 15:04:05 MST";
pub const RFC1123: &str = "Mon, 02 Jan 2006 15:04:05 MST";
pub const RFC1123Z: &str = "Mon, 02 Jan 2006 15:04:05 -0700";
pub const RFC3339: &str = "2006-01-02T15:04:05Z07:00";
pub const RFC3339_NANO: &str = "2006-01-02T15:04:05.999999999Z07:00";
pub const KITCHEN: &str = "3:04PM";
pub const DATE_TIME: &str = "2006-01-02 15:04:05";
pub const DATE_ONLY: &str = "2006-01-02";
pub const TIME_ONLY: &str = "15:04:05";

/// Layout names accepted in place of the layout text itself
static NAMED_LAYOUTS: phf::Map<&'static str, &'static str> = phf_map! {
    "Layout" => LAYOUT,
    "ANSIC" => ANSIC,
    "UnixDate" => UNIX_DATE,
    "RubyDate" => RUBY_DATE,
    "RFC822" => RFC822,
    "RFC822Z" => RFC822Z,
    "RFC850" => RFC850,
    "RFC1123" => RFC1123,
    "RFC1123Z" => RFC1123Z,
    "RFC3339" => RFC3339,
    "RFC3339Nano" => RFC3339_NANO,
    "Kitchen" => KITCHEN,
    "DateTime" => DATE_TIME,
    "DateOnly" => DATE_ONLY,
    "TimeOnly" => TIME_ONLY,
};

const LONG_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const LONG_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const SHORT_DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Replace a layout name such as `RFC3339` or `Kitchen` with its layout text
pub fn resolve(layout: &str) -> &str {
    NAMED_LAYOUTS.get(layout).copied().unwrap_or(layout)
}

/// Names of every predefined layout
pub fn layout_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = NAMED_LAYOUTS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Numeric zone offset shapes, named after their reference rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetStyle {
    /// `-07`
    Hours,
    /// `-0700`
    Minutes,
    /// `-07:00`
    ColonMinutes,
    /// `-070000`
    Seconds,
    /// `-07:00:00`
    ColonSeconds,
}

impl OffsetStyle {
    fn pattern(self) -> &'static str {
        match self {
            OffsetStyle::Hours => "07",
            OffsetStyle::Minutes => "0700",
            OffsetStyle::ColonMinutes => "07:00",
            OffsetStyle::Seconds => "070000",
            OffsetStyle::ColonSeconds => "07:00:00",
        }
    }
}

// Longest patterns first so `-070000` is not read as `-0700` followed by `00`
const OFFSET_STYLES: [OffsetStyle; 5] = [
    OffsetStyle::Seconds,
    OffsetStyle::ColonSeconds,
    OffsetStyle::Minutes,
    OffsetStyle::ColonMinutes,
    OffsetStyle::Hours,
];

/// One element of a tokenized layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Literal(String),
    /// `2006`
    LongYear,
    /// `06`
    TwoDigitYear,
    /// `January`
    LongMonth,
    /// `Jan`
    ShortMonth,
    /// `1`
    NumMonth,
    /// `01`
    ZeroMonth,
    /// `Monday`
    LongWeekday,
    /// `Mon`
    ShortWeekday,
    /// `2`
    Day,
    /// `_2`
    UnderDay,
    /// `02`
    ZeroDay,
    /// `__2`
    UnderYearDay,
    /// `002`
    ZeroYearDay,
    /// `15`
    Hour,
    /// `3`
    Hour12,
    /// `03`
    ZeroHour12,
    /// `4`
    Minute,
    /// `04`
    ZeroMinute,
    /// `5`
    Second,
    /// `05`
    ZeroSecond,
    /// `PM`
    PmUpper,
    /// `pm`
    PmLower,
    /// `MST`
    ZoneName,
    /// `-0700` and friends; `iso` variants start with `Z` and render UTC as `Z`
    Offset { iso: bool, style: OffsetStyle },
    /// `.000` (fixed width) or `.999` (trailing zeros trimmed)
    Fraction { comma: bool, digits: usize, trim: bool },
}

impl Component {
    /// The layout text this component was read from
    pub fn layout_text(&self) -> String {
        let text = match self {
            Component::Literal(text) => return text.clone(),
            Component::LongYear => "2006",
            Component::TwoDigitYear => "06",
            Component::LongMonth => "January",
            Component::ShortMonth => "Jan",
            Component::NumMonth => "1",
            Component::ZeroMonth => "01",
            Component::LongWeekday => "Monday",
            Component::ShortWeekday => "Mon",
            Component::Day => "2",
            Component::UnderDay => "_2",
            Component::ZeroDay => "02",
            Component::UnderYearDay => "__2",
            Component::ZeroYearDay => "002",
            Component::Hour => "15",
            Component::Hour12 => "3",
            Component::ZeroHour12 => "03",
            Component::Minute => "4",
            Component::ZeroMinute => "04",
            Component::Second => "5",
            Component::ZeroSecond => "05",
            Component::PmUpper => "PM",
            Component::PmLower => "pm",
            Component::ZoneName => "MST",
            Component::Offset { iso, style } => {
                return format!("{}{}", if *iso { 'Z' } else { '-' }, style.pattern());
            }
            Component::Fraction {
                comma,
                digits,
                trim,
            } => {
                let sep = if *comma { "," } else { "." };
                let digit = if *trim { "9" } else { "0" };
                return format!("{}{}", sep, digit.repeat(*digits));
            }
        };
        text.to_string()
    }
}

/// Split a layout into components
pub fn tokenize(layout: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut literal = String::new();
    let mut rest = layout;

    while !rest.is_empty() {
        if let Some((component, len)) = next_component(rest) {
            if !literal.is_empty() {
                components.push(Component::Literal(std::mem::take(&mut literal)));
            }
            components.push(component);
            rest = &rest[len..];
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        literal.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !literal.is_empty() {
        components.push(Component::Literal(literal));
    }

    components
}

/// Recognize a component at the start of `s`, returning it with its byte length
fn next_component(s: &str) -> Option<(Component, usize)> {
    let b = s.as_bytes();
    let at = |i: usize| b.get(i).copied();

    match *b.first()? {
        b'J' => {
            if s.starts_with("January") {
                Some((Component::LongMonth, 7))
            } else if s.starts_with("Jan") {
                Some((Component::ShortMonth, 3))
            } else {
                None
            }
        }
        b'M' => {
            if s.starts_with("Monday") {
                Some((Component::LongWeekday, 6))
            } else if s.starts_with("Mon") {
                Some((Component::ShortWeekday, 3))
            } else if s.starts_with("MST") {
                Some((Component::ZoneName, 3))
            } else {
                None
            }
        }
        b'0' => match at(1) {
            Some(b'1') => Some((Component::ZeroMonth, 2)),
            Some(b'2') => Some((Component::ZeroDay, 2)),
            Some(b'3') => Some((Component::ZeroHour12, 2)),
            Some(b'4') => Some((Component::ZeroMinute, 2)),
            Some(b'5') => Some((Component::ZeroSecond, 2)),
            Some(b'6') => Some((Component::TwoDigitYear, 2)),
            Some(b'0') if at(2) == Some(b'2') => Some((Component::ZeroYearDay, 3)),
            _ => None,
        },
        b'1' => {
            if at(1) == Some(b'5') {
                Some((Component::Hour, 2))
            } else {
                Some((Component::NumMonth, 1))
            }
        }
        b'2' => {
            if s.starts_with("2006") {
                Some((Component::LongYear, 4))
            } else {
                Some((Component::Day, 1))
            }
        }
        b'_' => {
            if at(1) == Some(b'2') {
                // `_2006` is a literal underscore followed by the year
                if s[1..].starts_with("2006") {
                    None
                } else {
                    Some((Component::UnderDay, 2))
                }
            } else if s.starts_with("__2") {
                Some((Component::UnderYearDay, 3))
            } else {
                None
            }
        }
        b'3' => Some((Component::Hour12, 1)),
        b'4' => Some((Component::Minute, 1)),
        b'5' => Some((Component::Second, 1)),
        b'P' if at(1) == Some(b'M') => Some((Component::PmUpper, 2)),
        b'p' if at(1) == Some(b'm') => Some((Component::PmLower, 2)),
        b'-' => offset_component(s, false),
        b'Z' => offset_component(s, true),
        b'.' | b',' => {
            let digit = at(1)?;
            if digit != b'0' && digit != b'9' {
                return None;
            }
            let run = b[1..].iter().take_while(|&&c| c == digit).count();
            if at(1 + run).is_some_and(|c| c.is_ascii_digit()) {
                return None;
            }
            Some((
                Component::Fraction {
                    comma: b[0] == b',',
                    digits: run,
                    trim: digit == b'9',
                },
                1 + run,
            ))
        }
        _ => None,
    }
}

fn offset_component(s: &str, iso: bool) -> Option<(Component, usize)> {
    let tail = &s[1..];
    OFFSET_STYLES
        .iter()
        .find(|style| tail.starts_with(style.pattern()))
        .map(|style| {
            (
                Component::Offset { iso, style: *style },
                1 + style.pattern().len(),
            )
        })
}

/// Render `dt` with the given components; `zone` is the zone abbreviation for `MST`
pub fn format(components: &[Component], dt: &DateTime<FixedOffset>, zone: &str) -> String {
    let mut out = String::with_capacity(components.len() * 4);
    let offset = dt.offset().local_minus_utc();

    for component in components {
        match component {
            Component::Literal(text) => out.push_str(text),
            Component::LongYear => {
                let year = dt.year();
                if year < 0 {
                    out.push_str(&format!("-{:04}", -year));
                } else {
                    out.push_str(&format!("{:04}", year));
                }
            }
            Component::TwoDigitYear => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
            Component::LongMonth => out.push_str(LONG_MONTHS[dt.month0() as usize]),
            Component::ShortMonth => out.push_str(SHORT_MONTHS[dt.month0() as usize]),
            Component::NumMonth => out.push_str(&dt.month().to_string()),
            Component::ZeroMonth => out.push_str(&format!("{:02}", dt.month())),
            Component::LongWeekday => {
                out.push_str(LONG_DAYS[dt.weekday().num_days_from_sunday() as usize])
            }
            Component::ShortWeekday => {
                out.push_str(SHORT_DAYS[dt.weekday().num_days_from_sunday() as usize])
            }
            Component::Day => out.push_str(&dt.day().to_string()),
            Component::UnderDay => out.push_str(&format!("{:>2}", dt.day())),
            Component::ZeroDay => out.push_str(&format!("{:02}", dt.day())),
            Component::UnderYearDay => out.push_str(&format!("{:>3}", dt.ordinal())),
            Component::ZeroYearDay => out.push_str(&format!("{:03}", dt.ordinal())),
            Component::Hour => out.push_str(&format!("{:02}", dt.hour())),
            Component::Hour12 => out.push_str(&hour12(dt.hour()).to_string()),
            Component::ZeroHour12 => out.push_str(&format!("{:02}", hour12(dt.hour()))),
            Component::Minute => out.push_str(&dt.minute().to_string()),
            Component::ZeroMinute => out.push_str(&format!("{:02}", dt.minute())),
            Component::Second => out.push_str(&dt.second().to_string()),
            Component::ZeroSecond => out.push_str(&format!("{:02}", dt.second())),
            Component::PmUpper => out.push_str(if dt.hour() >= 12 { "PM" } else { "AM" }),
            Component::PmLower => out.push_str(if dt.hour() >= 12 { "pm" } else { "am" }),
            Component::ZoneName => {
                if zone.is_empty() {
                    push_offset(&mut out, offset, OffsetStyle::Minutes, false);
                } else {
                    out.push_str(zone);
                }
            }
            Component::Offset { iso, style } => push_offset(&mut out, offset, *style, *iso),
            Component::Fraction {
                comma,
                digits,
                trim,
            } => push_fraction(&mut out, dt.nanosecond(), *comma, *digits, *trim),
        }
    }

    out
}

/// Tokenize `layout` (or the layout it names) and render `dt` with it
pub fn format_with(layout: &str, dt: &DateTime<FixedOffset>, zone: &str) -> String {
    format(&tokenize(resolve(layout)), dt, zone)
}

fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn push_offset(out: &mut String, offset: i32, style: OffsetStyle, iso: bool) {
    if iso && offset == 0 {
        out.push('Z');
        return;
    }

    let abs = offset.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, abs / 60 % 60, abs % 60);

    out.push(if offset < 0 { '-' } else { '+' });
    out.push_str(&format!("{:02}", hours));
    match style {
        OffsetStyle::Hours => {}
        OffsetStyle::Minutes => out.push_str(&format!("{:02}", minutes)),
        OffsetStyle::ColonMinutes => out.push_str(&format!(":{:02}", minutes)),
        OffsetStyle::Seconds => out.push_str(&format!("{:02}{:02}", minutes, seconds)),
        OffsetStyle::ColonSeconds => out.push_str(&format!(":{:02}:{:02}", minutes, seconds)),
    }
}

fn push_fraction(out: &mut String, nanos: u32, comma: bool, digits: usize, trim: bool) {
    // leap seconds are carried as nanos >= 1e9
    let all = format!("{:09}", nanos % 1_000_000_000);
    let mut fraction = &all[..digits.min(9)];
    if trim {
        fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            return;
        }
    }
    out.push(if comma { ',' } else { '.' });
    out.push_str(fraction);
}

/// Why an input did not match a layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cannot parse {value:?} as {element:?}")]
    CannotParse { value: String, element: String },

    #[error("{0} out of range")]
    OutOfRange(&'static str),

    #[error("extra text: {0:?}")]
    ExtraText(String),

    #[error("day-of-year does not match {0}")]
    YearDayMismatch(&'static str),

    #[error("local time does not exist in {0}")]
    NonexistentLocalTime(String),
}

/// Result of matching an input against a layout, before any zone is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Wall-clock date and time as written
    pub datetime: NaiveDateTime,
    /// The input named UTC explicitly (`Z` or `UTC`)
    pub utc: bool,
    /// Numeric offset from the input
    pub offset: Option<FixedOffset>,
    /// Zone abbreviation from the input, e.g. `JST`
    pub abbreviation: Option<String>,
}

#[derive(Debug, Default)]
struct Fields {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    yday: Option<u32>,
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
    pm: Option<bool>,
    utc: bool,
    offset: Option<i32>,
    abbreviation: Option<String>,
}

/// Match `input` against the components of a layout
pub fn parse(components: &[Component], input: &str) -> Result<Parsed, LayoutError> {
    let mut value = input;
    let mut f = Fields::default();

    for (idx, component) in components.iter().enumerate() {
        let cannot_parse = |value: &str| LayoutError::CannotParse {
            value: value.to_string(),
            element: component.layout_text(),
        };

        match component {
            Component::Literal(text) => {
                value = skip(value, text).ok_or_else(|| cannot_parse(value))?;
            }
            Component::LongYear => {
                let (year, rest) = fixed_digits(value, 4).ok_or_else(|| cannot_parse(value))?;
                f.year = year as i32;
                value = rest;
            }
            Component::TwoDigitYear => {
                let (year, rest) = fixed_digits(value, 2).ok_or_else(|| cannot_parse(value))?;
                f.year = year as i32 + if year >= 69 { 1900 } else { 2000 };
                value = rest;
            }
            Component::LongMonth | Component::ShortMonth => {
                let names: &[&str] = if *component == Component::LongMonth {
                    &LONG_MONTHS
                } else {
                    &SHORT_MONTHS
                };
                let (idx, rest) = lookup(names, value).ok_or_else(|| cannot_parse(value))?;
                f.month = Some(idx as u32 + 1);
                value = rest;
            }
            Component::NumMonth | Component::ZeroMonth => {
                let (month, rest) = getnum(value, *component == Component::ZeroMonth)
                    .ok_or_else(|| cannot_parse(value))?;
                if !(1..=12).contains(&month) {
                    return Err(LayoutError::OutOfRange("month"));
                }
                f.month = Some(month);
                value = rest;
            }
            Component::LongWeekday | Component::ShortWeekday => {
                let names: &[&str] = if *component == Component::LongWeekday {
                    &LONG_DAYS
                } else {
                    &SHORT_DAYS
                };
                // the weekday is read but never checked against the date
                let (_, rest) = lookup(names, value).ok_or_else(|| cannot_parse(value))?;
                value = rest;
            }
            Component::Day | Component::UnderDay | Component::ZeroDay => {
                let mut rest = value;
                if *component == Component::UnderDay {
                    rest = rest.strip_prefix(' ').unwrap_or(rest);
                }
                let (day, rest) = getnum(rest, *component == Component::ZeroDay)
                    .ok_or_else(|| cannot_parse(value))?;
                f.day = Some(day);
                value = rest;
            }
            Component::UnderYearDay | Component::ZeroYearDay => {
                let mut rest = value;
                if *component == Component::UnderYearDay {
                    for _ in 0..2 {
                        rest = rest.strip_prefix(' ').unwrap_or(rest);
                    }
                }
                let (yday, rest) = getnum3(rest, *component == Component::ZeroYearDay)
                    .ok_or_else(|| cannot_parse(value))?;
                if !(1..=366).contains(&yday) {
                    return Err(LayoutError::OutOfRange("day-of-year"));
                }
                f.yday = Some(yday);
                value = rest;
            }
            Component::Hour => {
                let (hour, rest) = getnum(value, false).ok_or_else(|| cannot_parse(value))?;
                if hour >= 24 {
                    return Err(LayoutError::OutOfRange("hour"));
                }
                f.hour = hour;
                value = rest;
            }
            Component::Hour12 | Component::ZeroHour12 => {
                let (hour, rest) = getnum(value, *component == Component::ZeroHour12)
                    .ok_or_else(|| cannot_parse(value))?;
                if hour > 12 {
                    return Err(LayoutError::OutOfRange("hour"));
                }
                f.hour = hour;
                value = rest;
            }
            Component::Minute | Component::ZeroMinute => {
                let (minute, rest) = getnum(value, *component == Component::ZeroMinute)
                    .ok_or_else(|| cannot_parse(value))?;
                if minute >= 60 {
                    return Err(LayoutError::OutOfRange("minute"));
                }
                f.minute = minute;
                value = rest;
            }
            Component::Second | Component::ZeroSecond => {
                let (second, rest) = getnum(value, *component == Component::ZeroSecond)
                    .ok_or_else(|| cannot_parse(value))?;
                if second >= 60 {
                    return Err(LayoutError::OutOfRange("second"));
                }
                f.second = second;
                value = rest;

                // A fractional second may follow even when the layout has none
                let layout_has_fraction =
                    matches!(components.get(idx + 1), Some(Component::Fraction { .. }));
                if !layout_has_fraction && starts_fraction(value) {
                    let end = 1 + value[1..].bytes().take_while(u8::is_ascii_digit).count();
                    f.nanos = parse_nanos(&value[1..end]);
                    value = &value[end..];
                }
            }
            Component::PmUpper | Component::PmLower => {
                let head = value.get(..2).ok_or_else(|| cannot_parse(value))?;
                let upper = *component == Component::PmUpper;
                f.pm = match (upper, head) {
                    (true, "PM") | (false, "pm") => Some(true),
                    (true, "AM") | (false, "am") => Some(false),
                    _ => return Err(cannot_parse(value)),
                };
                value = &value[2..];
            }
            Component::ZoneName => {
                if let Some(rest) = value.strip_prefix("UTC") {
                    f.utc = true;
                    value = rest;
                } else {
                    let len = zone_abbreviation_len(value).ok_or_else(|| cannot_parse(value))?;
                    f.abbreviation = Some(value[..len].to_string());
                    value = &value[len..];
                }
            }
            Component::Offset { iso, style } => {
                if let Some(rest) = value.strip_prefix('Z').filter(|_| *iso) {
                    f.utc = true;
                    value = rest;
                } else {
                    let (offset, rest) =
                        parse_offset(value, *style).ok_or_else(|| cannot_parse(value))??;
                    f.offset = Some(offset);
                    value = rest;
                }
            }
            Component::Fraction { digits, trim, .. } => {
                if *trim {
                    // an omitted fraction is fine for `.999`
                    if starts_fraction(value) {
                        let end = 1 + value[1..].bytes().take_while(u8::is_ascii_digit).count();
                        f.nanos = parse_nanos(&value[1..end]);
                        value = &value[end..];
                    }
                } else {
                    let end = 1 + digits;
                    let ok = value.len() >= end
                        && matches!(value.as_bytes()[0], b'.' | b',')
                        && value.as_bytes()[1..end].iter().all(u8::is_ascii_digit);
                    if !ok {
                        return Err(cannot_parse(value));
                    }
                    f.nanos = parse_nanos(&value[1..end]);
                    value = &value[end..];
                }
            }
        }
    }

    if !value.is_empty() {
        return Err(LayoutError::ExtraText(value.to_string()));
    }

    f.into_parsed()
}

impl Fields {
    fn into_parsed(mut self) -> Result<Parsed, LayoutError> {
        match self.pm {
            Some(true) if self.hour < 12 => self.hour += 12,
            Some(false) if self.hour == 12 => self.hour = 0,
            _ => {}
        }

        let date = match self.yday {
            Some(yday) => {
                let date = NaiveDate::from_yo_opt(self.year, yday)
                    .ok_or(LayoutError::OutOfRange("day-of-year"))?;
                if self.month.is_some_and(|m| m != date.month()) {
                    return Err(LayoutError::YearDayMismatch("month"));
                }
                if self.day.is_some_and(|d| d != date.day()) {
                    return Err(LayoutError::YearDayMismatch("day"));
                }
                date
            }
            None => NaiveDate::from_ymd_opt(
                self.year,
                self.month.unwrap_or(1),
                self.day.unwrap_or(1),
            )
            .ok_or(LayoutError::OutOfRange("day"))?,
        };

        let time = NaiveTime::from_hms_nano_opt(self.hour, self.minute, self.second, self.nanos)
            .ok_or(LayoutError::OutOfRange("time"))?;

        let offset = match self.offset {
            Some(secs) => Some(
                FixedOffset::east_opt(secs).ok_or(LayoutError::OutOfRange("time zone offset"))?,
            ),
            None => None,
        };

        Ok(Parsed {
            datetime: date.and_time(time),
            utc: self.utc,
            offset,
            abbreviation: self.abbreviation,
        })
    }
}

/// Consume the literal `prefix`; a space matches any run of spaces
fn skip<'a>(mut value: &'a str, mut prefix: &str) -> Option<&'a str> {
    while !prefix.is_empty() {
        if prefix.starts_with(' ') {
            if !value.is_empty() && !value.starts_with(' ') {
                return None;
            }
            prefix = prefix.trim_start_matches(' ');
            value = value.trim_start_matches(' ');
            continue;
        }

        let ch = prefix.chars().next()?;
        if !value.starts_with(ch) {
            return None;
        }
        prefix = &prefix[ch.len_utf8()..];
        value = &value[ch.len_utf8()..];
    }
    Some(value)
}

/// One or two digits; exactly two when `fixed`
fn getnum(s: &str, fixed: bool) -> Option<(u32, &str)> {
    let b = s.as_bytes();
    if !b.first()?.is_ascii_digit() {
        return None;
    }
    if !b.get(1).is_some_and(u8::is_ascii_digit) {
        if fixed {
            return None;
        }
        return Some(((b[0] - b'0') as u32, &s[1..]));
    }
    Some((((b[0] - b'0') * 10 + (b[1] - b'0')) as u32, &s[2..]))
}

/// One to three digits; exactly three when `fixed`
fn getnum3(s: &str, fixed: bool) -> Option<(u32, &str)> {
    let len = s.bytes().take(3).take_while(u8::is_ascii_digit).count();
    if len == 0 || (fixed && len != 3) {
        return None;
    }
    let n = s[..len]
        .bytes()
        .fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32);
    Some((n, &s[len..]))
}

fn fixed_digits(s: &str, len: usize) -> Option<(u32, &str)> {
    let head = s.get(..len)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n = head.bytes().fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32);
    Some((n, &s[len..]))
}

/// Case-insensitive match of one of `names` at the start of `value`
fn lookup<'a>(names: &[&str], value: &'a str) -> Option<(usize, &'a str)> {
    names.iter().enumerate().find_map(|(idx, name)| {
        let head = value.get(..name.len())?;
        head.eq_ignore_ascii_case(name)
            .then(|| (idx, &value[name.len()..]))
    })
}

fn starts_fraction(value: &str) -> bool {
    let b = value.as_bytes();
    b.len() >= 2 && matches!(b[0], b'.' | b',') && b[1].is_ascii_digit()
}

/// Scale a run of fraction digits to nanoseconds, ignoring digits past the ninth
fn parse_nanos(digits: &str) -> u32 {
    let digits = &digits[..digits.len().min(9)];
    let nanos = digits
        .bytes()
        .fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32);
    nanos * 10u32.pow((9 - digits.len()) as u32)
}

/// Length of a zone abbreviation at the start of `value`
///
/// Accepts 3 to 5 upper-case letters (`JST`, `AEST`), `GMT` with an optional
/// signed hour (`GMT+3`), and numeric abbreviations (`+09`, `-0330`).
fn zone_abbreviation_len(value: &str) -> Option<usize> {
    let b = value.as_bytes();

    if matches!(b.first(), Some(b'+' | b'-')) {
        let digits = b[1..].iter().take_while(|c| c.is_ascii_digit()).count();
        return matches!(digits, 2 | 4).then_some(1 + digits);
    }

    if value.starts_with("GMT") {
        let rest = &b[3..];
        if matches!(rest.first(), Some(b'+' | b'-')) {
            let digits = rest[1..].iter().take_while(|c| c.is_ascii_digit()).count();
            if (1..=2).contains(&digits) {
                return Some(4 + digits);
            }
        }
        return Some(3);
    }

    let upper = b.iter().take_while(|c| c.is_ascii_uppercase()).count();
    (3..=5).contains(&upper).then_some(upper)
}

/// Parse a signed numeric offset in the given style
///
/// The outer `Option` reports a shape mismatch, the inner `Result` a value
/// out of range.
fn parse_offset(value: &str, style: OffsetStyle) -> Option<Result<(i32, &str), LayoutError>> {
    let b = value.as_bytes();
    let sign = match b.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };

    let (hours, minutes, seconds, len) = match style {
        OffsetStyle::Hours => (two_digits(b, 1)?, 0, 0, 3),
        OffsetStyle::Minutes => (two_digits(b, 1)?, two_digits(b, 3)?, 0, 5),
        OffsetStyle::ColonMinutes => {
            if b.get(3) != Some(&b':') {
                return None;
            }
            (two_digits(b, 1)?, two_digits(b, 4)?, 0, 6)
        }
        OffsetStyle::Seconds => (
            two_digits(b, 1)?,
            two_digits(b, 3)?,
            two_digits(b, 5)?,
            7,
        ),
        OffsetStyle::ColonSeconds => {
            if b.get(3) != Some(&b':') || b.get(6) != Some(&b':') {
                return None;
            }
            (
                two_digits(b, 1)?,
                two_digits(b, 4)?,
                two_digits(b, 7)?,
                9,
            )
        }
    };

    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return Some(Err(LayoutError::OutOfRange("time zone offset")));
    }

    let secs = sign * (hours * 3600 + minutes * 60 + seconds) as i32;
    Some(Ok((secs, &value[len..])))
}

fn two_digits(b: &[u8], at: usize) -> Option<u32> {
    let hi = *b.get(at)?;
    let lo = *b.get(at + 1)?;
    (hi.is_ascii_digit() && lo.is_ascii_digit()).then(|| ((hi - b'0') * 10 + (lo - b'0')) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2006, 1, 2, 15, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_tokenize_rfc3339() {
        assert_eq!(
            tokenize(RFC3339),
            vec![
                Component::LongYear,
                Component::Literal("-".into()),
                Component::ZeroMonth,
                Component::Literal("-".into()),
                Component::ZeroDay,
                Component::Literal("T".into()),
                Component::Hour,
                Component::Literal(":".into()),
                Component::ZeroMinute,
                Component::Literal(":".into()),
                Component::ZeroSecond,
                Component::Offset {
                    iso: true,
                    style: OffsetStyle::ColonMinutes
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_literal_underscore_year() {
        assert_eq!(
            tokenize("_2006"),
            vec![Component::Literal("_".into()), Component::LongYear]
        );
    }

    #[test]
    fn test_tokenize_fraction() {
        assert_eq!(
            tokenize(".000"),
            vec![Component::Fraction {
                comma: false,
                digits: 3,
                trim: false
            }]
        );
        // a run followed by another digit is not a fraction
        assert!(
            !tokenize(".0001")
                .iter()
                .any(|c| matches!(c, Component::Fraction { .. }))
        );
    }

    #[test]
    fn test_named_layouts_format_reference() {
        let dt = reference();
        assert_eq!(format_with("RFC3339", &dt, "MST"), "2006-01-02T15:04:05-07:00");
        assert_eq!(format_with("ANSIC", &dt, "MST"), "Mon Jan  2 15:04:05 2006");
        assert_eq!(format_with("RFC1123", &dt, "MST"), "Mon, 02 Jan 2006 15:04:05 MST");
        assert_eq!(format_with("RFC850", &dt, "MST"), "Monday, 02-Jan-06 15:04:05 MST");
        assert_eq!(format_with("Kitchen", &dt, "MST"), "3:04PM");
        assert_eq!(format_with(LAYOUT, &dt, "MST"), "01/02 03:04:05PM '06 -0700");
    }

    #[test]
    fn test_format_year_day_and_offsets() {
        let dt = reference();
        assert_eq!(format_with("002 __2", &dt, ""), "002   2");
        assert_eq!(format_with("-07 -07:00:00 Z0700", &dt, ""), "-07 -07:00:00 -0700");

        let utc = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 8, 31, 1, 23, 45)
            .unwrap();
        assert_eq!(format_with("Z07:00 -07:00", &utc, "UTC"), "Z +00:00");
    }

    #[test]
    fn test_format_fraction() {
        let dt = reference() + chrono::Duration::milliseconds(120);
        assert_eq!(format_with("05.000", &dt, ""), "05.120");
        assert_eq!(format_with("05.999", &dt, ""), "05.12");
        assert_eq!(format_with("05.999", &reference(), ""), "05");
        assert_eq!(format_with("05,000000", &dt, ""), "05,120000");
    }

    #[test]
    fn test_format_empty_zone_name_uses_offset() {
        assert_eq!(format_with("MST", &reference(), ""), "-0700");
    }

    #[test]
    fn test_parse_ansic() {
        let parsed = parse(&tokenize(ANSIC), "Wed Aug  7 01:23:45 2024").unwrap();
        assert_eq!(parsed.datetime.to_string(), "2024-08-07 01:23:45");
        assert!(!parsed.utc);
        assert_eq!(parsed.offset, None);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse(&tokenize(RFC3339), "2024-08-31T01:23:45+09:00").unwrap();
        assert_eq!(parsed.offset, FixedOffset::east_opt(9 * 3600));

        let parsed = parse(&tokenize(RFC3339), "2024-08-31T01:23:45Z").unwrap();
        assert!(parsed.utc);
    }

    #[test]
    fn test_parse_accepts_fraction_not_in_layout() {
        let parsed = parse(&tokenize(RFC3339), "2024-08-31T01:23:45.5Z").unwrap();
        assert_eq!(parsed.datetime.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_zone_abbreviation() {
        let parsed = parse(&tokenize("2006-01-02 15:04:05 MST"), "2024-08-31 01:23:45 JST").unwrap();
        assert_eq!(parsed.abbreviation.as_deref(), Some("JST"));

        let parsed = parse(&tokenize("15:04 MST"), "10:00 UTC").unwrap();
        assert!(parsed.utc);
    }

    #[test]
    fn test_parse_kitchen_pm() {
        let parsed = parse(&tokenize(KITCHEN), "3:04PM").unwrap();
        assert_eq!(parsed.datetime.to_string(), "0000-01-01 15:04:00");

        let parsed = parse(&tokenize(KITCHEN), "12:30AM").unwrap();
        assert_eq!(parsed.datetime.hour(), 0);
    }

    #[test]
    fn test_parse_two_digit_year_pivot() {
        let layout = tokenize("06-01-02");
        assert_eq!(parse(&layout, "68-01-02").unwrap().datetime.year(), 2068);
        assert_eq!(parse(&layout, "69-01-02").unwrap().datetime.year(), 1969);
    }

    #[test]
    fn test_parse_space_runs() {
        let layout = tokenize("2006 01");
        assert!(parse(&layout, "2024    08").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        let err = parse(&tokenize(DATE_TIME), "2024-08-31T00:00:00").unwrap_err();
        assert_eq!(err.to_string(), r#"cannot parse "T00:00:00" as " ""#);

        let err = parse(&tokenize(RFC3339), "2024-08-31T00:00:00").unwrap_err();
        assert_eq!(err.to_string(), r#"cannot parse "" as "Z07:00""#);

        let err = parse(&tokenize(DATE_ONLY), "2024-02-30").unwrap_err();
        assert_eq!(err, LayoutError::OutOfRange("day"));

        let err = parse(&tokenize(DATE_ONLY), "2024-13-01").unwrap_err();
        assert_eq!(err, LayoutError::OutOfRange("month"));

        let err = parse(&tokenize(DATE_ONLY), "2024-01-01 junk").unwrap_err();
        assert_eq!(err, LayoutError::ExtraText(" junk".into()));
    }

    #[test]
    fn test_parse_year_day() {
        let parsed = parse(&tokenize("2006 002"), "2024 060").unwrap();
        assert_eq!(parsed.datetime.date().to_string(), "2024-02-29");

        let err = parse(&tokenize("2006-01 002"), "2024-03 060").unwrap_err();
        assert_eq!(err, LayoutError::YearDayMismatch("month"));
    }

    #[test]
    fn test_parse_then_format_round_trip() {
        for (layout, input) in [
            (RFC3339, "2024-08-31T01:23:45+09:00"),
            (RFC1123Z, "Sat, 31 Aug 2024 01:23:45 +0900"),
            (ANSIC, "Wed Aug  7 01:23:45 2024"),
            ("2006-01-02 15:04:05.000", "2024-08-31 01:23:45.120"),
        ] {
            let components = tokenize(layout);
            let parsed = parse(&components, input).unwrap();
            let offset = parsed.offset.unwrap_or(FixedOffset::east_opt(0).unwrap());
            let dt = offset.from_local_datetime(&parsed.datetime).unwrap();
            assert_eq!(format(&components, &dt, ""), input, "layout {layout}");
        }
    }
}
