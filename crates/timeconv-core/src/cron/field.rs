//! Cron field model

use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Position of a field in an AWS cron expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::DayOfMonth,
        FieldKind::Month,
        FieldKind::DayOfWeek,
        FieldKind::Year,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Minute => "minutes",
            FieldKind::Hour => "hours",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
            FieldKind::Year => "year",
        }
    }

    /// Inclusive bounds in AWS numbering
    pub fn bounds(self) -> (u32, u32) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (1, 7),
            FieldKind::Year => (1970, 2199),
        }
    }

    /// Resolve a month or weekday name to its number and canonical spelling
    pub fn lookup_name(self, text: &str) -> Option<(u32, &'static str)> {
        let names: &[&'static str] = match self {
            FieldKind::Month => &MONTH_NAMES,
            FieldKind::DayOfWeek => &WEEKDAY_NAMES,
            _ => return None,
        };
        names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(text))
            .map(|idx| (idx as u32 + 1, names[idx]))
    }

    pub fn accepts_names(self) -> bool {
        matches!(self, FieldKind::Month | FieldKind::DayOfWeek)
    }
}

/// A number, possibly written as a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value {
    pub number: u32,
    pub name: Option<&'static str>,
}

impl Value {
    pub fn number(number: u32) -> Self {
        Self { number, name: None }
    }

    /// Unix numbering: weekdays move from SUN=1..SAT=7 to SUN=0..SAT=6
    fn to_unix(self, kind: FieldKind) -> Self {
        match (kind, self.name) {
            (FieldKind::DayOfWeek, None) => Value::number(self.unix_number(kind)),
            _ => self,
        }
    }

    /// The Unix number of this value, whether or not it was written as a name
    fn unix_number(self, kind: FieldKind) -> u32 {
        match kind {
            FieldKind::DayOfWeek => self.number - 1,
            _ => self.number,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.number),
        }
    }
}

/// What an increment counts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStart {
    All,
    Value(Value),
    Range(Value, Value),
}

impl fmt::Display for StepStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStart::All => f.write_str("*"),
            StepStart::Value(v) => write!(f, "{}", v),
            StepStart::Range(a, b) => write!(f, "{}-{}", a, b),
        }
    }
}

/// One comma-separated element of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    All,
    Value(Value),
    Range(Value, Value),
    Step { start: StepStart, step: u32 },
    /// `L` or `L-3` in day-of-month
    LastDay { offset: Option<u32> },
    /// `LW`
    LastWeekdayOfMonth,
    /// `15W`
    NearestWeekday(u32),
    /// `L` in day-of-week
    LastDayOfWeek,
    /// `6L`
    LastOfWeekday(Value),
    /// `3#2`
    NthWeekday { weekday: Value, nth: u32 },
}

impl Item {
    /// Render in Unix cron syntax
    ///
    /// `L`, `W` and `#` pass through unchanged apart from the weekday shift.
    fn to_unix(self, kind: FieldKind) -> String {
        match self {
            Item::Value(v) => v.to_unix(kind).to_string(),
            Item::Range(a, b) => format!("{}-{}", a.to_unix(kind), b.to_unix(kind)),
            Item::Step { start, step } => match start {
                StepStart::All => format!("*/{}", step),
                StepStart::Range(a, b) => {
                    format!("{}-{}/{}", a.to_unix(kind), b.to_unix(kind), step)
                }
                // `5/15` is spelled out as a range, which every cron accepts
                StepStart::Value(v) => {
                    let max = Value::number(kind.bounds().1).unix_number(kind);
                    format!("{}-{}/{}", v.unix_number(kind), max, step)
                }
            },
            Item::LastOfWeekday(v) => format!("{}L", v.to_unix(kind)),
            Item::NthWeekday { weekday, nth } => format!("{}#{}", weekday.to_unix(kind), nth),
            Item::All
            | Item::LastDay { .. }
            | Item::LastWeekdayOfMonth
            | Item::NearestWeekday(_)
            | Item::LastDayOfWeek => self.to_string(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::All => f.write_str("*"),
            Item::Value(v) => write!(f, "{}", v),
            Item::Range(a, b) => write!(f, "{}-{}", a, b),
            Item::Step { start, step } => write!(f, "{}/{}", start, step),
            Item::LastDay { offset: None } => f.write_str("L"),
            Item::LastDay { offset: Some(n) } => write!(f, "L-{}", n),
            Item::LastWeekdayOfMonth => f.write_str("LW"),
            Item::NearestWeekday(day) => write!(f, "{}W", day),
            Item::LastDayOfWeek => f.write_str("L"),
            Item::LastOfWeekday(v) => write!(f, "{}L", v),
            Item::NthWeekday { weekday, nth } => write!(f, "{}#{}", weekday, nth),
        }
    }
}

/// A whole field: `?` or a list of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    NoValue,
    List(Vec<Item>),
}

impl Field {
    pub fn is_no_value(&self) -> bool {
        matches!(self, Field::NoValue)
    }

    /// Render in Unix cron syntax; `?` becomes `*`
    pub fn to_unix(&self, kind: FieldKind) -> String {
        match self {
            Field::NoValue => "*".to_string(),
            Field::List(items) => items
                .iter()
                .map(|item| item.to_unix(kind))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::NoValue => f.write_str("?"),
            Field::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}
