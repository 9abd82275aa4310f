//! Cron field parser
//!
//! Parses a single whitespace-free field with pest, then checks values
//! against the bounds of the field's position.

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use super::CronError;
use super::field::{Field, FieldKind, Item, StepStart, Value};

#[derive(Parser)]
#[grammar = "cron/cron.pest"]
struct CronParser;

/// Parse the text of one field at the given position
pub fn parse_field(kind: FieldKind, text: &str) -> Result<Field, CronError> {
    FieldParser { kind, text }.parse()
}

struct FieldParser<'a> {
    kind: FieldKind,
    text: &'a str,
}

impl FieldParser<'_> {
    fn invalid(&self, reason: impl Into<String>) -> CronError {
        CronError::Field {
            field: self.kind.name(),
            text: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(&self) -> Result<Field, CronError> {
        let rule = match self.kind {
            FieldKind::DayOfMonth => Rule::day_of_month,
            FieldKind::DayOfWeek => Rule::day_of_week,
            _ => Rule::field,
        };

        let pairs = CronParser::parse(rule, self.text).map_err(|e| {
            let pos = match e.location {
                InputLocation::Pos(pos) => pos,
                InputLocation::Span((pos, _)) => pos,
            };
            match self.text.get(pos..) {
                Some(rest) if !rest.is_empty() => self.invalid(format!("unexpected {:?}", rest)),
                _ => self.invalid("unexpected end of field"),
            }
        })?;

        let mut items = Vec::new();
        for pair in pairs {
            match pair.as_rule() {
                Rule::no_value => return Ok(Field::NoValue),
                Rule::list | Rule::dom_list | Rule::dow_list => {
                    for inner in pair.into_inner() {
                        items.push(self.item(inner)?);
                    }
                }
                _ => {}
            }
        }

        Ok(Field::List(items))
    }

    fn item(&self, pair: Pair<'_, Rule>) -> Result<Item, CronError> {
        match pair.as_rule() {
            Rule::all => Ok(Item::All),
            Rule::single => Ok(Item::Value(self.first_value(pair)?)),
            Rule::range => {
                let (start, end) = self.range(pair)?;
                Ok(Item::Range(start, end))
            }
            Rule::step => {
                let mut inner = pair.into_inner();
                let start = match inner.next().and_then(|p| p.into_inner().next()) {
                    Some(p) if p.as_rule() == Rule::all => StepStart::All,
                    Some(p) if p.as_rule() == Rule::range => {
                        let (a, b) = self.range(p)?;
                        StepStart::Range(a, b)
                    }
                    Some(p) => StepStart::Value(self.first_value(p)?),
                    None => return Err(self.invalid("missing increment start")),
                };
                let step = self.number(inner.next())?;
                if step == 0 {
                    return Err(self.invalid("increment must be at least 1"));
                }
                Ok(Item::Step { start, step })
            }
            Rule::last_day => {
                let offset = match pair.into_inner().next() {
                    Some(p) => {
                        let n = self.number(Some(p))?;
                        if !(1..=30).contains(&n) {
                            return Err(self.invalid(format!("L-{} is out of range L-1 to L-30", n)));
                        }
                        Some(n)
                    }
                    None => None,
                };
                Ok(Item::LastDay { offset })
            }
            Rule::last_weekday => Ok(Item::LastWeekdayOfMonth),
            Rule::nearest_weekday => {
                let day = self.number(pair.into_inner().next())?;
                self.check(day)?;
                Ok(Item::NearestWeekday(day))
            }
            Rule::last_day_of_week => Ok(Item::LastDayOfWeek),
            Rule::last_of_weekday => Ok(Item::LastOfWeekday(self.first_value(pair)?)),
            Rule::nth_weekday => {
                let mut inner = pair.into_inner();
                let weekday = self.value(inner.next())?;
                let nth = self.number(inner.next())?;
                if !(1..=5).contains(&nth) {
                    return Err(self.invalid(format!("#{} is out of range #1 to #5", nth)));
                }
                Ok(Item::NthWeekday { weekday, nth })
            }
            rule => Err(self.invalid(format!("unexpected {:?}", rule))),
        }
    }

    fn range(&self, pair: Pair<'_, Rule>) -> Result<(Value, Value), CronError> {
        let mut inner = pair.into_inner();
        let start = self.value(inner.next())?;
        let end = self.value(inner.next())?;
        if start.number > end.number {
            return Err(self.invalid(format!("range {}-{} runs backwards", start, end)));
        }
        Ok((start, end))
    }

    fn first_value(&self, pair: Pair<'_, Rule>) -> Result<Value, CronError> {
        self.value(pair.into_inner().next())
    }

    fn value(&self, pair: Option<Pair<'_, Rule>>) -> Result<Value, CronError> {
        let pair = pair.ok_or_else(|| self.invalid("missing value"))?;
        match pair.as_rule() {
            Rule::name => {
                if !self.kind.accepts_names() {
                    return Err(self.invalid(format!("names are not allowed in the {} field", self.kind.name())));
                }
                let (number, name) = self
                    .kind
                    .lookup_name(pair.as_str())
                    .ok_or_else(|| self.invalid(format!("unknown name {:?}", pair.as_str())))?;
                Ok(Value {
                    number,
                    name: Some(name),
                })
            }
            _ => {
                let number = self.number(Some(pair))?;
                self.check(number)?;
                Ok(Value::number(number))
            }
        }
    }

    fn number(&self, pair: Option<Pair<'_, Rule>>) -> Result<u32, CronError> {
        let pair = pair.ok_or_else(|| self.invalid("missing number"))?;
        pair.as_str()
            .parse()
            .map_err(|_| self.invalid(format!("invalid number {:?}", pair.as_str())))
    }

    fn check(&self, number: u32) -> Result<(), CronError> {
        let (min, max) = self.kind.bounds();
        if (min..=max).contains(&number) {
            Ok(())
        } else {
            Err(self.invalid(format!("{} is out of range {}-{}", number, min, max)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(kind: FieldKind, text: &str) -> String {
        parse_field(kind, text).unwrap().to_string()
    }

    #[test]
    fn test_basic_items() {
        assert_eq!(render(FieldKind::Minute, "*"), "*");
        assert_eq!(render(FieldKind::Minute, "0,15,30"), "0,15,30");
        assert_eq!(render(FieldKind::Hour, "8-17"), "8-17");
        assert_eq!(render(FieldKind::Minute, "0/5"), "0/5");
        assert_eq!(render(FieldKind::Minute, "*/10"), "*/10");
        assert_eq!(render(FieldKind::Hour, "8-17/2"), "8-17/2");
    }

    #[test]
    fn test_names_are_normalized() {
        assert_eq!(render(FieldKind::Month, "jan-mar"), "JAN-MAR");
        assert_eq!(render(FieldKind::DayOfWeek, "mon-fri"), "MON-FRI");
    }

    #[test]
    fn test_day_of_month_extensions() {
        assert_eq!(render(FieldKind::DayOfMonth, "?"), "?");
        assert_eq!(render(FieldKind::DayOfMonth, "L"), "L");
        assert_eq!(render(FieldKind::DayOfMonth, "L-2"), "L-2");
        assert_eq!(render(FieldKind::DayOfMonth, "LW"), "LW");
        assert_eq!(render(FieldKind::DayOfMonth, "15W"), "15W");
    }

    #[test]
    fn test_day_of_week_extensions() {
        assert_eq!(render(FieldKind::DayOfWeek, "L"), "L");
        assert_eq!(render(FieldKind::DayOfWeek, "6L"), "6L");
        assert_eq!(render(FieldKind::DayOfWeek, "3#2"), "3#2");
        assert_eq!(render(FieldKind::DayOfWeek, "fri#1"), "FRI#1");
    }

    #[test]
    fn test_no_value_only_in_day_fields() {
        assert!(parse_field(FieldKind::Minute, "?").is_err());
        assert!(parse_field(FieldKind::Year, "?").is_err());
    }

    #[test]
    fn test_out_of_range() {
        let err = parse_field(FieldKind::Minute, "60").unwrap_err();
        assert_eq!(err.to_string(), r#"invalid minutes field "60": 60 is out of range 0-59"#);

        assert!(parse_field(FieldKind::DayOfWeek, "0").is_err());
        assert!(parse_field(FieldKind::Year, "1969").is_err());
        assert!(parse_field(FieldKind::DayOfWeek, "2#6").is_err());
        assert!(parse_field(FieldKind::DayOfMonth, "L-31").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        let err = parse_field(FieldKind::Hour, "1-").unwrap_err();
        assert!(matches!(err, CronError::Field { field: "hours", .. }));

        assert!(parse_field(FieldKind::Hour, "5-1").is_err());
        assert!(parse_field(FieldKind::Minute, "*/0").is_err());
        assert!(parse_field(FieldKind::Minute, "JAN").is_err());
        assert!(parse_field(FieldKind::Month, "FOO").is_err());
        assert!(parse_field(FieldKind::DayOfMonth, "5L").is_err());
    }
}
