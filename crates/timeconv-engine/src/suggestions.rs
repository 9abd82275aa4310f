//! Fuzzy matching and suggestions for template errors
//!
//! Uses Levenshtein distance to point a misspelled function, filter or
//! variable at the closest registered name.

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Time functions registered by the engine, each also usable as a filter
pub const TIME_FUNCTIONS: &[&str] = &[
    "timezone",
    "format",
    "parse",
    "parse_in_location",
    "zone_name",
    "zone_offset",
    "aws_at",
    "aws_cron",
    "unix_cron",
];

/// All registered functions in the engine
pub const AVAILABLE_FUNCTIONS: &[&str] = &[
    "timezone",
    "format",
    "parse",
    "parse_in_location",
    "zone_name",
    "zone_offset",
    "aws_at",
    "aws_cron",
    "unix_cron",
    "now",
    "time",
    // Built-in MiniJinja globals
    "range",
    "dict",
    "debug",
    "namespace",
];

/// All registered filters in the engine
pub const AVAILABLE_FILTERS: &[&str] = &[
    "timezone",
    "format",
    "parse",
    "parse_in_location",
    "zone_name",
    "zone_offset",
    "aws_at",
    "aws_cron",
    "unix_cron",
    // Built-in MiniJinja filters
    "default",
    "upper",
    "lower",
    "title",
    "replace",
    "trim",
    "join",
    "first",
    "last",
    "length",
    "list",
    "map",
    "select",
    "reject",
    "items",
    "int",
    "string",
    "tojson",
];

/// Suggestion result with confidence scoring
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches(input: &str, candidates: &[&str], max_results: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    // Best matches first
    suggestions.sort_by_key(|s| s.distance);
    suggestions.truncate(max_results);
    suggestions
}

fn did_you_mean(matches: &[Suggestion]) -> String {
    let quoted: Vec<String> = matches.iter().map(|s| format!("`{}`", s.text)).collect();
    format!("Did you mean {}?", quoted.join(" or "))
}

/// Suggest corrections for an unknown function
pub fn suggest_unknown_function(name: &str) -> String {
    let matches = find_closest_matches(name, AVAILABLE_FUNCTIONS, 3);
    if matches.is_empty() {
        format!(
            "Unknown function `{}`. Available functions: {}",
            name,
            AVAILABLE_FUNCTIONS.join(", ")
        )
    } else {
        did_you_mean(&matches)
    }
}

/// Suggest corrections for an unknown filter
pub fn suggest_unknown_filter(name: &str) -> String {
    let matches = find_closest_matches(name, AVAILABLE_FILTERS, 3);
    if matches.is_empty() {
        format!(
            "Unknown filter `{}`. Time filters: {}",
            name,
            TIME_FUNCTIONS.join(", ")
        )
    } else {
        did_you_mean(&matches)
    }
}

/// Suggest corrections for an undefined variable
///
/// A name close to a function is probably a call missing its parentheses.
pub fn suggest_undefined_variable(name: &str, available: &[String]) -> String {
    if AVAILABLE_FUNCTIONS.contains(&name) {
        return format!("`{}` is a function. Call it as `{}(...)`.", name, name);
    }

    let candidates: Vec<&str> = available.iter().map(|s| s.as_str()).collect();
    let matches = find_closest_matches(name, &candidates, 3);
    if !matches.is_empty() {
        return did_you_mean(&matches);
    }

    if available.is_empty() {
        format!("Variable `{}` is not defined. No context variables were provided.", name)
    } else {
        format!(
            "Variable `{}` is not defined. Available: {}",
            name,
            available.join(", ")
        )
    }
}

/// Hint for a failed time conversion, keyed on the core error message
pub fn suggest_conversion_fix(message: &str) -> Option<String> {
    if message.contains("unknown time zone") {
        Some("Use an IANA zone name such as `UTC`, `Local` or `Asia/Tokyo`.".to_string())
    } else if message.contains("parsing time") {
        Some(
            "Layouts spell out the reference time `Mon Jan 2 15:04:05 MST 2006`, \
             e.g. `2006-01-02 15:04:05`, or name one such as `RFC3339` or `ANSIC`."
                .to_string(),
        )
    } else if message.contains("'?'") || message.contains("expected 6 fields") {
        Some(
            "AWS cron has six fields (minutes hours day-of-month month day-of-week year) \
             and exactly one of the day fields is `?`."
                .to_string(),
        )
    } else if message.contains("invalid ") && message.contains(" field ") {
        Some(
            "Fields take `*`, a value, `a-b`, `start/step` or comma lists; \
             weekdays run 1-7 (SUN=1) or SUN-SAT."
                .to_string(),
        )
    } else {
        None
    }
}

/// Identifiers called as functions on a line, skipping filters and methods
pub fn called_names(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut names = Vec::new();
    let mut idx = 0;

    while idx < bytes.len() {
        if !(bytes[idx].is_ascii_alphabetic() || bytes[idx] == b'_') {
            idx += 1;
            continue;
        }

        let start = idx;
        while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
            idx += 1;
        }

        if bytes.get(idx) != Some(&b'(') {
            continue;
        }

        let before = line[..start].trim_end();
        if before.ends_with('|') || before.ends_with('.') {
            continue;
        }
        names.push(line[start..idx].to_string());
    }

    names
}

/// Identifiers used as filters on a line
pub fn filter_names(line: &str) -> Vec<String> {
    line.split('|')
        .skip(1)
        .filter_map(|part| {
            let name: String = part
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            (!name.is_empty()).then_some(name)
        })
        .collect()
}
