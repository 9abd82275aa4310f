//! Engine error types

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::functions::is_core_error;
use crate::suggestions::{
    AVAILABLE_FILTERS, AVAILABLE_FUNCTIONS, called_names, filter_names, suggest_conversion_fix,
    suggest_undefined_variable, suggest_unknown_filter, suggest_unknown_function,
};

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error")]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Error kind for categorizing template errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    UndefinedVariable,
    UnknownFilter,
    UnknownFunction,
    SyntaxError,
    /// A time conversion rejected its arguments
    Conversion,
    TypeError,
    Other,
}

impl TemplateErrorKind {
    /// Convert to a code string for diagnostics
    pub fn to_code_string(&self) -> &'static str {
        match self {
            Self::UndefinedVariable => "undefined_variable",
            Self::UnknownFilter => "unknown_filter",
            Self::UnknownFunction => "unknown_function",
            Self::SyntaxError => "syntax",
            Self::Conversion => "conversion",
            Self::TypeError => "type",
            Self::Other => "render",
        }
    }
}

/// Template-specific error with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(timeconv::template::render))]
pub struct TemplateError {
    /// Error message
    pub message: String,

    /// Error kind for categorization
    pub kind: TemplateErrorKind,

    /// Template source code
    #[source_code]
    pub src: NamedSource<String>,

    /// Error location in source
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// Suggestion for fixing the error
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Create a template error from a MiniJinja error
    ///
    /// `context` is the render context; its top-level keys feed the
    /// suggestions for undefined variables.
    pub fn from_minijinja(
        err: minijinja::Error,
        template_name: &str,
        template_source: &str,
        context: Option<&serde_json::Value>,
    ) -> Self {
        let kind = categorize(&err);
        let line = err
            .line()
            .and_then(|n| template_source.lines().nth(n.saturating_sub(1)))
            .unwrap_or(template_source);
        let span = err.line().and_then(|n| calculate_span(template_source, n));

        let message = match kind {
            TemplateErrorKind::Conversion => err
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
            _ => err
                .to_string()
                .replace("invalid operation: ", "")
                .replace("syntax error: ", "")
                .replace("undefined value", "undefined variable"),
        };

        let available: Vec<String> = context
            .and_then(|v| v.as_object())
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();

        let suggestion = match kind {
            TemplateErrorKind::UnknownFunction => {
                let name = called_names(line)
                    .into_iter()
                    .find(|n| !AVAILABLE_FUNCTIONS.contains(&n.as_str()));
                Some(match name {
                    Some(name) => suggest_unknown_function(&name),
                    None => format!("Available functions: {}", AVAILABLE_FUNCTIONS.join(", ")),
                })
            }
            TemplateErrorKind::UnknownFilter => {
                let name = filter_names(line)
                    .into_iter()
                    .find(|n| !AVAILABLE_FILTERS.contains(&n.as_str()));
                name.map(|name| suggest_unknown_filter(&name))
            }
            TemplateErrorKind::UndefinedVariable => first_expression_name(line)
                .map(|name| suggest_undefined_variable(&name, &available)),
            TemplateErrorKind::Conversion => suggest_conversion_fix(&message),
            TemplateErrorKind::SyntaxError => Some(
                "Check bracket matching: `{{ }}` for expressions, `{% %}` for statements".to_string(),
            ),
            _ => None,
        };

        Self {
            message,
            kind,
            src: NamedSource::new(template_name, template_source.to_string()),
            span,
            suggestion,
        }
    }

    /// Create a simple error without source mapping
    pub fn simple(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: TemplateErrorKind::Other,
            src: NamedSource::new("<unknown>", String::new()),
            span: None,
            suggestion: None,
        }
    }

    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

fn categorize(err: &minijinja::Error) -> TemplateErrorKind {
    match err.kind() {
        minijinja::ErrorKind::UndefinedError => TemplateErrorKind::UndefinedVariable,
        minijinja::ErrorKind::UnknownFilter => TemplateErrorKind::UnknownFilter,
        minijinja::ErrorKind::UnknownFunction => TemplateErrorKind::UnknownFunction,
        minijinja::ErrorKind::SyntaxError => TemplateErrorKind::SyntaxError,
        minijinja::ErrorKind::InvalidOperation if is_core_error(err) => TemplateErrorKind::Conversion,
        minijinja::ErrorKind::MissingArgument | minijinja::ErrorKind::TooManyArguments => {
            TemplateErrorKind::TypeError
        }
        minijinja::ErrorKind::NonPrimitive | minijinja::ErrorKind::NonKey => {
            TemplateErrorKind::TypeError
        }
        _ => TemplateErrorKind::Other,
    }
}

/// First identifier inside the first `{{ }}` of a line
fn first_expression_name(line: &str) -> Option<String> {
    let start = line.find("{{")? + 2;
    let name: String = line[start..]
        .trim_start()
        .trim_start_matches('-')
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Calculate the source span for a given line number
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (idx, line) in source.lines().enumerate() {
        if idx + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len()));
        }
        offset += line.len() + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_span() {
        let source = "first\nsecond line\nthird";
        let span = calculate_span(source, 2).unwrap();
        assert_eq!(span.offset(), 6);
        assert_eq!(span.len(), 11);
        assert!(calculate_span(source, 4).is_none());
    }

    #[test]
    fn test_first_expression_name() {
        assert_eq!(first_expression_name("at: {{ deadline | aws_at }}"), Some("deadline".into()));
        assert_eq!(first_expression_name("{{- start }}"), Some("start".into()));
        assert_eq!(first_expression_name("no expression"), None);
    }

    #[test]
    fn test_only_core_failures_are_conversions() {
        let core = timeconv_core::convert::unix_cron("0 12 * *").unwrap_err();
        let err = TemplateError::from_minijinja(
            crate::functions::core_error(core),
            "t.txt",
            "{{ unix_cron(s) }}",
            None,
        );
        assert_eq!(err.kind(), TemplateErrorKind::Conversion);
        assert!(err.message.starts_with("expected 6 fields"));
        assert!(err.suggestion.is_some());

        let builtin = minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            "expected 6 fields or more",
        );
        let err = TemplateError::from_minijinja(builtin, "t.txt", "{{ x + y }}", None);
        assert_eq!(err.kind(), TemplateErrorKind::Other);
        assert_eq!(err.suggestion, None);
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(TemplateErrorKind::Conversion.to_code_string(), "conversion");
        assert_eq!(TemplateErrorKind::UnknownFunction.to_code_string(), "unknown_function");
    }
}
