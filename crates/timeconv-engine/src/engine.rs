//! Template engine based on MiniJinja

use minijinja::Environment;
use tracing::debug;

use crate::error::{EngineError, Result, TemplateError};
use crate::functions;

/// Template engine builder
pub struct EngineBuilder {
    strict_mode: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self { strict_mode: true }
    }

    /// Set strict mode (fail on undefined variables)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine::new(self.strict_mode)
    }
}

/// The template engine
pub struct Engine {
    strict_mode: bool,
}

impl Engine {
    /// Create a new engine with default settings
    pub fn new(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Create a configured MiniJinja environment
    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();

        if self.strict_mode {
            env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        } else {
            env.set_undefined_behavior(minijinja::UndefinedBehavior::Lenient);
        }

        // Global functions
        env.add_function("timezone", functions::timezone);
        env.add_function("format", functions::format);
        env.add_function("parse", functions::parse);
        env.add_function("parse_in_location", functions::parse_in_location);
        env.add_function("zone_name", functions::zone_name);
        env.add_function("zone_offset", functions::zone_offset);
        env.add_function("aws_at", functions::aws_at);
        env.add_function("aws_cron", functions::aws_cron);
        env.add_function("unix_cron", functions::unix_cron);
        env.add_function("now", functions::now);
        env.add_function("time", functions::time);

        // The same conversions as filters; the piped value is the first argument
        env.add_filter("timezone", functions::timezone);
        env.add_filter("format", functions::format);
        env.add_filter("parse", functions::parse_filter);
        env.add_filter("parse_in_location", functions::parse_in_location_filter);
        env.add_filter("zone_name", functions::zone_name);
        env.add_filter("zone_offset", functions::zone_offset);
        env.add_filter("aws_at", functions::aws_at);
        env.add_filter("aws_cron", functions::aws_cron);
        env.add_filter("unix_cron", functions::unix_cron);

        env
    }

    /// Render a single template string
    ///
    /// `context` must serialize to a map; its keys become template variables.
    pub fn render_string(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: &str,
    ) -> Result<String> {
        debug!(template_name, strict = self.strict_mode, "rendering template");

        let mut env = self.create_environment();
        let to_error = |e: minijinja::Error| {
            EngineError::Template(TemplateError::from_minijinja(
                e,
                template_name,
                template,
                Some(context),
            ))
        };

        env.add_template_owned(template_name.to_string(), template.to_string())
            .map_err(to_error)?;
        let tmpl = env.get_template(template_name).map_err(to_error)?;

        let ctx = minijinja::Value::from_serialize(context);
        tmpl.render(ctx).map_err(to_error)
    }

    /// Render a template file
    pub fn render_file(&self, path: &std::path::Path, context: &serde_json::Value) -> Result<String> {
        let source = std::fs::read_to_string(path)?;
        self.render_string(&source, context, &path.to_string_lossy())
    }

    /// Evaluate a single expression such as `timezone(now(), "UTC")`
    pub fn eval_expression(&self, expression: &str, context: &serde_json::Value) -> Result<String> {
        let template = format!("{{{{ {} }}}}", expression);
        self.render_string(&template, context, "<expression>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateErrorKind;
    use serde_json::json;

    fn render(template: &str) -> Result<String> {
        Engine::new(true).render_string(template, &json!({}), "test.txt")
    }

    #[test]
    fn test_render_functions() {
        let result = render(r#"{{ timezone("2024-08-31T01:23:45Z", "Asia/Tokyo") }}"#).unwrap();
        assert_eq!(result, "2024-08-31T10:23:45+09:00");

        let result = render(r#"{{ parse(none, "2024-08-31T01:23:45+09:00") }}"#).unwrap();
        assert_eq!(result, "2024-08-31T01:23:45+09:00");

        let result = render(r#"{{ zone_offset("2024-08-31T01:23:45+09:00") }}"#).unwrap();
        assert_eq!(result, "32400");
    }

    #[test]
    fn test_render_filters() {
        let engine = Engine::new(true);
        let ctx = json!({ "deadline": "2024-08-31T01:23:45Z" });

        let result = engine
            .render_string(
                r#"{{ deadline | timezone("Asia/Tokyo") | format("2006-01-02 15:04 -0700") }}"#,
                &ctx,
                "test.txt",
            )
            .unwrap();
        assert_eq!(result, "2024-08-31 10:23 +0900");

        let result = engine
            .render_string(r#"{{ "Wed Aug  7 01:23:45 2024" | parse("ANSIC") }}"#, &ctx, "test.txt")
            .unwrap();
        assert_eq!(result, "2024-08-07T01:23:45Z");
    }

    #[test]
    fn test_render_schedule_document() {
        let engine = Engine::new(true);
        let ctx = json!({ "schedule": "0 * ? * FRI *", "run_at": "2024-08-31T01:23:45+09:00" });
        let template = "\
aws: {{ schedule | aws_cron }}
unix: {{ schedule | unix_cron }}
once: {{ run_at | aws_at }}
zone: {{ run_at | timezone(\"UTC\") | zone_name }}";

        let result = engine.render_string(template, &ctx, "schedule.txt").unwrap();
        insta::assert_snapshot!(result, @r"
        aws: cron(0 * ? * FRI *)
        unix: cron(0 * * * FRI)
        once: at(2024-08-31T01:23:45)
        zone: UTC
        ");
    }

    #[test]
    fn test_render_time_query() {
        let result = render(
            r#"{% set t = time(input="2023-02-15T16:35:00+09:00", output_location="America/Los_Angeles") %}{{ t.output }} {{ t.aws_cron }} {{ t.unix }}"#,
        )
        .unwrap();
        assert_eq!(result, "2023-02-14T23:35:00-08:00 35 23 14 2 ? 2023 1676446500");
    }

    #[test]
    fn test_time_query_rejects_unknown_kwargs() {
        let err = render(r#"{{ time(zone="UTC") }}"#).unwrap_err();
        assert!(matches!(err, EngineError::Template(_)));
    }

    #[test]
    fn test_conversion_error() {
        let err = render(r#"{{ aws_cron("0 12 * * * *") }}"#).unwrap_err();
        let EngineError::Template(err) = err else {
            panic!("expected template error");
        };
        assert_eq!(err.kind(), TemplateErrorKind::Conversion);
        assert_eq!(err.message, "exactly one of day-of-month and day-of-week must be '?'");
        assert!(err.suggestion.unwrap().contains("six fields"));
    }

    #[test]
    fn test_unknown_function_suggestion() {
        let err = render(r#"{{ timezon("2024-08-31T01:23:45Z", "UTC") }}"#).unwrap_err();
        let EngineError::Template(err) = err else {
            panic!("expected template error");
        };
        assert_eq!(err.kind(), TemplateErrorKind::UnknownFunction);
        assert_eq!(err.suggestion.as_deref(), Some("Did you mean `timezone`?"));
    }

    #[test]
    fn test_unknown_filter_suggestion() {
        let err = render(r#"{{ "2024-08-31T01:23:45Z" | zone_nam }}"#).unwrap_err();
        let EngineError::Template(err) = err else {
            panic!("expected template error");
        };
        assert_eq!(err.kind(), TemplateErrorKind::UnknownFilter);
        assert!(err.suggestion.unwrap().contains("`zone_name`"));
    }

    #[test]
    fn test_strict_and_lenient_undefined() {
        let err = render("{{ missing }}").unwrap_err();
        let EngineError::Template(err) = err else {
            panic!("expected template error");
        };
        assert_eq!(err.kind(), TemplateErrorKind::UndefinedVariable);

        let lenient = Engine::builder().strict(false).build();
        assert_eq!(lenient.render_string("[{{ missing }}]", &json!({}), "t").unwrap(), "[]");
    }

    #[test]
    fn test_eval_expression() {
        let engine = Engine::new(true);
        let result = engine
            .eval_expression(r#"unix_cron("0 12 * * ? *")"#, &json!({}))
            .unwrap();
        assert_eq!(result, "cron(0 12 * * *)");
    }
}
