//! Render command - render a template or a single expression

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use timeconv_engine::Engine;

use crate::display;
use crate::error::{CliError, Result};

#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Template file (`-` reads standard input)
    pub template: Option<PathBuf>,

    /// Evaluate a single expression instead of a template file
    #[arg(short = 'e', long = "expr", conflicts_with = "template")]
    pub expression: Option<String>,

    /// Context file(s) to merge (YAML or JSON)
    #[arg(short = 'f', long = "values")]
    pub values: Vec<PathBuf>,

    /// Set context variables on command line (key=value)
    #[arg(long = "set")]
    pub set: Vec<String>,

    /// Fail on undefined variables
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &RenderArgs, debug: bool) -> Result<()> {
    let context = build_context(&args.values, &args.set, debug)?;
    let engine = Engine::builder().strict(args.strict).build();

    let output = match (&args.expression, &args.template) {
        (Some(expression), _) => engine.eval_expression(expression, &context)?,
        (None, Some(path)) if path == Path::new("-") => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            engine.render_string(&source, &context, "<stdin>")?
        }
        (None, Some(path)) => engine.render_file(path, &context)?,
        (None, None) => {
            return Err(CliError::usage(
                "nothing to render",
                "Pass a template file, `-` for standard input, or -e with an expression",
            ));
        }
    };

    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
    Ok(())
}

/// Merge context files in order, then apply --set values as strings
fn build_context(files: &[PathBuf], set: &[String], debug: bool) -> Result<serde_json::Value> {
    let mut context = serde_json::Map::new();

    for path in files {
        let content = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_yaml::from_str(&content).map_err(|e| {
            CliError::input_with_help(
                format!("Failed to parse {}: {e}", path.display()),
                "Context files hold a YAML or JSON mapping",
            )
        })?;

        match value {
            serde_json::Value::Object(map) => context.extend(map),
            serde_json::Value::Null => {}
            _ => {
                return Err(CliError::input_with_help(
                    format!("{} is not a mapping", path.display()),
                    "Context files hold a YAML or JSON mapping",
                ));
            }
        }

        if debug {
            display::debug_note(&format!("Merged context from {}", path.display()));
        }
    }

    for arg in set {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            CliError::usage(
                format!("Invalid --set format: '{arg}'"),
                "Expected key=value",
            )
        })?;
        context.insert(key.trim().to_string(), serde_json::Value::String(value.to_string()));
    }

    Ok(serde_json::Value::Object(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_context_merges_files_then_set() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "deadline: 2024-08-31T01:23:45Z\nzone: UTC").unwrap();
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"zone": "Asia/Tokyo"}}"#).unwrap();

        let context = build_context(
            &[yaml.path().to_path_buf(), json.path().to_path_buf()],
            &["schedule=0 12 * * ? *".into()],
            false,
        )
        .unwrap();

        assert_eq!(context["deadline"], "2024-08-31T01:23:45Z");
        assert_eq!(context["zone"], "Asia/Tokyo");
        assert_eq!(context["schedule"], "0 12 * * ? *");
    }

    #[test]
    fn test_build_context_rejects_lists() {
        let mut yaml = tempfile::NamedTempFile::new().unwrap();
        writeln!(yaml, "- a\n- b").unwrap();
        let err = build_context(&[yaml.path().to_path_buf()], &[], false).unwrap_err();
        assert!(err.to_string().contains("is not a mapping"));
    }
}
