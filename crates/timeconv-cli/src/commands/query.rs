//! Query command - compute a full time report

use std::path::PathBuf;

use clap::Args;
use timeconv_core::TimeQuery;

use crate::display;
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Query file (YAML, or JSON when the extension is .json)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Time to convert (defaults to now)
    #[arg(long)]
    pub input: Option<String>,

    /// Layout of --input
    #[arg(long)]
    pub input_format: Option<String>,

    /// Location for zone-less input
    #[arg(long, env = "TIMECONV_INPUT_LOCATION")]
    pub input_location: Option<String>,

    /// Layout of the output time
    #[arg(long)]
    pub output_format: Option<String>,

    /// Location the output time is shown in
    #[arg(long, env = "TIMECONV_OUTPUT_LOCATION")]
    pub output_location: Option<String>,

    /// Set query fields on command line (key=value, key=null clears)
    #[arg(long = "set")]
    pub set: Vec<String>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// Build the query: file first, then individual flags, then --set
    fn to_query(&self, debug: bool) -> Result<TimeQuery> {
        let mut query = match &self.file {
            Some(path) => {
                if debug {
                    display::debug_note(&format!("Loaded query from {}", path.display()));
                }
                TimeQuery::from_file(path)?
            }
            None => TimeQuery::default(),
        };

        let flags = [
            (&mut query.input, &self.input),
            (&mut query.input_format, &self.input_format),
            (&mut query.input_location, &self.input_location),
            (&mut query.output_format, &self.output_format),
            (&mut query.output_location, &self.output_location),
        ];
        for (slot, flag) in flags {
            if flag.is_some() {
                *slot = flag.clone();
            }
        }

        if !self.set.is_empty() {
            query.apply_overrides(&self.set)?;
            if debug {
                display::debug_note(&format!("Applied {} --set values", self.set.len()));
            }
        }

        Ok(query)
    }
}

pub fn run(args: &QueryArgs, debug: bool) -> Result<()> {
    let query = args.to_query(debug)?;
    tracing::debug!(?query, "running time query");

    let report = query.evaluate()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display::print_report(&report);
    }
    Ok(())
}
