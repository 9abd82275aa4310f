//! timeconv CLI - time zone, layout and AWS/Unix cron conversions

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::query::QueryArgs;
use commands::render::RenderArgs;

#[derive(Parser)]
#[command(name = "timeconv")]
#[command(version)]
#[command(about = "Time zone, layout and AWS/Unix cron conversions", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an RFC3339 timestamp to another time zone
    Timezone {
        /// RFC3339 timestamp
        timestamp: String,
        /// Zone name (`UTC`, `Local` or an IANA name)
        zone: String,
    },

    /// Format an RFC3339 timestamp with a reference layout
    Format {
        timestamp: String,
        /// Layout such as `2006-01-02 15:04:05` or a name such as `ANSIC`
        layout: String,
    },

    /// Parse a time string into RFC3339
    Parse {
        input: String,
        /// Layout of the input (RFC3339 by default)
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// Parse a time string, reading zone-less input in a time zone
    ParseInLocation {
        input: String,
        zone: String,
        /// Layout of the input (RFC3339 by default)
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// Print the zone abbreviation of an RFC3339 timestamp
    ZoneName { timestamp: String },

    /// Print the UTC offset of an RFC3339 timestamp in seconds
    ZoneOffset { timestamp: String },

    /// Build an EventBridge Scheduler at() expression
    AwsAt { timestamp: String },

    /// Validate and normalize an AWS cron expression
    AwsCron {
        /// Six-field expression, optionally wrapped in cron(...)
        expression: String,
    },

    /// Translate an AWS cron expression to Unix cron
    UnixCron { expression: String },

    /// Compute a full time report
    Query(QueryArgs),

    /// Render a template with the time functions available
    Render(RenderArgs),

    /// List the functions available in templates
    Functions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    match cli.command {
        Commands::Timezone { timestamp, zone } => commands::convert::timezone(&timestamp, &zone),
        Commands::Format { timestamp, layout } => commands::convert::format(&timestamp, &layout),
        Commands::Parse { input, layout } => commands::convert::parse(layout.as_deref(), &input),
        Commands::ParseInLocation {
            input,
            zone,
            layout,
        } => commands::convert::parse_in_location(layout.as_deref(), &input, &zone),
        Commands::ZoneName { timestamp } => commands::convert::zone_name(&timestamp),
        Commands::ZoneOffset { timestamp } => commands::convert::zone_offset(&timestamp),
        Commands::AwsAt { timestamp } => commands::convert::aws_at(&timestamp),
        Commands::AwsCron { expression } => commands::convert::aws_cron(&expression),
        Commands::UnixCron { expression } => commands::convert::unix_cron(&expression),
        Commands::Query(args) => commands::query::run(&args, cli.debug),
        Commands::Render(args) => commands::render::run(&args, cli.debug),
        Commands::Functions { json } => commands::functions::run(json),
    }
}

fn main() -> ExitCode {
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
