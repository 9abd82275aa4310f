//! Display formatting for CLI output

use console::style;
use timeconv_core::TimeReport;

/// Print a time report as aligned `key: value` lines
pub fn print_report(report: &TimeReport) {
    for (key, value) in report_rows(report) {
        println!("{:>15} {}", style(format!("{key}:")).cyan().bold(), value);
    }
}

fn report_rows(report: &TimeReport) -> Vec<(&'static str, String)> {
    vec![
        ("input", report.input.clone().unwrap_or_else(|| "(now)".to_string())),
        ("input_format", report.input_format.clone()),
        ("input_location", report.input_location.clone()),
        ("output", report.output.clone()),
        ("output_format", report.output_format.clone()),
        ("output_location", report.output_location.clone()),
        ("aws_cron", report.aws_cron.clone()),
        ("aws_at", report.aws_at.clone()),
        ("unix", report.unix.to_string()),
    ]
}

/// Print the registered template functions with their call shapes
pub fn print_functions(signatures: &[(&str, &str)], filters: &[&str]) {
    println!("{}", style("Functions").cyan().bold());
    for (name, signature) in signatures {
        let filter_marker = if filters.contains(name) {
            style(" (filter)").dim().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", style("•").green(), signature, filter_marker);
    }
}

/// Print a one-line debug note to stderr
pub fn debug_note(message: &str) {
    eprintln!("{} {}", style("DEBUG").dim(), message);
}
