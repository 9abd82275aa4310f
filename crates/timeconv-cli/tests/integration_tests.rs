//! Integration tests for CLI commands

use std::process::Command;

/// Helper to run timeconv command
fn timeconv(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_timeconv"))
        .args(args)
        .env("TZ", "UTC")
        .env_remove("TIMECONV_INPUT_LOCATION")
        .env_remove("TIMECONV_OUTPUT_LOCATION")
        .output()
        .expect("Failed to execute timeconv")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")
}

mod conversion_commands {
    use super::*;

    #[test]
    fn test_timezone() {
        let output = timeconv(&["timezone", "2024-08-31T01:23:45Z", "Asia/Tokyo"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "2024-08-31T10:23:45+09:00\n");
    }

    #[test]
    fn test_format() {
        let output = timeconv(&["format", "2024-08-31T01:23:45+09:00", "Mon, 02 Jan 2006 15:04"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "Sat, 31 Aug 2024 01:23\n");
    }

    #[test]
    fn test_parse_named_layout() {
        let output = timeconv(&["parse", "Wed Aug  7 01:23:45 2024", "--layout", "ANSIC"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "2024-08-07T01:23:45Z\n");
    }

    #[test]
    fn test_unnamed_offset_zone_renders_numerically() {
        let output = timeconv(&["format", "2024-08-31T01:23:45+09:00", "MST"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "+0900\n");

        let output = timeconv(&["zone-name", "2024-08-31T01:23:45+09:00"]);
        assert_eq!(stdout(&output), "\n");
    }

    #[test]
    fn test_parse_abbreviation_uses_system_zone() {
        let output = Command::new(env!("CARGO_BIN_EXE_timeconv"))
            .args([
                "parse",
                "2024-08-31 01:23:45 JST",
                "--layout",
                "2006-01-02 15:04:05 MST",
            ])
            .env("TZ", "Asia/Tokyo")
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(stdout(&output), "2024-08-31T01:23:45+09:00\n");

        let output = timeconv(&[
            "parse",
            "2024-08-31 01:23:45 JST",
            "--layout",
            "2006-01-02 15:04:05 MST",
        ]);
        assert_eq!(stdout(&output), "2024-08-31T01:23:45Z\n");
    }

    #[test]
    fn test_parse_in_location() {
        let output = timeconv(&[
            "parse-in-location",
            "2024-08-31 01:23:45",
            "Asia/Tokyo",
            "-l",
            "2006-01-02 15:04:05",
        ]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "2024-08-31T01:23:45+09:00\n");
    }

    #[test]
    fn test_zone_offset_and_name() {
        let output = timeconv(&["zone-offset", "2024-08-31T01:23:45-07:00"]);
        assert_eq!(stdout(&output), "-25200\n");

        let output = timeconv(&["zone-name", "2024-08-31T01:23:45Z"]);
        assert_eq!(stdout(&output), "UTC\n");
    }

    #[test]
    fn test_aws_at() {
        let output = timeconv(&["aws-at", "2024-08-31T01:23:45+09:00"]);
        assert_eq!(stdout(&output), "at(2024-08-31T01:23:45)\n");
    }

    #[test]
    fn test_cron_translation() {
        let output = timeconv(&["aws-cron", "cron(0 12 ? * MON-FRI *)"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "cron(0 12 ? * MON-FRI *)\n");

        let output = timeconv(&["unix-cron", "0/15 0 ? * 2-6 *"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "cron(0-59/15 0 * * 1-5)\n");

        let output = timeconv(&["unix-cron", "0 18 L * ? *"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "cron(0 18 L * *)\n");
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn test_unknown_zone_is_input_error() {
        let output = timeconv(&["timezone", "2024-08-31T01:23:45Z", "Mars/Base"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("unknown time zone Mars/Base"));
    }

    #[test]
    fn test_unparsable_input_shows_layouts() {
        let output = timeconv(&["parse", "yesterday"]);
        assert_eq!(output.status.code(), Some(2));
        let err = stderr(&output);
        assert!(err.contains("parsing time"));
        assert!(err.contains("RFC3339"));
    }

    #[test]
    fn test_malformed_cron() {
        let output = timeconv(&["unix-cron", "0 12 L * ?"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("expected 6 fields"));
    }

    #[test]
    fn test_usage_error() {
        let output = timeconv(&["timezone"]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let output = timeconv(&["query", "-f", "/nonexistent/query.yaml"]);
        assert_eq!(output.status.code(), Some(5));
    }
}

mod query_command {
    use super::*;

    #[test]
    fn test_query_from_file_as_json() {
        let output = timeconv(&[
            "query",
            "-f",
            &format!("{}/tokyo-to-utc.yaml", fixtures_path()),
            "--json",
        ]);
        assert!(output.status.success(), "{}", stderr(&output));

        let json: serde_json::Value =
            serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
        assert_eq!(json["output"], "14 Feb 23 22:36 UTC");
        assert_eq!(json["aws_cron"], "36 22 14 2 ? 2023");
        assert_eq!(json["aws_at"], "at(2023-02-14T22:36:05)");
        assert_eq!(json["unix"], 1676414165);
    }

    #[test]
    fn test_query_flags_and_set() {
        let output = timeconv(&[
            "query",
            "--input",
            "2023-02-15T16:35:00+09:00",
            "--output-location",
            "UTC",
            "--set",
            "output_location=America/Los_Angeles",
            "--json",
        ]);
        assert!(output.status.success(), "{}", stderr(&output));

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["output"], "2023-02-14T23:35:00-08:00");
        assert_eq!(json["output_location"], "America/Los_Angeles");
    }

    #[test]
    fn test_query_location_from_env() {
        let output = Command::new(env!("CARGO_BIN_EXE_timeconv"))
            .args(["query", "--input", "2024-08-31T01:23:45Z", "--json"])
            .env("TIMECONV_INPUT_LOCATION", "UTC")
            .env("TIMECONV_OUTPUT_LOCATION", "Asia/Tokyo")
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", stderr(&output));

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["output"], "2024-08-31T10:23:45+09:00");
    }

    #[test]
    fn test_query_human_output() {
        let output = timeconv(&[
            "query",
            "--input",
            "2023-02-15T16:35:00+09:00",
            "--input-location",
            "UTC",
            "--output-location",
            "UTC",
        ]);
        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("2023-02-15T07:35:00Z"));
        assert!(out.contains("35 7 15 2 ? 2023"));
    }
}

mod render_command {
    use super::*;

    #[test]
    fn test_render_template_file() {
        let output = timeconv(&[
            "render",
            &format!("{}/schedule.txt", fixtures_path()),
            "--set",
            "schedule=0 9 ? * MON *",
            "--set",
            "deadline=2024-08-31T01:23:45Z",
        ]);
        assert!(output.status.success(), "{}", stderr(&output));
        insta::assert_snapshot!(stdout(&output), @r"
        schedule: cron(0 9 ? * MON *)
        unix: cron(0 9 * * MON)
        deadline: 2024-08-31 10:23
        ");
    }

    #[test]
    fn test_render_expression() {
        let output = timeconv(&["render", "-e", r#"aws_at("2024-08-31T01:23:45Z")"#]);
        assert!(output.status.success());
        assert_eq!(stdout(&output), "at(2024-08-31T01:23:45)\n");
    }

    #[test]
    fn test_render_strict_undefined() {
        let output = timeconv(&["render", "--strict", "-e", "missing | aws_at"]);
        assert_eq!(output.status.code(), Some(3));
    }

    #[test]
    fn test_render_typo_suggestion() {
        let output = timeconv(&["render", "-e", r#"unixcron("0 12 * * ? *")"#]);
        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("unix_cron"));
    }

    #[test]
    fn test_render_nothing() {
        let output = timeconv(&["render"]);
        assert_eq!(output.status.code(), Some(64));
    }
}

mod functions_command {
    use super::*;

    #[test]
    fn test_functions_json() {
        let output = timeconv(&["functions", "--json"]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"unix_cron"));
        assert!(names.contains(&"time"));
    }
}
