//! Test reporter - display suite progress and results

use crate::result::{ExecResult, Summary, TimedResult};
use crate::suite::HookKind;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::io::{self, Write};
use std::time::Duration;

/// Receives suite events from the runner.
///
/// Implement this trait to customize output (JSON, TAP, etc.).
pub trait Reporter {
    /// Called before the suite is declared
    fn on_suite_start(&mut self, suite: &str);

    /// Called right before a test body runs
    fn on_test_start(&mut self, _name: &str) {}

    /// Called once per test, before its `afterEach` hook
    fn on_test_complete(&mut self, result: &TimedResult);

    /// Called after every registered hook invocation
    fn on_hook_complete(&mut self, _kind: HookKind, _result: &ExecResult) {}

    /// Called with the finished summary
    fn on_suite_complete(&mut self, summary: &Summary);
}

impl Reporter for Box<dyn Reporter> {
    fn on_suite_start(&mut self, suite: &str) {
        (**self).on_suite_start(suite)
    }

    fn on_test_start(&mut self, name: &str) {
        (**self).on_test_start(name)
    }

    fn on_test_complete(&mut self, result: &TimedResult) {
        (**self).on_test_complete(result)
    }

    fn on_hook_complete(&mut self, kind: HookKind, result: &ExecResult) {
        (**self).on_hook_complete(kind, result)
    }

    fn on_suite_complete(&mut self, summary: &Summary) {
        (**self).on_suite_complete(summary)
    }
}

/// Pick a reporter from the environment.
///
/// `TRIAL_REPORTER=json` selects [`JsonReporter`]; anything else the console
/// reporter. `TRIAL_VERBOSE` and `NO_COLOR` tune the console output.
pub fn reporter_from_env() -> Box<dyn Reporter> {
    match env::var("TRIAL_REPORTER").map(|v| v.to_lowercase()) {
        Ok(kind) if kind == "json" => Box::new(JsonReporter::new()),
        _ => Box::new(
            ConsoleReporter::new(flag_enabled("TRIAL_VERBOSE"))
                .with_no_color(env::var("NO_COLOR").is_ok()),
        ),
    }
}

/// Unset, empty, `0`, `false`, `off` and `no` are off; anything else is on.
fn flag_enabled(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !matches!(
            value.trim().to_lowercase().as_str(),
            "" | "0" | "false" | "off" | "no"
        ),
        Err(_) => false,
    }
}

/// Colored console reporter with a spinner for the running test
pub struct ConsoleReporter {
    /// Print passing hooks and per-test timing
    verbose: bool,
    /// Disable colored output
    no_color: bool,
    spinner: Option<ProgressBar>,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            no_color: false,
            spinner: None,
        }
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        if no_color {
            colored::control::set_override(false);
        }
        self
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn on_suite_start(&mut self, suite: &str) {
        println!("{} {}", "Running".bold(), suite.cyan().bold());
        println!();
    }

    fn on_test_start(&mut self, name: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.green} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(name.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn on_test_complete(&mut self, result: &TimedResult) {
        self.stop_spinner();

        if result.passed() {
            if self.verbose {
                println!(
                    "{} {} ({}s)",
                    "✔".green().bold(),
                    result.name(),
                    result.timing()
                );
            } else {
                println!("{} {}", "✔".green().bold(), result.name());
            }
        } else {
            println!("{} {}", "✖".red().bold(), result.name().red());
            if let Some(detail) = result.error_detail() {
                for line in detail.lines() {
                    eprintln!("    {}", line);
                }
            }
        }
        let _ = io::stdout().flush();
    }

    fn on_hook_complete(&mut self, kind: HookKind, result: &ExecResult) {
        if !result.passed() {
            eprintln!("{} {} hook failed", "⚠".yellow().bold(), kind);
            if let Some(detail) = result.error_detail() {
                for line in detail.lines() {
                    eprintln!("    {}", line.dimmed());
                }
            }
        } else if self.verbose {
            println!("  {} {}", "·".dimmed(), result.name().dimmed());
        }
    }

    fn on_suite_complete(&mut self, summary: &Summary) {
        self.stop_spinner();
        println!();
        println!("{}", "─".repeat(50));

        let status = if summary.all_passed() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!(
            "Test result: {} | {} total, {} passed, {} failed",
            status,
            summary.len().to_string().bold(),
            summary.passed().to_string().green().bold(),
            if summary.failed() > 0 {
                summary.failed().to_string().red().bold()
            } else {
                summary.failed().to_string().normal()
            }
        );
        println!();
        print!("{}", render_table(summary));

        if self.no_color {
            colored::control::unset_override();
        }
    }
}

/// Render the summary as a `Pass | Test Name | Time` table.
pub fn render_table(summary: &Summary) -> String {
    const PASS: &str = "Pass";
    const NAME: &str = "Test Name";
    const TIME: &str = "Time";

    let name_width = summary
        .iter()
        .map(|r| r.name().chars().count())
        .chain(std::iter::once(NAME.len()))
        .max()
        .unwrap_or(NAME.len());
    let time_width = summary
        .iter()
        .map(|r| r.timing().len())
        .chain(std::iter::once(TIME.len()))
        .max()
        .unwrap_or(TIME.len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} | {:<name_width$} | {:>time_width$}\n",
        PASS,
        NAME,
        TIME,
        name_width = name_width,
        time_width = time_width
    ));
    out.push_str(&format!(
        "{}-|-{}-|-{}\n",
        "-".repeat(4),
        "-".repeat(name_width),
        "-".repeat(time_width)
    ));
    for result in summary {
        let mark = if result.passed() {
            format!("{:<4}", "✔").green()
        } else {
            format!("{:<4}", "✖").red()
        };
        out.push_str(&format!(
            "{} | {:<name_width$} | {:>time_width$}\n",
            mark,
            result.name(),
            result.timing(),
            name_width = name_width,
            time_width = time_width
        ));
    }
    out
}

/// Writes the summary as one JSON document once the suite completes
pub struct JsonReporter {
    out: Box<dyn Write>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    /// Report to stdout
    pub fn new() -> Self {
        Self::to_writer(io::stdout())
    }

    pub fn to_writer(out: impl Write + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Discard all output
    pub fn quiet() -> Self {
        Self::to_writer(io::sink())
    }
}

impl Reporter for JsonReporter {
    fn on_suite_start(&mut self, _suite: &str) {}

    fn on_test_complete(&mut self, _result: &TimedResult) {}

    fn on_suite_complete(&mut self, summary: &Summary) {
        let report = serde_json::json!({
            "suite": summary.suite(),
            "tests": summary.len(),
            "passed": summary.passed(),
            "failed": summary.failed(),
            "results": summary.results(),
        });
        if let Err(err) = writeln!(self.out, "{}", report) {
            tracing::error!(error = %err, "failed to write JSON report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ExecResult;
    use serial_test::serial;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn summary() -> Summary {
        Summary::new(
            "math",
            vec![
                TimedResult::new(ExecResult::pass("adds"), Duration::from_millis(12)),
                TimedResult::new(ExecResult::fail("divides", "boom"), Duration::ZERO),
            ],
        )
    }

    #[test]
    #[serial]
    fn test_table_layout() {
        colored::control::set_override(false);
        let table = render_table(&summary());
        colored::control::unset_override();

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Pass | Test Name |  Time");
        assert!(lines[2].contains("adds"));
        assert!(lines[2].ends_with("0.012"));
        assert!(lines[3].contains("divides"));
        assert!(lines[3].ends_with("0.000"));
    }

    #[test]
    fn test_json_reporter_writes_summary() {
        let buf = SharedBuf::default();
        let mut reporter = JsonReporter::to_writer(buf.clone());
        reporter.on_suite_complete(&summary());

        let written = String::from_utf8(buf.0.borrow().clone()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["suite"], "math");
        assert_eq!(json["tests"], 2);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["results"][1]["error_detail"], "boom");
    }

    #[test]
    fn test_console_reporter_smoke() {
        let mut reporter = ConsoleReporter::new(true).with_no_color(true);
        reporter.on_suite_start("math");
        reporter.on_test_start("adds");
        for result in summary().iter() {
            reporter.on_test_complete(result);
        }
        reporter.on_suite_complete(&summary());
    }

    #[test]
    #[serial]
    fn test_verbose_flag_values() {
        for (value, on) in [("1", true), ("yes", true), ("0", false), ("off", false), ("", false)] {
            env::set_var("TRIAL_VERBOSE", value);
            assert_eq!(flag_enabled("TRIAL_VERBOSE"), on, "TRIAL_VERBOSE={:?}", value);
        }
        env::remove_var("TRIAL_VERBOSE");
        assert!(!flag_enabled("TRIAL_VERBOSE"));
    }

    #[test]
    #[serial]
    fn test_reporter_from_env_accepts_any_value() {
        for value in ["json", "JSON", "console", "bogus"] {
            env::set_var("TRIAL_REPORTER", value);
            let mut reporter = reporter_from_env();
            reporter.on_suite_start("env");
        }
        env::remove_var("TRIAL_REPORTER");
    }
}
