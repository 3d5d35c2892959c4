//! Execution records - per-callback results, timing and the suite summary

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one executed callback (hook or test)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    name: String,
    passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
}

impl ExecResult {
    /// A passing result
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error_detail: None,
        }
    }

    /// A failing result carrying a rendered error block
    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error_detail: Some(detail.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Rendered failure, present only when the callback failed
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }
}

/// A test result together with its elapsed time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedResult {
    #[serde(flatten)]
    result: ExecResult,
    timing: String,
}

impl TimedResult {
    pub fn new(result: ExecResult, elapsed: Duration) -> Self {
        Self {
            result,
            timing: format_elapsed(elapsed),
        }
    }

    pub fn result(&self) -> &ExecResult {
        &self.result
    }

    pub fn name(&self) -> &str {
        self.result.name()
    }

    pub fn passed(&self) -> bool {
        self.result.passed()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.result.error_detail()
    }

    /// Elapsed seconds with millisecond precision, e.g. `"0.012"`
    pub fn timing(&self) -> &str {
        &self.timing
    }
}

/// Format an elapsed duration as seconds with exactly three decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.is_zero() {
        return "0.000".to_string();
    }
    format!("{:.3}", elapsed.as_secs_f64())
}

/// Ordered results of one suite run, one entry per test in registration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    suite: String,
    results: Vec<TimedResult>,
}

impl Summary {
    pub(crate) fn new(suite: impl Into<String>, results: Vec<TimedResult>) -> Self {
        Self {
            suite: suite.into(),
            results,
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn results(&self) -> &[TimedResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of passing tests
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Number of failing tests
    pub fn failed(&self) -> usize {
        self.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(TimedResult::passed)
    }
}

impl<'a> IntoIterator for &'a Summary {
    type Item = &'a TimedResult;
    type IntoIter = std::slice::Iter<'a, TimedResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
