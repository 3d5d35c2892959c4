//! Trial test-definition library
//!
//! Provides the pieces a compiled test-specification binary links against:
//! - Suite declaration (`it`, `before_all`, `before_each`, `after_all`, `after_each`)
//! - Outcome normalization for synchronous, deferred (`Future`) and
//!   lazy-sequence (`Stream`) test bodies
//! - A strictly sequential runner with per-test timing and failure isolation
//! - Matcher-style assertions (`expect(..).to_equal(..)`)
//! - Console and JSON reporters
//!
//! # Example
//!
//! ```no_run
//! use trial_core::{expect, Outcome};
//!
//! let summary = trial_core::run("arithmetic", |suite| {
//!     suite.it("adds", || expect(1 + 1).to_equal(2));
//!     suite.it("waits", || {
//!         Outcome::deferred(async {
//!             tokio::time::sleep(std::time::Duration::from_millis(5)).await;
//!         })
//!     });
//! })
//! .unwrap();
//!
//! std::process::exit(if summary.all_passed() { 0 } else { 1 });
//! ```

pub mod async_runtime;
pub mod callback;
pub mod expect;
pub mod failure;
pub mod normalize;
mod panic_guard;
pub mod reporter;
pub mod result;
pub mod runner;
pub mod suite;

use thiserror::Error;

/// Errors raised while declaring or starting a suite.
///
/// Failures inside tests and hooks never surface here; they are recorded
/// in the [`Summary`].
#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Test '{0}' is declared more than once")]
    DuplicateTest(String),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result type for suite operations
pub type TrialResult<T> = Result<T, TrialError>;

pub use callback::{Emission, IntoOutcome, IntoVerdict, Outcome, TestCallback, Verdict};
pub use expect::{expect, expect_fn, Expectation, FnExpectation};
pub use failure::Failure;
pub use normalize::normalize;
pub use reporter::{reporter_from_env, ConsoleReporter, JsonReporter, Reporter};
pub use result::{format_elapsed, ExecResult, Summary, TimedResult};
pub use runner::{Phase, Runner, TestStep};
pub use suite::{DuplicatePolicy, HookKind, Suite};

/// Run a suite on the current task with the reporter chosen by `TRIAL_REPORTER`.
pub async fn describe<F>(suite_name: &str, declare: F) -> TrialResult<Summary>
where
    F: FnOnce(&mut Suite),
{
    let mut runner = Runner::new(reporter_from_env());
    runner.run_suite(suite_name, declare).await
}

/// Blocking entry point for test binaries.
///
/// Builds a single-threaded runtime, so test bodies may hold `Rc`/`RefCell`
/// state across await points.
pub fn run<F>(suite_name: &str, declare: F) -> TrialResult<Summary>
where
    F: FnOnce(&mut Suite),
{
    async_runtime::block_on(describe(suite_name, declare))?
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Logs go to stderr so they never interleave with a JSON report on stdout.
/// Calling this more than once is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
