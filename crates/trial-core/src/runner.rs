//! Test runner - execute a declared suite strictly in order

use crate::normalize::normalize;
use crate::reporter::Reporter;
use crate::result::{Summary, TimedResult};
use crate::suite::{DuplicatePolicy, HookKind, Hooks, Suite};
use crate::TrialResult;
use std::time::Instant;

/// Step within a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStep {
    BeforeEach,
    Body,
    AfterEach,
}

/// Where the runner is in a suite run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    DeclaringTests,
    RunningBeforeAll,
    RunningTest { index: usize, step: TestStep },
    RunningAfterAll,
    Done,
}

/// Sequential suite runner.
///
/// Each hook and test is awaited to completion before the next one starts.
/// Failures only change what gets recorded, never which steps run.
pub struct Runner<R: Reporter> {
    reporter: R,
    policy: DuplicatePolicy,
    phase: Phase,
}

impl<R: Reporter> Runner<R> {
    /// Create a runner reporting to `reporter`
    pub fn new(reporter: R) -> Self {
        Self {
            reporter,
            policy: DuplicatePolicy::default(),
            phase: Phase::Idle,
        }
    }

    /// Set how duplicate test names are treated
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Declare and run a suite, returning its summary.
    ///
    /// `declare` runs synchronously before any hook. The only error is a
    /// declaration error; nothing raised by a test or hook is returned here.
    pub async fn run_suite<F>(&mut self, suite_name: &str, declare: F) -> TrialResult<Summary>
    where
        F: FnOnce(&mut Suite),
    {
        self.phase = Phase::Idle;
        self.reporter.on_suite_start(suite_name);

        self.enter(Phase::DeclaringTests);
        let mut suite = Suite::with_policy(self.policy);
        declare(&mut suite);
        let (tests, mut hooks) = match suite.into_parts() {
            Ok(parts) => parts,
            Err(err) => {
                self.phase = Phase::Idle;
                return Err(err);
            }
        };
        tracing::debug!(suite = suite_name, tests = tests.len(), "suite declared");

        self.enter(Phase::RunningBeforeAll);
        self.run_hook(HookKind::BeforeAll, &mut hooks, None).await;

        let mut results = Vec::with_capacity(tests.len());
        for (index, (name, mut callback)) in tests.into_iter().enumerate() {
            self.enter(Phase::RunningTest {
                index,
                step: TestStep::BeforeEach,
            });
            self.run_hook(HookKind::BeforeEach, &mut hooks, Some(&name))
                .await;

            self.enter(Phase::RunningTest {
                index,
                step: TestStep::Body,
            });
            self.reporter.on_test_start(&name);
            let start = Instant::now();
            let result = normalize(&name, Some(&mut callback)).await;
            let timed = TimedResult::new(result, start.elapsed());
            self.reporter.on_test_complete(&timed);

            self.enter(Phase::RunningTest {
                index,
                step: TestStep::AfterEach,
            });
            self.run_hook(HookKind::AfterEach, &mut hooks, Some(&name))
                .await;

            results.push(timed);
        }

        self.enter(Phase::RunningAfterAll);
        self.run_hook(HookKind::AfterAll, &mut hooks, None).await;

        self.enter(Phase::Done);
        let summary = Summary::new(suite_name, results);
        self.reporter.on_suite_complete(&summary);
        Ok(summary)
    }

    async fn run_hook(&mut self, kind: HookKind, hooks: &mut Hooks, test: Option<&str>) {
        let Some(callback) = hooks.get_mut(kind) else {
            return;
        };
        let name = match test {
            Some(test) => format!("{} ({})", kind, test),
            None => kind.label().to_string(),
        };
        let result = normalize(&name, Some(callback)).await;
        if !result.passed() {
            tracing::debug!(hook = %kind, "hook failed");
        }
        self.reporter.on_hook_complete(kind, &result);
    }

    fn enter(&mut self, next: Phase) {
        tracing::debug!(from = ?self.phase, to = ?next, "runner phase");
        self.phase = next;
    }
}
