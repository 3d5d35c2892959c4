//! End-to-end suite runs against a recording reporter

use futures_util::stream;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use trial_core::{
    expect, DuplicatePolicy, Emission, ExecResult, Failure, HookKind, Outcome, Reporter, Runner,
    Summary, TimedResult, TrialError,
};

/// Records every reporter event as a short line
#[derive(Clone, Default)]
struct RecordingReporter {
    events: Rc<RefCell<Vec<String>>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn on_suite_start(&mut self, suite: &str) {
        self.push(format!("suite:{}", suite));
    }

    fn on_test_start(&mut self, name: &str) {
        self.push(format!("start:{}", name));
    }

    fn on_test_complete(&mut self, result: &TimedResult) {
        let status = if result.passed() { "pass" } else { "fail" };
        self.push(format!("{}:{}", status, result.name()));
    }

    fn on_hook_complete(&mut self, kind: HookKind, result: &ExecResult) {
        let status = if result.passed() { "ok" } else { "failed" };
        self.push(format!("hook:{}:{}", kind, status));
    }

    fn on_suite_complete(&mut self, summary: &Summary) {
        self.push(format!("done:{}", summary.len()));
    }
}

fn names(summary: &Summary) -> Vec<&str> {
    summary.iter().map(|r| r.name()).collect()
}

#[tokio::test]
async fn test_mixed_suite_records_each_shape() {
    let reporter = RecordingReporter::default();
    let mut runner = Runner::new(reporter.clone());

    let summary = runner
        .run_suite("mixed", |suite| {
            suite.it("a", || {});
            suite.it("b", || -> trial_core::Verdict { panic!("boom") });
            suite.it("c", || {
                Outcome::deferred(async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                })
            });
        })
        .await
        .unwrap();

    assert_eq!(names(&summary), vec!["a", "b", "c"]);
    assert_eq!(summary.passed(), 2);
    assert_eq!(summary.failed(), 1);

    let b = &summary.results()[1];
    assert!(!b.passed());
    let detail = b.error_detail().unwrap();
    assert!(detail.contains("\"b\" failed."));
    assert!(detail.contains("boom"));

    let c = &summary.results()[2];
    assert!(c.passed());
    let seconds: f64 = c.timing().parse().unwrap();
    assert!(seconds >= 0.02, "timing was {}", c.timing());

    assert_eq!(
        reporter.events(),
        vec![
            "suite:mixed",
            "start:a",
            "pass:a",
            "start:b",
            "fail:b",
            "start:c",
            "pass:c",
            "done:3",
        ]
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
#[tokio::test]
async fn test_hook_counts(#[case] tests: usize) {
    let counts: Rc<[Cell<usize>; 4]> = Rc::new(Default::default());
    let mut runner = Runner::new(RecordingReporter::default());

    let summary = runner
        .run_suite("hooks", |suite| {
            for (slot, kind) in HookKind::ALL.into_iter().enumerate() {
                let counts = Rc::clone(&counts);
                let hook = move || counts[slot].set(counts[slot].get() + 1);
                match kind {
                    HookKind::BeforeAll => suite.before_all(hook),
                    HookKind::BeforeEach => suite.before_each(hook),
                    HookKind::AfterAll => suite.after_all(hook),
                    HookKind::AfterEach => suite.after_each(hook),
                };
            }
            for i in 0..tests {
                suite.it(format!("test {}", i), || {});
            }
        })
        .await
        .unwrap();

    assert_eq!(summary.len(), tests);
    let observed: Vec<usize> = counts.iter().map(Cell::get).collect();
    // Slots follow HookKind::ALL: beforeAll, beforeEach, afterAll, afterEach
    assert_eq!(observed, vec![1, tests, 1, tests]);
}

#[tokio::test]
async fn test_hooks_wrap_each_test_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut runner = Runner::new(RecordingReporter::default());

    let record = |log: &Rc<RefCell<Vec<String>>>, entry: &'static str| {
        let log = Rc::clone(log);
        move || log.borrow_mut().push(entry.to_string())
    };

    runner
        .run_suite("order", |suite| {
            suite
                .before_all(record(&log, "beforeAll"))
                .before_each(record(&log, "beforeEach"))
                .after_each(record(&log, "afterEach"))
                .after_all(record(&log, "afterAll"))
                .it("one", record(&log, "one"))
                .it("two", record(&log, "two"));
        })
        .await
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "beforeAll",
            "beforeEach",
            "one",
            "afterEach",
            "beforeEach",
            "two",
            "afterEach",
            "afterAll",
        ]
    );
}

#[tokio::test]
async fn test_failing_hooks_do_not_stop_the_suite() {
    let reporter = RecordingReporter::default();
    let mut runner = Runner::new(reporter.clone());

    let summary = runner
        .run_suite("hook failures", |suite| {
            suite
                .before_all(|| -> () { panic!("setup exploded") })
                .after_each(|| Err::<(), _>(Failure::message("cleanup failed")))
                .it("still runs", || expect(1).to_equal(1));
        })
        .await
        .unwrap();

    assert!(summary.all_passed());
    assert_eq!(
        reporter.events(),
        vec![
            "suite:hook failures",
            "hook:beforeAll:failed",
            "start:still runs",
            "pass:still runs",
            "hook:afterEach:failed",
            "done:1",
        ]
    );
}

#[tokio::test]
async fn test_hooks_still_bracket_failing_steps() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut runner = Runner::new(RecordingReporter::default());

    let push = |log: &Rc<RefCell<Vec<String>>>, entry: &'static str| {
        let log = Rc::clone(log);
        move || log.borrow_mut().push(entry.to_string())
    };

    let summary = {
        let before = push(&log, "beforeEach");
        let body = push(&log, "body");
        let after = push(&log, "afterEach");
        runner
            .run_suite("failing steps", move |suite| {
                suite
                    .before_each(move || -> trial_core::Verdict {
                        before();
                        Err(Failure::message("setup failed"))
                    })
                    .after_each(after)
                    .it("panics", move || -> trial_core::Verdict {
                        body();
                        panic!("body exploded")
                    })
                    .it("passes", || {});
            })
            .await
            .unwrap()
    };

    assert_eq!(
        *log.borrow(),
        vec!["beforeEach", "body", "afterEach", "beforeEach", "afterEach"]
    );
    let passed: Vec<bool> = summary.iter().map(|r| r.passed()).collect();
    assert_eq!(passed, vec![false, true]);
}

#[tokio::test]
async fn test_duplicate_name_runs_only_last_callback() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let mut runner = Runner::new(RecordingReporter::default());

    let summary = {
        let (first, second) = (Rc::clone(&first), Rc::clone(&second));
        runner
            .run_suite("dupes", move |suite| {
                suite
                    .it("x", move || first.set(first.get() + 1))
                    .it("y", || {})
                    .it("x", move || second.set(second.get() + 1));
            })
            .await
            .unwrap()
    };

    assert_eq!(names(&summary), vec!["x", "y"]);
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let mut runner =
        Runner::new(RecordingReporter::default()).with_duplicate_policy(DuplicatePolicy::Reject);

    let err = runner
        .run_suite("dupes", |suite| {
            suite.it("x", || {}).it("x", || {});
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TrialError::DuplicateTest(ref name) if name == "x"));
}

#[tokio::test]
async fn test_sequence_bodies() {
    let mut runner = Runner::new(RecordingReporter::default());

    let summary = runner
        .run_suite("streams", |suite| {
            suite.it("completes", || {
                Outcome::sequence(stream::iter(vec![
                    Ok::<_, Failure>(Emission::value(1)),
                    Ok(Emission::value(2)),
                ]))
            });
            suite.it("errors", || {
                Outcome::sequence(stream::iter(vec![
                    Ok(Emission::value(1)),
                    Err(Failure::message("stream broke")),
                ]))
            });
            suite.it("reports", || {
                Outcome::sequence(stream::iter(vec![Ok::<_, Failure>(
                    ExecResult::fail("reports", "explicit"),
                )]))
            });
        })
        .await
        .unwrap();

    let passed: Vec<bool> = summary.iter().map(|r| r.passed()).collect();
    assert_eq!(passed, vec![true, false, false]);
    assert!(summary.results()[1]
        .error_detail()
        .unwrap()
        .contains("stream broke"));
    assert_eq!(summary.results()[2].error_detail(), Some("explicit"));
}

#[tokio::test]
async fn test_empty_suite_still_completes() {
    let reporter = RecordingReporter::default();
    let mut runner = Runner::new(reporter.clone());

    let summary = runner.run_suite("empty", |_| {}).await.unwrap();

    assert!(summary.is_empty());
    assert!(summary.all_passed());
    assert_eq!(reporter.events(), vec!["suite:empty", "done:0"]);
}
