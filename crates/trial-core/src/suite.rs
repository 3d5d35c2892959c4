//! Suite registry - tests and lifecycle hooks declared for one run

use crate::callback::{IntoOutcome, TestCallback};
use crate::{TrialError, TrialResult};
use std::fmt;

/// Lifecycle hook slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    BeforeAll,
    BeforeEach,
    AfterAll,
    AfterEach,
}

impl HookKind {
    pub const ALL: [HookKind; 4] = [
        HookKind::BeforeAll,
        HookKind::BeforeEach,
        HookKind::AfterAll,
        HookKind::AfterEach,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HookKind::BeforeAll => "beforeAll",
            HookKind::BeforeEach => "beforeEach",
            HookKind::AfterAll => "afterAll",
            HookKind::AfterEach => "afterEach",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do when a test name is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the earlier callback, keeping its position
    #[default]
    Overwrite,
    /// Refuse to run the suite
    Reject,
}

/// One callback per hook slot
#[derive(Debug, Default)]
pub(crate) struct Hooks {
    before_all: Option<TestCallback>,
    before_each: Option<TestCallback>,
    after_all: Option<TestCallback>,
    after_each: Option<TestCallback>,
}

impl Hooks {
    fn slot(&mut self, kind: HookKind) -> &mut Option<TestCallback> {
        match kind {
            HookKind::BeforeAll => &mut self.before_all,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::AfterAll => &mut self.after_all,
            HookKind::AfterEach => &mut self.after_each,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: HookKind) -> Option<&mut TestCallback> {
        self.slot(kind).as_mut()
    }
}

/// Tests and hooks declared for a suite, in registration order
#[derive(Debug, Default)]
pub struct Suite {
    policy: DuplicatePolicy,
    tests: Vec<(String, TestCallback)>,
    hooks: Hooks,
    duplicates: Vec<String>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Register a test, replacing any earlier test with the same name in place
    pub fn register_test(&mut self, name: impl Into<String>, callback: TestCallback) -> &mut Self {
        let name = name.into();
        match self.tests.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                tracing::warn!(test = %name, "test registered twice; keeping the later callback");
                entry.1 = callback;
                self.duplicates.push(name);
            }
            None => self.tests.push((name, callback)),
        }
        self
    }

    /// Replace the callback for a hook slot
    pub fn set_hook(&mut self, kind: HookKind, callback: TestCallback) -> &mut Self {
        let slot = self.hooks.slot(kind);
        if slot.is_some() {
            tracing::debug!(hook = %kind, "hook replaced");
        }
        *slot = Some(callback);
        self
    }

    pub fn it<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnMut() -> R + 'static,
        R: IntoOutcome,
    {
        self.register_test(name, TestCallback::new(body))
    }

    pub fn before_all<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() -> R + 'static,
        R: IntoOutcome,
    {
        self.set_hook(HookKind::BeforeAll, TestCallback::new(hook))
    }

    pub fn before_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() -> R + 'static,
        R: IntoOutcome,
    {
        self.set_hook(HookKind::BeforeEach, TestCallback::new(hook))
    }

    pub fn after_all<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() -> R + 'static,
        R: IntoOutcome,
    {
        self.set_hook(HookKind::AfterAll, TestCallback::new(hook))
    }

    pub fn after_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut() -> R + 'static,
        R: IntoOutcome,
    {
        self.set_hook(HookKind::AfterEach, TestCallback::new(hook))
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Test names in execution order
    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_hook(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::BeforeAll => self.hooks.before_all.is_some(),
            HookKind::BeforeEach => self.hooks.before_each.is_some(),
            HookKind::AfterAll => self.hooks.after_all.is_some(),
            HookKind::AfterEach => self.hooks.after_each.is_some(),
        }
    }

    /// Hand the declarations to the runner, enforcing the duplicate policy
    pub(crate) fn into_parts(self) -> TrialResult<(Vec<(String, TestCallback)>, Hooks)> {
        if self.policy == DuplicatePolicy::Reject {
            if let Some(name) = self.duplicates.into_iter().next() {
                return Err(TrialError::DuplicateTest(name));
            }
        }
        Ok((self.tests, self.hooks))
    }
}
