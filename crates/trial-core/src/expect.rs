//! Matcher-style assertions
//!
//! Every matcher returns a [`Verdict`], so test bodies chain them with `?`
//! or return the last one directly:
//!
//! ```
//! use trial_core::{expect, expect_fn, Verdict};
//!
//! fn body() -> Verdict {
//!     expect(2 + 2).to_equal(4)?;
//!     expect("hello world").to_contain("world")?;
//!     expect(vec![1, 2, 3]).not().to_contain(&7)?;
//!     expect_fn(|| -> () { panic!("bad input") }).to_throw_containing("bad")
//! }
//! assert!(body().is_ok());
//! ```

use crate::callback::{IntoVerdict, Verdict};
use crate::failure::Failure;
use crate::panic_guard::PanicGuard;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};

/// Start an assertion on a value
pub fn expect<T>(actual: T) -> Expectation<T> {
    Expectation {
        actual,
        negated: false,
    }
}

/// Start an assertion on a closure that is expected to fail
///
/// A closure that only panics needs an explicit return type,
/// `|| -> () { panic!(..) }`, so its output implements [`IntoVerdict`].
pub fn expect_fn<F, R>(body: F) -> FnExpectation<F>
where
    F: FnOnce() -> R,
    R: IntoVerdict,
{
    FnExpectation {
        body,
        negated: false,
    }
}

/// A value under assertion
#[derive(Debug)]
pub struct Expectation<T> {
    actual: T,
    negated: bool,
}

impl<T> Expectation<T> {
    /// Invert the next matcher
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    #[track_caller]
    fn check(&self, holds: bool, describe: impl FnOnce(&str) -> String) -> Verdict {
        if holds != self.negated {
            return Ok(());
        }
        let not = if self.negated { "not " } else { "" };
        Err(Failure::assertion(describe(not)))
    }
}

impl<T: Debug> Expectation<T> {
    #[track_caller]
    pub fn to_equal<U>(&self, expected: U) -> Verdict
    where
        T: PartialEq<U>,
        U: Debug,
    {
        self.check(self.actual == expected, |not| {
            format!(
                "expected {:?} {}to equal {:?}",
                self.actual, not, expected
            )
        })
    }

    #[track_caller]
    pub fn to_be_greater_than<U>(&self, bound: U) -> Verdict
    where
        T: PartialOrd<U>,
        U: Debug,
    {
        self.check(self.actual > bound, |not| {
            format!(
                "expected {:?} {}to be greater than {:?}",
                self.actual, not, bound
            )
        })
    }

    #[track_caller]
    pub fn to_be_less_than<U>(&self, bound: U) -> Verdict
    where
        T: PartialOrd<U>,
        U: Debug,
    {
        self.check(self.actual < bound, |not| {
            format!(
                "expected {:?} {}to be less than {:?}",
                self.actual, not, bound
            )
        })
    }
}

impl Expectation<bool> {
    #[track_caller]
    pub fn to_be_true(&self) -> Verdict {
        self.check(self.actual, |not| {
            format!("expected {} {}to be true", self.actual, not)
        })
    }

    #[track_caller]
    pub fn to_be_false(&self) -> Verdict {
        self.check(!self.actual, |not| {
            format!("expected {} {}to be false", self.actual, not)
        })
    }
}

impl<T: Debug> Expectation<Option<T>> {
    #[track_caller]
    pub fn to_be_some(&self) -> Verdict {
        self.check(self.actual.is_some(), |not| {
            format!("expected {:?} {}to be Some", self.actual, not)
        })
    }

    #[track_caller]
    pub fn to_be_none(&self) -> Verdict {
        self.check(self.actual.is_none(), |not| {
            format!("expected {:?} {}to be None", self.actual, not)
        })
    }
}

impl<T: Debug, E: Debug> Expectation<Result<T, E>> {
    #[track_caller]
    pub fn to_be_ok(&self) -> Verdict {
        self.check(self.actual.is_ok(), |not| {
            format!("expected {:?} {}to be Ok", self.actual, not)
        })
    }

    #[track_caller]
    pub fn to_be_err(&self) -> Verdict {
        self.check(self.actual.is_err(), |not| {
            format!("expected {:?} {}to be Err", self.actual, not)
        })
    }
}

impl Expectation<&str> {
    #[track_caller]
    pub fn to_contain(&self, needle: &str) -> Verdict {
        contains_str(self, self.actual, needle)
    }

    #[track_caller]
    pub fn to_start_with(&self, prefix: &str) -> Verdict {
        starts_with_str(self, self.actual, prefix)
    }
}

impl Expectation<String> {
    #[track_caller]
    pub fn to_contain(&self, needle: &str) -> Verdict {
        contains_str(self, &self.actual, needle)
    }

    #[track_caller]
    pub fn to_start_with(&self, prefix: &str) -> Verdict {
        starts_with_str(self, &self.actual, prefix)
    }
}

#[track_caller]
fn contains_str<T>(expectation: &Expectation<T>, haystack: &str, needle: &str) -> Verdict {
    expectation.check(haystack.contains(needle), |not| {
        format!("expected {:?} {}to contain {:?}", haystack, not, needle)
    })
}

#[track_caller]
fn starts_with_str<T>(expectation: &Expectation<T>, haystack: &str, prefix: &str) -> Verdict {
    expectation.check(haystack.starts_with(prefix), |not| {
        format!("expected {:?} {}to start with {:?}", haystack, not, prefix)
    })
}

impl<T: PartialEq + Debug> Expectation<Vec<T>> {
    #[track_caller]
    pub fn to_contain(&self, item: &T) -> Verdict {
        contains_item(self, &self.actual, item)
    }

    #[track_caller]
    pub fn to_have_length(&self, len: usize) -> Verdict {
        has_length(self, &self.actual, len)
    }
}

impl<T: PartialEq + Debug> Expectation<&[T]> {
    #[track_caller]
    pub fn to_contain(&self, item: &T) -> Verdict {
        contains_item(self, self.actual, item)
    }

    #[track_caller]
    pub fn to_have_length(&self, len: usize) -> Verdict {
        has_length(self, self.actual, len)
    }
}

#[track_caller]
fn contains_item<C, T: PartialEq + Debug>(
    expectation: &Expectation<C>,
    items: &[T],
    item: &T,
) -> Verdict {
    expectation.check(items.contains(item), |not| {
        format!("expected {:?} {}to contain {:?}", items, not, item)
    })
}

#[track_caller]
fn has_length<C, T: Debug>(expectation: &Expectation<C>, items: &[T], len: usize) -> Verdict {
    expectation.check(items.len() == len, |not| {
        format!(
            "expected {:?} (length {}) {}to have length {}",
            items,
            items.len(),
            not,
            len
        )
    })
}

/// A closure under assertion
pub struct FnExpectation<F> {
    body: F,
    negated: bool,
}

impl<F, R> FnExpectation<F>
where
    F: FnOnce() -> R,
    R: IntoVerdict,
{
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Run the closure; a panic or an `Err` counts as throwing
    fn run(self) -> (bool, Option<Failure>) {
        let negated = self.negated;
        let body = self.body;
        let _quiet = PanicGuard::enter();
        let thrown = match panic::catch_unwind(AssertUnwindSafe(|| body().into_verdict())) {
            Ok(Ok(())) => None,
            Ok(Err(failure)) => Some(failure),
            Err(payload) => Some(Failure::from_panic(payload)),
        };
        (negated, thrown)
    }

    #[track_caller]
    pub fn to_throw(self) -> Verdict {
        match self.run() {
            (false, Some(_)) | (true, None) => Ok(()),
            (false, None) => Err(Failure::assertion("expected closure to throw")),
            (true, Some(failure)) => Err(Failure::assertion(format!(
                "expected closure not to throw, but it threw: {}",
                failure
            ))),
        }
    }

    #[track_caller]
    pub fn to_throw_containing(self, text: &str) -> Verdict {
        let (negated, thrown) = self.run();
        let matched = thrown
            .as_ref()
            .map(|failure| failure.to_string().contains(text))
            .unwrap_or(false);
        if matched != negated {
            return Ok(());
        }
        let not = if negated { "not " } else { "" };
        let got = match thrown {
            Some(failure) => format!("it threw: {}", failure),
            None => "it did not throw".to_string(),
        };
        Err(Failure::assertion(format!(
            "expected closure {}to throw an error containing {:?}, but {}",
            not, text, got
        )))
    }
}
