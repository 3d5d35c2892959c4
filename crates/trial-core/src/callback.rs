//! Test callbacks and the three shapes their outcome can take

use crate::failure::Failure;
use crate::result::ExecResult;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::LocalBoxStream;
use futures_util::{FutureExt, Stream, StreamExt};
use std::fmt;
use std::future::Future;

/// Pass (`Ok`) or fail (`Err`) verdict of a callback
pub type Verdict = Result<(), Failure>;

/// A value yielded by a lazy-sequence test body
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    /// An explicit result, taken as the test's outcome unchanged
    Report(ExecResult),
    /// Any other value, rendered for diagnostics
    Value(String),
}

impl Emission {
    pub fn value(value: impl fmt::Debug) -> Self {
        Emission::Value(format!("{:?}", value))
    }
}

impl From<ExecResult> for Emission {
    fn from(result: ExecResult) -> Self {
        Emission::Report(result)
    }
}

impl From<()> for Emission {
    fn from(_: ()) -> Self {
        Emission::Value("()".to_string())
    }
}

/// What invoking a callback produced
pub enum Outcome {
    /// Finished synchronously
    Ready(Verdict),
    /// Settles when the future completes
    Deferred(LocalBoxFuture<'static, Verdict>),
    /// Settles when the stream ends or yields an error
    Sequence(LocalBoxStream<'static, Result<Emission, Failure>>),
}

impl Outcome {
    pub fn pass() -> Self {
        Outcome::Ready(Ok(()))
    }

    /// Wrap a future whose output is `()` or `Result<(), E>`
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future + 'static,
        F::Output: IntoVerdict,
    {
        Outcome::Deferred(future.map(|output| output.into_verdict()).boxed_local())
    }

    /// Wrap a stream of emissions; an `Err` item fails the callback
    pub fn sequence<S, T, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + 'static,
        T: Into<Emission>,
        E: Into<Failure>,
    {
        Outcome::Sequence(
            stream
                .map(|item| -> Result<Emission, Failure> {
                    item.map(Into::into).map_err(Into::into)
                })
                .boxed_local(),
        )
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Ready(_) => "ready",
            Outcome::Deferred(_) => "deferred",
            Outcome::Sequence(_) => "sequence",
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(verdict) => f.debug_tuple("Ready").field(verdict).finish(),
            Outcome::Deferred(_) => f.write_str("Deferred(..)"),
            Outcome::Sequence(_) => f.write_str("Sequence(..)"),
        }
    }
}

/// Values that settle into a [`Verdict`]
pub trait IntoVerdict {
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for () {
    fn into_verdict(self) -> Verdict {
        Ok(())
    }
}

impl<E> IntoVerdict for Result<(), E>
where
    E: Into<Failure>,
{
    fn into_verdict(self) -> Verdict {
        self.map_err(Into::into)
    }
}

/// Values a test body may return
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::pass()
    }
}

impl<E> IntoOutcome for Result<(), E>
where
    E: Into<Failure>,
{
    fn into_outcome(self) -> Outcome {
        Outcome::Ready(self.into_verdict())
    }
}

/// A registered test body or hook.
///
/// Hooks such as `before_each` are invoked once per test, so callbacks are
/// `FnMut`.
pub struct TestCallback(Box<dyn FnMut() -> Outcome>);

impl TestCallback {
    pub fn new<F, R>(mut f: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: IntoOutcome,
    {
        TestCallback(Box::new(move || f().into_outcome()))
    }

    pub(crate) fn invoke(&mut self) -> Outcome {
        (self.0)()
    }
}

impl fmt::Debug for TestCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TestCallback(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[test]
    fn test_unit_and_result_become_ready() {
        assert!(matches!(().into_outcome(), Outcome::Ready(Ok(()))));

        let failed: Result<(), Failure> = Err(Failure::message("no"));
        assert!(matches!(failed.into_outcome(), Outcome::Ready(Err(_))));
    }

    #[test]
    fn test_constructors_pick_shape() {
        assert_eq!(Outcome::deferred(async {}).kind(), "deferred");

        let items = stream::iter(vec![Ok::<_, Failure>(())]);
        assert_eq!(Outcome::sequence(items).kind(), "sequence");
    }

    #[test]
    fn test_callback_is_reusable() {
        let mut calls = 0;
        let mut callback = TestCallback::new(move || {
            calls += 1;
            assert!(calls <= 2);
        });
        assert!(matches!(callback.invoke(), Outcome::Ready(Ok(()))));
        assert!(matches!(callback.invoke(), Outcome::Ready(Ok(()))));
    }
}
