//! Outcome normalizer - turns any callback invocation into one `ExecResult`

use crate::callback::{Emission, Outcome, TestCallback, Verdict};
use crate::failure::Failure;
use crate::panic_guard::PanicGuard;
use crate::result::ExecResult;
use futures_util::stream::LocalBoxStream;
use futures_util::{FutureExt, StreamExt};
use std::panic::{self, AssertUnwindSafe};

/// Invoke `callback` and settle it into exactly one result.
///
/// An absent callback passes immediately. Panics, `Err` verdicts, rejected
/// futures and stream errors all become failing results; nothing escapes.
pub async fn normalize(name: &str, callback: Option<&mut TestCallback>) -> ExecResult {
    let Some(callback) = callback else {
        return ExecResult::pass(name);
    };
    let _quiet = PanicGuard::enter();

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| callback.invoke())) {
        Ok(outcome) => outcome,
        Err(payload) => return failed(name, Failure::from_panic(payload)),
    };

    tracing::trace!(callback = name, kind = outcome.kind(), "callback invoked");

    match outcome {
        Outcome::Ready(verdict) => settle(name, verdict),
        Outcome::Deferred(future) => match AssertUnwindSafe(future).catch_unwind().await {
            Ok(verdict) => settle(name, verdict),
            Err(payload) => failed(name, Failure::from_panic(payload)),
        },
        Outcome::Sequence(stream) => drain(name, stream).await,
    }
}

fn settle(name: &str, verdict: Verdict) -> ExecResult {
    match verdict {
        Ok(()) => ExecResult::pass(name),
        Err(failure) => failed(name, failure),
    }
}

fn failed(name: &str, failure: Failure) -> ExecResult {
    ExecResult::fail(name, failure.render(name))
}

/// Consume a sequence until it ends or errors.
///
/// The last reported result decides the outcome. Plain values only count
/// as a pass while nothing has been reported. An error ends the sequence
/// immediately and wins over anything emitted before it.
async fn drain(
    name: &str,
    stream: LocalBoxStream<'static, Result<Emission, Failure>>,
) -> ExecResult {
    let mut stream = AssertUnwindSafe(stream).catch_unwind();
    let mut last = None;

    while let Some(item) = stream.next().await {
        match item {
            Ok(Ok(Emission::Report(result))) => last = Some(result),
            Ok(Ok(Emission::Value(value))) => {
                tracing::warn!(
                    test = name,
                    value = %value,
                    "sequence emitted a value that is not a result; counting it as a pass"
                );
                if last.is_none() {
                    last = Some(ExecResult::pass(name));
                }
            }
            Ok(Err(failure)) => return failed(name, failure),
            Err(payload) => return failed(name, Failure::from_panic(payload)),
        }
    }

    last.unwrap_or_else(|| ExecResult::pass(name))
}
