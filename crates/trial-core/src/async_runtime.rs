//! Single-threaded async runtime for suite execution
//!
//! Suites run on a current-thread tokio runtime inside a `LocalSet`, so test
//! bodies are free to use `!Send` state and `tokio::task::spawn_local`.

use std::future::Future;
use tokio::runtime::Builder;
use tokio::task::LocalSet;

/// Block on a future until it completes.
///
/// A fresh runtime is built per call; a test binary runs one suite.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: Future,
{
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let local_set = LocalSet::new();
    Ok(runtime.block_on(local_set.run_until(future)))
}
