//! Silences the panic hook while trial is catching panics itself

use std::cell::Cell;
use std::panic;
use std::sync::Once;

thread_local! {
    static GUARDED: Cell<usize> = const { Cell::new(0) };
}

static INSTALL: Once = Once::new();

/// While alive, panics on this thread skip the previously installed hook.
///
/// Caught panics are rendered by the reporter, so the default
/// `thread '..' panicked at ..` line would only duplicate them. Panics on
/// other threads, or outside any guard, still reach the previous hook.
pub(crate) struct PanicGuard {
    _private: (),
}

impl PanicGuard {
    pub(crate) fn enter() -> Self {
        INSTALL.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if GUARDED.with(Cell::get) == 0 {
                    previous(info);
                } else {
                    tracing::debug!(location = ?info.location(), "caught panic in test code");
                }
            }));
        });
        GUARDED.with(|depth| depth.set(depth.get() + 1));
        Self { _private: () }
    }
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        GUARDED.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
