use std::panic;

use futures::{executor, FutureExt};
use tokio::runtime::Handle;
use tracing::trace;

use crate::{guard::Nested, DispatchError, StackGuard};

impl StackGuard {
    /// Run `work` on a thread from a tokio runtime's blocking pool and block until it finishes.
    ///
    /// Unlike [`StackGuard::run_on_fresh_stack`], the work is scheduled on the runtime
    /// behind `handle` rather than on a thread of its own, so it must be `'static`. It
    /// receives a copy of this guard whose nesting count is one higher, which it can use
    /// to dispatch again.
    ///
    /// The pool must be allowed more threads than the deepest nesting used: each nested
    /// call holds one blocking thread while it waits. Call this from outside the runtime
    /// or from a blocking-pool thread, never from an async task.
    ///
    /// Panics in the work are re-raised with their original payload. A task cancelled
    /// before completion, because the runtime is shutting down, is reported as
    /// [`DispatchError::Cancelled`].
    pub fn run_on_blocking_pool<F, R>(
        &mut self,
        handle: &Handle,
        work: F,
    ) -> Result<R, DispatchError>
    where
        F: FnOnce(&mut StackGuard) -> R + Send + 'static,
        R: Send + 'static,
    {
        let nested = Nested::enter(self);
        let mut child = StackGuard::clone(&nested);
        let mut task = handle.spawn_blocking(move || work(&mut child));

        let outcome = match (&mut task).now_or_never() {
            Some(outcome) => {
                trace!("blocking task finished before first poll");
                outcome
            }
            None => executor::block_on(task),
        };
        drop(nested);

        match outcome {
            Ok(out) => Ok(out),
            Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
            Err(_) => Err(DispatchError::Cancelled),
        }
    }
}
