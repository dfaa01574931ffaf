use std::{
    ops::{Deref, DerefMut},
    panic, thread,
};

use tracing::{trace, warn};

use crate::DispatchError;

/// Default bound on the number of fresh stacks chained by one guard.
pub const DEFAULT_MAX_NESTING: usize = 1024;

/// Default size, in bytes, of each fresh stack.
pub const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Default number of levels a guarded traversal descends on one stack before trampolining.
pub const DEFAULT_FRAMES_PER_STACK: usize = 256;

/// Settings fixed for the life of a [`StackGuard`].
#[derive(Clone, Debug)]
pub struct StackGuardConfig {
    max_nesting: usize,
    stack_size: usize,
    frames_per_stack: usize,
    thread_name: String,
}

impl Default for StackGuardConfig {
    fn default() -> Self {
        Self {
            max_nesting: DEFAULT_MAX_NESTING,
            stack_size: DEFAULT_STACK_SIZE,
            frames_per_stack: DEFAULT_FRAMES_PER_STACK,
            thread_name: "stackguard".to_string(),
        }
    }
}

impl StackGuardConfig {
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// A value of zero is treated as one.
    pub fn with_frames_per_stack(mut self, frames_per_stack: usize) -> Self {
        self.frames_per_stack = frames_per_stack.max(1);
        self
    }

    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    pub fn frames_per_stack(&self) -> usize {
        self.frames_per_stack
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

/// Bounds how many times recursive work has been re-dispatched onto a fresh stack.
///
/// # Motivation
///
/// A recursive traversal of a deep tree will eventually exhaust the stack of the
/// thread it runs on. A common remedy is to continue the traversal on a brand new
/// stack once the current one has been used for a while. Each of those fresh stacks
/// is itself a full thread stack, so the number of them chained together has to be
/// bounded as well: that is what the nesting count tracks.
///
/// The bound is advisory. [`StackGuard::can_recurse_on_current_stack`] reports
/// whether another dispatch is still within budget, and callers that get `false`
/// are expected to switch to an iterative strategy. Dispatching anyway is allowed.
///
/// # Ownership
///
/// One guard serves one logical call chain. Work running on a fresh stack receives
/// the same guard by `&mut`, so nested dispatches update the same counter and no
/// other call chain can observe it in the meantime. Concurrent traversals each need
/// their own guard.
///
/// ```rust
/// # use stackguard::StackGuard;
/// fn depth(guard: &mut StackGuard, remaining: usize) -> usize {
///     if remaining == 0 || !guard.can_recurse_on_current_stack() {
///         return guard.nesting_count();
///     }
///     guard.run_on_fresh_stack(move |guard| depth(guard, remaining - 1))
/// }
///
/// let mut guard = StackGuard::new();
/// assert_eq!(depth(&mut guard, 3), 3);
/// assert_eq!(guard.nesting_count(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StackGuard {
    nesting_count: usize,
    config: StackGuardConfig,
}

impl StackGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StackGuardConfig) -> Self {
        Self {
            nesting_count: 0,
            config,
        }
    }

    /// Number of fresh-stack dispatches currently active on this guard.
    pub fn nesting_count(&self) -> usize {
        self.nesting_count
    }

    pub fn max_nesting(&self) -> usize {
        self.config.max_nesting
    }

    pub fn config(&self) -> &StackGuardConfig {
        &self.config
    }

    /// Returns `true` while fewer than `max_nesting` dispatches are active.
    ///
    /// This bounds logical nesting, not remaining stack space.
    pub fn can_recurse_on_current_stack(&self) -> bool {
        self.nesting_count < self.config.max_nesting
    }

    /// Run `work` on a fresh stack and block until it finishes.
    ///
    /// The work runs on a newly spawned thread with a stack of
    /// [`StackGuardConfig::stack_size`] bytes, never inline on the calling thread.
    /// It receives this guard, with the nesting count incremented, so it may dispatch
    /// again. The count is restored before this returns or unwinds.
    ///
    /// Whatever the work returns is returned unchanged. If the work panics, the
    /// original panic payload is re-raised on the calling thread.
    ///
    /// ```rust
    /// # use stackguard::StackGuard;
    /// let (a, b) = (2, 3);
    /// let mut guard = StackGuard::new();
    /// assert_eq!(guard.run_on_fresh_stack(move |_| a + b), 5);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the operating system fails to create the thread, the same way
    /// `std::thread::spawn` does. Use [`StackGuard::try_run_on_fresh_stack`] to
    /// handle that case.
    pub fn run_on_fresh_stack<F, R>(&mut self, work: F) -> R
    where
        F: FnOnce(&mut StackGuard) -> R + Send,
        R: Send,
    {
        match self.try_run_on_fresh_stack(work) {
            Ok(out) => out,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`StackGuard::run_on_fresh_stack`], but reports a failure to spawn the
    /// fresh-stack thread as [`DispatchError::Spawn`].
    pub fn try_run_on_fresh_stack<F, R>(&mut self, work: F) -> Result<R, DispatchError>
    where
        F: FnOnce(&mut StackGuard) -> R + Send,
        R: Send,
    {
        let builder = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .stack_size(self.config.stack_size);

        let mut nested = Nested::enter(self);
        let outcome = {
            let guard: &mut StackGuard = &mut nested;
            thread::scope(move |scope| {
                builder
                    .spawn_scoped(scope, move || work(guard))
                    .map(|handle| handle.join())
            })
        };
        drop(nested);

        match outcome {
            Ok(Ok(out)) => Ok(out),
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(err) => Err(DispatchError::Spawn(err)),
        }
    }

    fn enter(&mut self) {
        if !self.can_recurse_on_current_stack() {
            warn!(
                nesting = self.nesting_count,
                max_nesting = self.config.max_nesting,
                "dispatching onto a fresh stack past the nesting limit"
            );
        }
        self.nesting_count += 1;
        trace!(nesting = self.nesting_count, "entering fresh stack");
    }

    fn exit(&mut self) {
        trace!(nesting = self.nesting_count, "leaving fresh stack");
        self.nesting_count -= 1;
    }
}

/// One active dispatch on a [`StackGuard`]. The nesting count is incremented on
/// creation and decremented on drop, including while unwinding.
pub(crate) struct Nested<'a>(&'a mut StackGuard);

impl<'a> Nested<'a> {
    pub(crate) fn enter(guard: &'a mut StackGuard) -> Self {
        guard.enter();
        Self(guard)
    }
}

impl Drop for Nested<'_> {
    fn drop(&mut self) {
        self.0.exit();
    }
}

impl Deref for Nested<'_> {
    type Target = StackGuard;

    fn deref(&self) -> &StackGuard {
        self.0
    }
}

impl DerefMut for Nested<'_> {
    fn deref_mut(&mut self) -> &mut StackGuard {
        self.0
    }
}
