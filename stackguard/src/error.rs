/// Failures of the dispatch mechanism itself.
///
/// Work that fails is never reported through this type: a work item's own
/// `Err` values are returned to the caller untouched and its panics are
/// re-raised with their original payload.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The operating system refused to create a thread for the fresh stack.
    #[error("failed to spawn fresh-stack thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The task was cancelled before it ran to completion, typically because
    /// the runtime owning the blocking pool is shutting down.
    #[error("fresh-stack task was cancelled before completing")]
    Cancelled,
}
