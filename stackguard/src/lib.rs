//! Run deeply recursive work without exhausting the call stack.
//!
//! A [`StackGuard`] moves recursive work onto fresh stacks and bounds how many of
//! those are chained. Once the bound is reached, callers switch to an iterative
//! strategy such as [`fold_arguments`].
mod arguments;
mod error;
mod fold;
mod guard;
mod recursive;

#[cfg(feature = "tokio")]
mod blocking_pool;

pub use arguments::{ArgumentProvider, Arguments};
pub use error::DispatchError;
pub use fold::{fold_arguments, fold_guarded, try_fold_arguments, try_fold_guarded};
pub use guard::{
    StackGuard, StackGuardConfig, DEFAULT_FRAMES_PER_STACK, DEFAULT_MAX_NESTING, DEFAULT_STACK_SIZE,
};
pub use recursive::ArgumentTreeExt;
