use crate::{fold, ArgumentProvider, StackGuard};

/// Method-call access to the folds in this crate, for any tree whose nodes are their
/// own arguments.
///
/// ```rust
/// # use stackguard::{ArgumentProvider, ArgumentTreeExt, StackGuard};
/// struct Node(Vec<Node>);
/// # impl ArgumentProvider for Node {
/// #     type Argument = Node;
/// #     fn argument_count(&self) -> usize { self.0.len() }
/// #     fn argument(&self, index: usize) -> &Node { &self.0[index] }
/// # }
///
/// let tree = Node(vec![Node(vec![Node(vec![])])]);
/// let depth = |_: &Node, depths: Vec<usize>| 1 + depths.into_iter().max().unwrap_or(0);
///
/// let mut guard = StackGuard::new();
/// assert_eq!(tree.fold_iterative(depth), 3);
/// assert_eq!(tree.fold_guarded(&mut guard, depth), 3);
/// ```
pub trait ArgumentTreeExt: ArgumentProvider<Argument = Self> + Sized {
    /// See [`crate::fold_arguments`].
    fn fold_iterative<Out>(&self, collapse: impl FnMut(&Self, Vec<Out>) -> Out) -> Out;

    /// See [`crate::try_fold_arguments`].
    fn try_fold_iterative<Out, E>(
        &self,
        collapse: impl FnMut(&Self, Vec<Out>) -> Result<Out, E>,
    ) -> Result<Out, E>;

    /// See [`crate::fold_guarded`].
    fn fold_guarded<Out, F>(&self, guard: &mut StackGuard, collapse: F) -> Out
    where
        Self: Sync,
        Out: Send,
        F: Fn(&Self, Vec<Out>) -> Out + Sync;

    /// See [`crate::try_fold_guarded`].
    fn try_fold_guarded<Out, E, F>(&self, guard: &mut StackGuard, collapse: F) -> Result<Out, E>
    where
        Self: Sync,
        Out: Send,
        E: Send,
        F: Fn(&Self, Vec<Out>) -> Result<Out, E> + Sync;
}

impl<N> ArgumentTreeExt for N
where
    N: ArgumentProvider<Argument = N>,
{
    fn fold_iterative<Out>(&self, collapse: impl FnMut(&Self, Vec<Out>) -> Out) -> Out {
        fold::fold_arguments(self, collapse)
    }

    fn try_fold_iterative<Out, E>(
        &self,
        collapse: impl FnMut(&Self, Vec<Out>) -> Result<Out, E>,
    ) -> Result<Out, E> {
        fold::try_fold_arguments(self, collapse)
    }

    fn fold_guarded<Out, F>(&self, guard: &mut StackGuard, collapse: F) -> Out
    where
        Self: Sync,
        Out: Send,
        F: Fn(&Self, Vec<Out>) -> Out + Sync,
    {
        fold::fold_guarded(guard, self, collapse)
    }

    fn try_fold_guarded<Out, E, F>(&self, guard: &mut StackGuard, collapse: F) -> Result<Out, E>
    where
        Self: Sync,
        Out: Send,
        E: Send,
        F: Fn(&Self, Vec<Out>) -> Result<Out, E> + Sync,
    {
        fold::try_fold_guarded(guard, self, collapse)
    }
}
