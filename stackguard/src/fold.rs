use tracing::debug;

use crate::{ArgumentProvider, StackGuard};

/// Fold a tree into a single value without using the call stack.
///
/// `collapse` is called once per node, in post-order, with the node and the
/// results of its arguments in argument order.
///
/// This is the iterative strategy to fall back to once a [`StackGuard`] reports
/// that recursing is no longer allowed. It keeps its own stack of pending nodes
/// on the heap, so it handles trees of any depth.
///
/// ```rust
/// # use stackguard::fold_arguments;
/// // a nested list counts as a tree of its items
/// struct Node(Vec<Node>);
/// # impl stackguard::ArgumentProvider for Node {
/// #     type Argument = Node;
/// #     fn argument_count(&self) -> usize { self.0.len() }
/// #     fn argument(&self, index: usize) -> &Node { &self.0[index] }
/// # }
///
/// let tree = Node(vec![Node(vec![]), Node(vec![Node(vec![])])]);
/// let size = fold_arguments(&tree, |_, sizes: Vec<usize>| 1 + sizes.iter().sum::<usize>());
/// assert_eq!(size, 4);
/// ```
pub fn fold_arguments<N, Out>(root: &N, mut collapse: impl FnMut(&N, Vec<Out>) -> Out) -> Out
where
    N: ArgumentProvider<Argument = N>,
{
    enum State<'a, N> {
        Expand(&'a N),
        Collapse(&'a N),
    }

    let mut results: Vec<Out> = Vec::new();
    let mut stack = vec![State::Expand(root)];

    while let Some(item) = stack.pop() {
        match item {
            State::Expand(node) => {
                stack.push(State::Collapse(node));
                // reversed, so the first argument is folded first
                stack.extend(node.arguments().rev().map(State::Expand));
            }
            State::Collapse(node) => {
                let args = results.split_off(results.len() - node.argument_count());
                results.push(collapse(node, args));
            }
        };
    }
    results.pop().expect("root is always collapsed last")
}

/// Fallible version of [`fold_arguments`], stopping at the first error.
pub fn try_fold_arguments<N, Out, E>(
    root: &N,
    mut collapse: impl FnMut(&N, Vec<Out>) -> Result<Out, E>,
) -> Result<Out, E>
where
    N: ArgumentProvider<Argument = N>,
{
    enum State<'a, N> {
        Expand(&'a N),
        Collapse(&'a N),
    }

    let mut results: Vec<Out> = Vec::new();
    let mut stack = vec![State::Expand(root)];

    while let Some(item) = stack.pop() {
        match item {
            State::Expand(node) => {
                stack.push(State::Collapse(node));
                stack.extend(node.arguments().rev().map(State::Expand));
            }
            State::Collapse(node) => {
                let args = results.split_off(results.len() - node.argument_count());
                results.push(collapse(node, args)?);
            }
        };
    }
    Ok(results.pop().expect("root is always collapsed last"))
}

/// Fold a tree by plain recursion, moving onto fresh stacks as it gets deep.
///
/// The fold recurses on the current stack for
/// [`crate::StackGuardConfig::frames_per_stack`] levels. At that depth it continues
/// on a fresh stack via [`StackGuard::run_on_fresh_stack`] if the guard allows it,
/// and otherwise finishes the subtree with [`fold_arguments`]. Either way the result
/// is the same as [`fold_arguments`] would produce.
pub fn fold_guarded<N, Out, F>(guard: &mut StackGuard, root: &N, collapse: F) -> Out
where
    N: ArgumentProvider<Argument = N> + Sync,
    Out: Send,
    F: Fn(&N, Vec<Out>) -> Out + Sync,
{
    fold_on_stack(guard, root, &collapse, 0)
}

fn fold_on_stack<N, Out, F>(guard: &mut StackGuard, node: &N, collapse: &F, depth: usize) -> Out
where
    N: ArgumentProvider<Argument = N> + Sync,
    Out: Send,
    F: Fn(&N, Vec<Out>) -> Out + Sync,
{
    if depth >= guard.config().frames_per_stack() {
        if guard.can_recurse_on_current_stack() {
            return guard.run_on_fresh_stack(|guard| fold_on_stack(guard, node, collapse, 0));
        }
        debug!(
            nesting = guard.nesting_count(),
            "nesting limit reached, folding subtree iteratively"
        );
        return fold_arguments(node, collapse);
    }

    let args = node
        .arguments()
        .map(|arg| fold_on_stack(guard, arg, collapse, depth + 1))
        .collect();
    collapse(node, args)
}

/// Fallible version of [`fold_guarded`], stopping at the first error.
pub fn try_fold_guarded<N, Out, E, F>(
    guard: &mut StackGuard,
    root: &N,
    collapse: F,
) -> Result<Out, E>
where
    N: ArgumentProvider<Argument = N> + Sync,
    Out: Send,
    E: Send,
    F: Fn(&N, Vec<Out>) -> Result<Out, E> + Sync,
{
    try_fold_on_stack(guard, root, &collapse, 0)
}

fn try_fold_on_stack<N, Out, E, F>(
    guard: &mut StackGuard,
    node: &N,
    collapse: &F,
    depth: usize,
) -> Result<Out, E>
where
    N: ArgumentProvider<Argument = N> + Sync,
    Out: Send,
    E: Send,
    F: Fn(&N, Vec<Out>) -> Result<Out, E> + Sync,
{
    if depth >= guard.config().frames_per_stack() {
        if guard.can_recurse_on_current_stack() {
            return guard.run_on_fresh_stack(|guard| try_fold_on_stack(guard, node, collapse, 0));
        }
        debug!(
            nesting = guard.nesting_count(),
            "nesting limit reached, folding subtree iteratively"
        );
        return try_fold_arguments(node, collapse);
    }

    let args = node
        .arguments()
        .map(|arg| try_fold_on_stack(guard, arg, collapse, depth + 1))
        .collect::<Result<Vec<_>, E>>()?;
    collapse(node, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StackGuardConfig;

    struct Node {
        label: u32,
        children: Vec<Node>,
    }

    impl ArgumentProvider for Node {
        type Argument = Node;

        fn argument_count(&self) -> usize {
            self.children.len()
        }

        fn argument(&self, index: usize) -> &Node {
            &self.children[index]
        }
    }

    fn node(label: u32, children: Vec<Node>) -> Node {
        Node { label, children }
    }

    fn sample() -> Node {
        node(
            0,
            vec![
                node(1, vec![node(2, vec![])]),
                node(3, vec![node(4, vec![]), node(5, vec![])]),
            ],
        )
    }

    #[test]
    fn visits_post_order() {
        let mut visited = Vec::new();
        fold_arguments(&sample(), |n, _: Vec<()>| visited.push(n.label));
        assert_eq!(visited, vec![2, 1, 4, 5, 3, 0]);
    }

    #[test]
    fn arguments_arrive_in_order() {
        let rendered = fold_arguments(&sample(), |n, args: Vec<String>| {
            if args.is_empty() {
                n.label.to_string()
            } else {
                format!("{}({})", n.label, args.join(","))
            }
        });
        assert_eq!(rendered, "0(1(2),3(4,5))");
    }

    #[test]
    fn try_fold_stops_at_first_error() {
        let mut visited = Vec::new();
        let res: Result<(), u32> = try_fold_arguments(&sample(), |n, _| {
            visited.push(n.label);
            if n.label == 4 {
                Err(n.label)
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err(4));
        assert_eq!(visited, vec![2, 1, 4]);
    }

    #[test]
    fn guarded_matches_iterative() {
        let config = StackGuardConfig::default().with_frames_per_stack(1);
        let mut guard = StackGuard::with_config(config);

        let sum = |n: &Node, args: Vec<u32>| n.label + args.iter().sum::<u32>();
        assert_eq!(
            fold_guarded(&mut guard, &sample(), sum),
            fold_arguments(&sample(), sum)
        );
        assert_eq!(guard.nesting_count(), 0);
    }

    #[test]
    fn guarded_falls_back_when_nesting_exhausted() {
        let config = StackGuardConfig::default()
            .with_frames_per_stack(1)
            .with_max_nesting(0);
        let mut guard = StackGuard::with_config(config);

        let size = fold_guarded(&mut guard, &sample(), |_, args: Vec<usize>| {
            args.into_iter().sum::<usize>() + 1
        });
        assert_eq!(size, 6);
        assert_eq!(guard.nesting_count(), 0);
    }

    #[test]
    fn try_guarded_propagates_error() {
        let config = StackGuardConfig::default().with_frames_per_stack(1);
        let mut guard = StackGuard::with_config(config);

        let res: Result<u32, String> = try_fold_guarded(&mut guard, &sample(), |n, args: Vec<u32>| {
            if n.label == 5 {
                Err(format!("bad node {}", n.label))
            } else {
                Ok(n.label + args.iter().sum::<u32>())
            }
        });
        assert_eq!(res, Err("bad node 5".to_string()));
        assert_eq!(guard.nesting_count(), 0);
    }
}
