use std::sync::Arc;

use crate::expr::Expr;
#[cfg(test)]
use crate::expr::naive::{arb_expr, naive_eval};
#[cfg(test)]
use proptest::proptest;
use stackguard::{
    fold_arguments, fold_guarded, try_fold_arguments, try_fold_guarded, DispatchError, StackGuard,
};
use tokio::runtime::Handle;

pub type CompileError = &'static str;

#[inline(always)]
pub fn eval_node(node: &Expr, args: Vec<i64>) -> i64 {
    match node {
        Expr::Add(..) => args[0].wrapping_add(args[1]),
        Expr::Sub(..) => args[0].wrapping_sub(args[1]),
        Expr::Mul(..) => args[0].wrapping_mul(args[1]),
        Expr::Neg(_) => args[0].wrapping_neg(),
        Expr::LiteralInt(x) => *x,
    }
}

// only looks at literal case - operators are always valid
pub fn check_node(node: &Expr, args: Vec<i64>) -> Result<i64, CompileError> {
    if let Expr::LiteralInt(x) = node {
        // arbitrary check
        if *x > 99 {
            return Err("invalid literal");
        }
    }
    Ok(eval_node(node, args))
}

pub fn eval_iterative(expr: &Expr) -> i64 {
    fold_arguments(expr, eval_node)
}

pub fn eval_guarded(guard: &mut StackGuard, expr: &Expr) -> i64 {
    fold_guarded(guard, expr, eval_node)
}

pub fn check_iterative(expr: &Expr) -> Result<i64, CompileError> {
    try_fold_arguments(expr, check_node)
}

pub fn check_guarded(guard: &mut StackGuard, expr: &Expr) -> Result<i64, CompileError> {
    try_fold_guarded(guard, expr, check_node)
}

/// Start the evaluation on the runtime's blocking pool instead of the calling thread.
pub fn eval_on_blocking_pool(
    guard: &mut StackGuard,
    handle: &Handle,
    expr: Arc<Expr>,
) -> Result<i64, DispatchError> {
    guard.run_on_blocking_pool(handle, move |guard| eval_guarded(guard, &expr))
}

#[cfg(test)]
fn test_guard() -> StackGuard {
    use stackguard::StackGuardConfig;

    // tiny stacks and frequent dispatch, so small generated trees still cross stacks
    StackGuard::with_config(
        StackGuardConfig::default()
            .with_frames_per_stack(3)
            .with_stack_size(256 * 1024),
    )
}

// generate a bunch of expression trees and evaluate them
#[cfg(test)]
proptest! {
    #[test]
    fn expr_eval(expr in arb_expr()) {
        let mut guard = test_guard();

        let simple = naive_eval(&expr);
        let iterative = eval_iterative(&expr);
        let guarded = eval_guarded(&mut guard, &expr);

        assert_eq!(simple, iterative);
        assert_eq!(simple, guarded);
        assert_eq!(guard.nesting_count(), 0);
    }

    #[test]
    fn expr_check(expr in arb_expr()) {
        let mut guard = test_guard();

        let iterative = check_iterative(&expr);
        let guarded = check_guarded(&mut guard, &expr);

        assert_eq!(iterative, guarded);
        if iterative.is_ok() {
            assert_eq!(iterative, Ok(naive_eval(&expr)));
        }
        assert_eq!(guard.nesting_count(), 0);
    }
}
