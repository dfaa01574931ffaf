use crate::expr::Expr;
use proptest::prelude::*;

/// Plain recursive evaluation, bounded only by the call stack.
pub fn naive_eval(expr: &Expr) -> i64 {
    match expr {
        Expr::Add(a, b) => naive_eval(a).wrapping_add(naive_eval(b)),
        Expr::Sub(a, b) => naive_eval(a).wrapping_sub(naive_eval(b)),
        Expr::Mul(a, b) => naive_eval(a).wrapping_mul(naive_eval(b)),
        Expr::Neg(a) => naive_eval(a).wrapping_neg(),
        Expr::LiteralInt(x) => *x,
    }
}

pub fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![any::<i8>().prop_map(|x| Expr::LiteralInt(x as i64)),];
    leaf.prop_recursive(
        8,   // 8 levels deep
        256, // Shoot for maximum size of 256 nodes
        10,  // We put up to 10 items per collection
        |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::add(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::sub(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::mul(a, b)),
                inner.prop_map(Expr::neg),
            ]
        },
    )
}
