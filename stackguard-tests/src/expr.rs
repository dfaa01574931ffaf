pub mod eval;
pub mod naive;

use std::mem;

use stackguard::ArgumentProvider;

/// Simple expression language with some operations on integers
#[derive(Debug, Clone)]
pub enum Expr {
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    LiteralInt(i64),
}

impl Expr {
    pub fn add(a: Expr, b: Expr) -> Expr {
        Expr::Add(Box::new(a), Box::new(b))
    }

    pub fn sub(a: Expr, b: Expr) -> Expr {
        Expr::Sub(Box::new(a), Box::new(b))
    }

    pub fn mul(a: Expr, b: Expr) -> Expr {
        Expr::Mul(Box::new(a), Box::new(b))
    }

    pub fn neg(a: Expr) -> Expr {
        Expr::Neg(Box::new(a))
    }

    /// `((0 + 1) + 1) + ...`, `depth` levels deep. Evaluates to `depth`.
    pub fn chain(depth: usize) -> Expr {
        let mut expr = Expr::LiteralInt(0);
        for _ in 0..depth {
            expr = Expr::add(expr, Expr::LiteralInt(1));
        }
        expr
    }

    /// Complete binary tree of additions over `2^depth` ones.
    pub fn balanced(depth: u32) -> Expr {
        if depth == 0 {
            Expr::LiteralInt(1)
        } else {
            Expr::add(Expr::balanced(depth - 1), Expr::balanced(depth - 1))
        }
    }

    fn take_children(&mut self, into: &mut Vec<Box<Expr>>) {
        match self {
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                into.push(mem::replace(a, Box::new(Expr::LiteralInt(0))));
                into.push(mem::replace(b, Box::new(Expr::LiteralInt(0))));
            }
            Expr::Neg(a) => into.push(mem::replace(a, Box::new(Expr::LiteralInt(0)))),
            Expr::LiteralInt(_) => {}
        }
    }
}

// chains far deeper than the call stack are built in tests, so dropping must not recurse
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut child) = pending.pop() {
            child.take_children(&mut pending);
        }
    }
}

impl ArgumentProvider for Expr {
    type Argument = Expr;

    #[inline(always)]
    fn argument_count(&self) -> usize {
        match self {
            Expr::Add(..) | Expr::Sub(..) | Expr::Mul(..) => 2,
            Expr::Neg(_) => 1,
            Expr::LiteralInt(_) => 0,
        }
    }

    #[inline(always)]
    fn argument(&self, index: usize) -> &Expr {
        match (self, index) {
            (Expr::Add(a, _) | Expr::Sub(a, _) | Expr::Mul(a, _) | Expr::Neg(a), 0) => a,
            (Expr::Add(_, b) | Expr::Sub(_, b) | Expr::Mul(_, b), 1) => b,
            _ => panic!(
                "argument index {index} out of range for {} arguments",
                self.argument_count()
            ),
        }
    }
}
