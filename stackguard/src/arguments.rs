use std::iter::FusedIterator;

/// An ordered collection of sub-items, typically the operands of an expression node.
///
/// # Implementing this trait
///
/// Tree-shaped data implements this with `Argument = Self`, which makes it usable
/// with [`crate::fold_arguments`] and [`crate::fold_guarded`]:
///
/// ```rust
/// # use stackguard::ArgumentProvider;
/// enum Expr {
///     Add(Box<Expr>, Box<Expr>),
///     Lit(i64),
/// }
///
/// impl ArgumentProvider for Expr {
///     type Argument = Expr;
///
///     fn argument_count(&self) -> usize {
///         match self {
///             Expr::Add(..) => 2,
///             Expr::Lit(_) => 0,
///         }
///     }
///
///     fn argument(&self, index: usize) -> &Expr {
///         match (self, index) {
///             (Expr::Add(a, _), 0) => a,
///             (Expr::Add(_, b), 1) => b,
///             _ => panic!("argument index {index} out of range"),
///         }
///     }
/// }
///
/// let expr = Expr::Add(Box::new(Expr::Lit(1)), Box::new(Expr::Lit(2)));
/// assert_eq!(expr.arguments().count(), 2);
/// ```
pub trait ArgumentProvider {
    type Argument;

    fn argument_count(&self) -> usize;

    /// # Panics
    ///
    /// Panics if `index >= self.argument_count()`.
    fn argument(&self, index: usize) -> &Self::Argument;

    /// Iterate over all arguments in order.
    fn arguments(&self) -> Arguments<'_, Self> {
        Arguments {
            provider: self,
            front: 0,
            back: self.argument_count(),
        }
    }
}

impl<T> ArgumentProvider for [T] {
    type Argument = T;

    fn argument_count(&self) -> usize {
        self.len()
    }

    fn argument(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<T> ArgumentProvider for Vec<T> {
    type Argument = T;

    fn argument_count(&self) -> usize {
        self.len()
    }

    fn argument(&self, index: usize) -> &T {
        &self[index]
    }
}

/// Iterator returned by [`ArgumentProvider::arguments`].
pub struct Arguments<'a, P: ?Sized> {
    provider: &'a P,
    front: usize,
    back: usize,
}

impl<'a, P: ArgumentProvider + ?Sized> Iterator for Arguments<'a, P> {
    type Item = &'a P::Argument;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let arg = self.provider.argument(self.front);
        self.front += 1;
        Some(arg)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, P: ArgumentProvider + ?Sized> DoubleEndedIterator for Arguments<'a, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.provider.argument(self.back))
    }
}

impl<'a, P: ArgumentProvider + ?Sized> ExactSizeIterator for Arguments<'a, P> {}

impl<'a, P: ArgumentProvider + ?Sized> FusedIterator for Arguments<'a, P> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_arguments_in_order() {
        let args = vec!["a", "b", "c"];
        assert_eq!(args.argument_count(), 3);
        assert_eq!(*args.argument(1), "b");
        assert_eq!(args.arguments().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(args.arguments().rev().copied().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn iterator_ends_meet() {
        let args = [1, 2, 3];
        let mut iter = args[..].arguments();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    #[should_panic]
    fn out_of_range_argument_panics() {
        let args: Vec<u8> = Vec::new();
        args.argument(0);
    }
}
