use super::predicate::Predicate;
use crate::engine::variables::DomainId;

/// Builds the four kinds of [`Predicate`] over a variable; used by the [`predicate!`] macro.
pub trait PredicateConstructor {
    type Value;

    fn lower_bound_predicate(&self, bound: Self::Value) -> Predicate;

    fn upper_bound_predicate(&self, bound: Self::Value) -> Predicate;

    fn equality_predicate(&self, value: Self::Value) -> Predicate;

    fn disequality_predicate(&self, value: Self::Value) -> Predicate;
}

impl PredicateConstructor for DomainId {
    type Value = i32;

    fn lower_bound_predicate(&self, bound: Self::Value) -> Predicate {
        Predicate::LowerBound {
            domain_id: *self,
            lower_bound: bound,
        }
    }

    fn upper_bound_predicate(&self, bound: Self::Value) -> Predicate {
        Predicate::UpperBound {
            domain_id: *self,
            upper_bound: bound,
        }
    }

    fn equality_predicate(&self, value: Self::Value) -> Predicate {
        Predicate::Equal {
            domain_id: *self,
            equality_constant: value,
        }
    }

    fn disequality_predicate(&self, value: Self::Value) -> Predicate {
        Predicate::NotEqual {
            domain_id: *self,
            not_equal_constant: value,
        }
    }
}

/// Creates a [`Predicate`] from a comparison between a variable and a value.
///
/// # Example
/// ```rust
/// # use migsched_core::Solver;
/// # use migsched_core::predicate;
/// # use migsched_core::predicates::Predicate;
/// let mut solver = Solver::default();
/// let start = solver.new_bounded_integer(0, 10);
///
/// assert_eq!(
///     predicate!(start >= 4),
///     Predicate::LowerBound {
///         domain_id: start,
///         lower_bound: 4
///     }
/// );
/// assert_eq!(
///     predicate!(start != 2),
///     Predicate::NotEqual {
///         domain_id: start,
///         not_equal_constant: 2
///     }
/// );
/// ```
#[macro_export]
macro_rules! predicate {
    ($($var:ident).+$([$index:expr])? >= $bound:expr) => {{
        #[allow(unused, reason = "could be imported twice")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.lower_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? <= $bound:expr) => {{
        #[allow(unused, reason = "could be imported twice")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.upper_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? == $value:expr) => {{
        #[allow(unused, reason = "could be imported twice")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.equality_predicate($value)
    }};
    ($($var:ident).+$([$index:expr])? != $value:expr) => {{
        #[allow(unused, reason = "could be imported twice")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.disequality_predicate($value)
    }};
}

#[cfg(test)]
mod tests {
    use crate::engine::variables::DomainId;
    use crate::predicates::Predicate;

    #[test]
    fn indexed_and_field_variables_are_accepted() {
        struct Task {
            end: DomainId,
        }
        let starts = [DomainId::new(0), DomainId::new(1)];
        let task = Task {
            end: DomainId::new(2),
        };

        assert_eq!(
            Predicate::UpperBound {
                domain_id: DomainId::new(1),
                upper_bound: 3
            },
            predicate!(starts[1] <= 3)
        );
        assert_eq!(
            Predicate::Equal {
                domain_id: DomainId::new(2),
                equality_constant: 0
            },
            predicate!(task.end == 0)
        );
    }

    #[test]
    fn negation_flips_the_comparison() {
        let x = DomainId::new(0);

        assert_eq!(predicate!(x <= 4), !predicate!(x >= 5));
        assert_eq!(predicate!(x != 4), !predicate!(x == 4));
    }
}
