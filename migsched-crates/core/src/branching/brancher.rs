use crate::basic_types::Solution;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
#[cfg(doc)]
use crate::Solver;

/// Decides how the search continues once propagation has reached a fixed point.
pub trait Brancher {
    /// Returns the next decision, or [`None`] when every variable of the brancher is fixed.
    ///
    /// The returned [`Predicate`] must not hold yet, and its negation must be a valid alternative.
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate>;

    /// Called after the [`Solver`] found `solution`.
    fn on_solution(&mut self, _solution: &Solution) {}
}

impl<B: Brancher + ?Sized> Brancher for Box<B> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        (**self).next_decision(context)
    }

    fn on_solution(&mut self, solution: &Solution) {
        (**self).on_solution(solution)
    }
}
