mod outputs;
pub(crate) mod solver;

pub mod results {
    //! Contains the outputs of solving using the [`Solver`].
    //!
    //! We differentiate between finding a single solution ([`SatisfactionResult`]) and iterating
    //! over every solution ([`SolutionIterator`]).
    pub use crate::api::outputs::solution_iterator::IteratedSolution;
    pub use crate::api::outputs::solution_iterator::SolutionIterator;
    pub use crate::api::outputs::SatisfactionResult;
    pub use crate::basic_types::Solution;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod variables {
    //! Contains the variables which can be created with the [`Solver`].
    pub use crate::engine::variables::DomainId;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod options {
    //! Contains the options which can be passed to the [`Solver`].
    pub use crate::engine::SolverOptions;
    pub use crate::propagators::TaskSchedulerOptions;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod termination {
    //! Contains the conditions which are used to determine when the [`Solver`] should terminate
    //! even when the state of the satisfaction problem is unknown.
    //!
    //! The main [`TerminationCondition`] is a condition which polls whether the solver should
    //! stop; [`TerminationCondition::decision_has_been_made`] and
    //! [`TerminationCondition::conflict_has_been_found`] inform it of search progress.
    pub use crate::engine::termination::*;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod predicates {
    //! Contains structures which represent certain [predicates](https://en.wikipedia.org/wiki/Predicate_(mathematical_logic)).
    //!
    //! The solver narrows domains, and takes decisions, by posting [`Predicate`]s. They are
    //! usually built with the [`predicate!`](crate::predicate) macro.
    pub use crate::engine::predicates::Predicate;
    pub use crate::engine::predicates::PredicateConstructor;
}
