use crate::create_statistics_struct;

create_statistics_struct!(
    /// Statistics of the search performed by the [`ConstraintSatisfactionSolver`].
    ///
    /// [`ConstraintSatisfactionSolver`]: super::ConstraintSatisfactionSolver
    SolverStatistics {
        /// The number of decisions taken by the solver
        num_decisions: u64,
        /// The number of times propagation ended in a contradiction
        num_conflicts: u64,
        /// The number of solutions reported
        num_solutions: u64,
        /// The deepest decision level reached
        peak_depth: u64,
        /// The time spent searching, in milliseconds
        time_spent_in_solver: u64,
});
