use thiserror::Error;

/// Errors related to adding constraints to the [`Solver`](crate::Solver).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Error which indicates that adding a constraint caused the solver to become infeasible at
    /// the root.
    #[error("Adding the propagator made the problem infeasible at the root")]
    InfeasiblePropagator,
    /// Error which indicates that a constraint was posted while the solver already was in an
    /// infeasible state.
    #[error("The constraint was posted while the solver was already infeasible")]
    InfeasibleState,
}
