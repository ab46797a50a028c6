use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// Picks the next variable to branch on.
pub trait VariableSelector {
    /// Returns an unfixed variable, or [`None`] when all variables are fixed.
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId>;
}
