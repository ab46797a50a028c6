use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// Picks the decision taken on a selected variable. The negation of the decision is explored
/// when the decision fails.
pub trait ValueSelector {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate;
}
