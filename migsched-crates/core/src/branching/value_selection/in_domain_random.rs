use crate::branching::value_selection::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// A [`ValueSelector`] which fixes the variable to a value drawn uniformly from its domain.
#[derive(Debug, Clone, Copy)]
pub struct InDomainRandom;

impl ValueSelector for InDomainRandom {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        let values_in_domain = context
            .domain_values(decision_variable)
            .collect::<Vec<_>>();
        let random_index = context.random_index(values_in_domain.len());
        predicate!(decision_variable == values_in_domain[random_index])
    }
}
