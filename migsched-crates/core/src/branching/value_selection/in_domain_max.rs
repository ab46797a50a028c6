use crate::branching::value_selection::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// A [`ValueSelector`] which fixes the variable to its upper bound.
#[derive(Debug, Clone, Copy)]
pub struct InDomainMax;

impl ValueSelector for InDomainMax {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        predicate!(decision_variable == context.upper_bound(decision_variable))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn the_upper_bound_is_selected() {
        let assignments = SelectionContext::create_for_testing(vec![(4, 9)]);
        let x = assignments.get_domains().next().unwrap();
        let mut random = SmallRng::seed_from_u64(0);
        let mut context = SelectionContext::new(&assignments, &mut random);

        assert_eq!(predicate!(x == 9), InDomainMax.select_value(&mut context, x));
    }
}
