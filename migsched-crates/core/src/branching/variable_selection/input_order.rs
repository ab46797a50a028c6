use log::warn;

use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the first variable which is not fixed given the order in
/// the provided list.
#[derive(Debug, Clone)]
pub struct InputOrder {
    variables: Vec<DomainId>,
}

impl InputOrder {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The InputOrder variable selector was not provided with any variables");
        }
        InputOrder {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for InputOrder {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .find(|variable| !context.is_integer_fixed(**variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn the_first_unfixed_variable_is_selected() {
        let assignments = SelectionContext::create_for_testing(vec![(3, 3), (0, 5), (1, 2)]);
        let variables = assignments.get_domains().collect::<Vec<_>>();
        let mut random = SmallRng::seed_from_u64(0);
        let mut context = SelectionContext::new(&assignments, &mut random);

        let mut selector = InputOrder::new(&variables);
        assert_eq!(Some(variables[1]), selector.select_variable(&mut context));
    }

    #[test]
    fn nothing_is_selected_when_all_are_fixed() {
        let assignments = SelectionContext::create_for_testing(vec![(3, 3), (4, 4)]);
        let variables = assignments.get_domains().collect::<Vec<_>>();
        let mut random = SmallRng::seed_from_u64(0);
        let mut context = SelectionContext::new(&assignments, &mut random);

        let mut selector = InputOrder::new(&variables);
        assert_eq!(None, selector.select_variable(&mut context));
    }
}
