use log::warn;

use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the unfixed variable with the fewest values left. Ties go
/// to the variable which comes first in the provided list.
#[derive(Debug, Clone)]
pub struct FirstFail {
    variables: Vec<DomainId>,
}

impl FirstFail {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The FirstFail variable selector was not provided with any variables");
        }
        FirstFail {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for FirstFail {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        let mut selected: Option<(DomainId, u32)> = None;
        for &variable in self.variables.iter() {
            if context.is_integer_fixed(variable) {
                continue;
            }
            let size = context.get_size_of_domain(variable);
            match selected {
                Some((_, smallest)) if smallest <= size => {}
                _ => selected = Some((variable, size)),
            }
        }
        selected.map(|(variable, _)| variable)
    }
}
