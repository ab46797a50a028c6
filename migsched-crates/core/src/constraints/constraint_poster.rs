use log::warn;

use super::Constraint;
use crate::ConstraintOperationError;
use crate::Solver;

/// A structure which is responsible for adding the created [`Constraint`]s to the
/// [`Solver`]. For an example on how to use this, see [`crate::constraints`].
#[derive(Debug)]
pub struct ConstraintPoster<'solver, ConstraintImpl> {
    solver: &'solver mut Solver,
    constraint: Option<ConstraintImpl>,
}

impl<'solver, ConstraintImpl: Constraint> ConstraintPoster<'solver, ConstraintImpl> {
    pub(crate) fn new(solver: &'solver mut Solver, constraint: ConstraintImpl) -> Self {
        ConstraintPoster {
            solver,
            constraint: Some(constraint),
        }
    }

    /// Add the [`Constraint`] to the [`Solver`].
    ///
    /// This method returns a [`ConstraintOperationError`] if the addition of the [`Constraint`]
    /// led to a root-level conflict.
    pub fn post(mut self) -> Result<(), ConstraintOperationError> {
        match self.constraint.take() {
            Some(constraint) => constraint.post(self.solver),
            None => Ok(()),
        }
    }
}

impl<ConstraintImpl> Drop for ConstraintPoster<'_, ConstraintImpl> {
    fn drop(&mut self) {
        if self.constraint.is_some() {
            warn!("A constraint was created but not posted; call `post` on the ConstraintPoster");
        }
    }
}
