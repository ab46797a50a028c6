use super::TrailedInteger;
use super::TrailedValues;
use crate::migsched_assert_moderate;

/// A set of indices from `0..universe` which only shrinks during search and grows back when the
/// search backtracks.
///
/// Members occupy the first `size` positions of `elements`; removing a member swaps it just past
/// the boundary and decrements the trailed size. Restoring the size restores the members, whatever
/// order they ended up in.
#[derive(Clone, Debug)]
pub(crate) struct TrailedSparseSet {
    elements: Vec<usize>,
    positions: Vec<usize>,
    size: TrailedInteger,
}

impl TrailedSparseSet {
    /// Creates a set over `0..universe` holding the given members.
    pub(crate) fn new(
        universe: usize,
        members: impl IntoIterator<Item = usize>,
        trailed_values: &mut TrailedValues,
    ) -> Self {
        let mut is_member = vec![false; universe];
        members
            .into_iter()
            .for_each(|member| is_member[member] = true);

        let mut elements: Vec<usize> = (0..universe).filter(|&index| is_member[index]).collect();
        let size = elements.len();
        elements.extend((0..universe).filter(|&index| !is_member[index]));

        let mut positions = vec![0; universe];
        for (position, &element) in elements.iter().enumerate() {
            positions[element] = position;
        }

        TrailedSparseSet {
            elements,
            positions,
            size: trailed_values.grow(size as i64),
        }
    }

    pub(crate) fn len(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.size) as usize
    }

    pub(crate) fn is_empty(&self, trailed_values: &TrailedValues) -> bool {
        self.len(trailed_values) == 0
    }

    pub(crate) fn contains(&self, element: usize, trailed_values: &TrailedValues) -> bool {
        self.positions[element] < self.len(trailed_values)
    }

    pub(crate) fn get(&self, position: usize) -> usize {
        self.elements[position]
    }

    /// Removes `element` if it is a member; returns whether it was.
    pub(crate) fn remove(&mut self, element: usize, trailed_values: &mut TrailedValues) -> bool {
        let size = self.len(trailed_values);
        let position = self.positions[element];
        if position >= size {
            return false;
        }

        let last = self.elements[size - 1];
        self.elements.swap(position, size - 1);
        self.positions[last] = position;
        self.positions[element] = size - 1;
        trailed_values.assign(self.size, size as i64 - 1);

        migsched_assert_moderate!(!self.contains(element, trailed_values));
        true
    }

    /// The members at the time of the call.
    pub(crate) fn iter<'a>(
        &'a self,
        trailed_values: &TrailedValues,
    ) -> impl Iterator<Item = usize> + 'a {
        self.elements[..self.len(trailed_values)].iter().copied()
    }
}
