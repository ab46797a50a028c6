use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::migsched_assert_moderate;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// The propagators waiting to run, served by priority and first-come first-served within a
/// priority. A propagator is present at most once.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        Self::new(Priority::NUM_LEVELS)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u32) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        let level = priority as usize;
        migsched_assert_moderate!(level < self.queues.len());

        if self.is_propagator_enqueued(propagator_id) {
            return;
        }

        self.is_enqueued.accomodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;

        if self.queues[level].is_empty() {
            self.present_priorities.push(Reverse(level as u32));
        }
        self.queues[level].push_back(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let Reverse(top_priority) = *self.present_priorities.peek()?;
        let queue = &mut self.queues[top_priority as usize];

        let next_propagator_id = queue.pop_front();
        if queue.is_empty() {
            let _ = self.present_priorities.pop();
        }

        if let Some(propagator_id) = next_propagator_id {
            self.is_enqueued[propagator_id] = false;
            self.num_enqueued -= 1;
        }

        next_propagator_id
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            self.queues[priority as usize].clear();
        }

        self.is_enqueued
            .iter_mut()
            .for_each(|is_enqueued| *is_enqueued = false);
        self.num_enqueued = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::PropagatorQueue;
    use crate::propagation::Priority;
    use crate::propagation::PropagatorId;

    #[test]
    fn higher_priorities_are_served_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(2), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(0), Priority::Medium);
        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.enqueue_propagator(PropagatorId(3), Priority::Medium);

        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert_eq!(None, queue.pop());
        assert!(queue.is_empty());
    }

    #[test]
    fn a_propagator_is_enqueued_once() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(4), Priority::Low);
        queue.enqueue_propagator(PropagatorId(4), Priority::Low);

        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(None, queue.pop());

        queue.enqueue_propagator(PropagatorId(4), Priority::Low);
        queue.clear();
        assert!(!queue.is_propagator_enqueued(PropagatorId(4)));
    }
}
