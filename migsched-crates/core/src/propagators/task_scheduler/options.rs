/// Options for the task scheduler and the aliased cumulative propagators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSchedulerOptions {
    /// Bounds the start of every free arriving task by the moment after which the optimistic
    /// usage profile never exceeds the capacity again. This removes solutions which only differ
    /// in a later start, but keeps at least one of them.
    pub start_upper_bound_dominance: bool,
    /// Skips the start tightening of a round when the free capacity at time 0 already covers
    /// every arriving task.
    pub fast_path: bool,
}

impl Default for TaskSchedulerOptions {
    fn default() -> Self {
        TaskSchedulerOptions {
            start_upper_bound_dominance: true,
            fast_path: true,
        }
    }
}
