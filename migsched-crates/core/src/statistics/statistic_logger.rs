use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;
#[cfg(doc)]
use crate::propagation::Propagator;

/// Logs the statistics of one component under its name, e.g. `TaskScheduler_2_num_rounds` for
/// the rounds of the third [`Propagator`]. The default logger has no name, for the statistics of
/// the whole search.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    segments: Vec<String>,
}

impl StatisticLogger {
    /// The logger of the propagator called `name` at position `index` in the solver.
    pub fn for_propagator(name: &str, index: usize) -> StatisticLogger {
        StatisticLogger {
            segments: vec![name.to_owned(), index.to_string()],
        }
    }

    /// The logger of the part `segment` of this component.
    pub fn nested(&self, segment: impl Display) -> StatisticLogger {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        StatisticLogger { segments }
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(self.segments.iter().join("_"), value);
    }
}
