use std::fmt::Display;
use std::fmt::Formatter;

/// A multi-dimensional step function over time.
///
/// It is built from usage changes: [`Profile::reset`] sets the usage at time 0, after which
/// [`Profile::add_change`] records deltas at arbitrary moments. [`Profile::build`] then sorts the
/// moments and turns the deltas into absolute usages. Afterwards, entry `i` holds the usage on
/// `[time(i), time(i + 1))`, and the last entry holds the usage from its time onwards.
#[derive(Clone, Debug, Default)]
pub(crate) struct Profile {
    num_dimensions: usize,
    /// The moments at which a change was recorded, with the offset of its deltas.
    changes: Vec<(i32, usize)>,
    deltas: Vec<i32>,
    times: Vec<i32>,
    /// Row-major; the usages of entry `i` are at `[i * num_dimensions, (i + 1) * num_dimensions)`.
    usages: Vec<i32>,
}

impl Profile {
    /// Clears the profile and sets the usage at time 0.
    pub(crate) fn reset(&mut self, initial_usage: &[i32]) {
        self.num_dimensions = initial_usage.len();
        self.changes.clear();
        self.deltas.clear();
        self.times.clear();
        self.usages.clear();
        self.add_change(0, initial_usage, 1);
    }

    /// Records that `sign * usage` is added to the profile from `time` onwards.
    pub(crate) fn add_change(&mut self, time: i32, usage: &[i32], sign: i32) {
        self.changes.push((time, self.deltas.len()));
        self.deltas.extend(usage.iter().map(|&amount| sign * amount));
    }

    /// Accumulates the recorded changes in ascending order of time.
    pub(crate) fn build(&mut self) {
        self.changes.sort_by_key(|&(time, _)| time);

        let mut running = vec![0; self.num_dimensions];
        let mut index = 0;
        while index < self.changes.len() {
            let time = self.changes[index].0;
            while index < self.changes.len() && self.changes[index].0 == time {
                let offset = self.changes[index].1;
                running
                    .iter_mut()
                    .zip(&self.deltas[offset..offset + self.num_dimensions])
                    .for_each(|(total, delta)| *total += delta);
                index += 1;
            }
            self.times.push(time);
            self.usages.extend_from_slice(&running);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.times.len()
    }

    pub(crate) fn time(&self, index: usize) -> i32 {
        self.times[index]
    }

    pub(crate) fn usage(&self, index: usize) -> &[i32] {
        &self.usages[index * self.num_dimensions..(index + 1) * self.num_dimensions]
    }

    /// The first dimension in which the usage of entry `index` exceeds `capacity`.
    pub(crate) fn exceeded_dimension(&self, index: usize, capacity: &[i32]) -> Option<usize> {
        self.usage(index)
            .iter()
            .zip(capacity)
            .position(|(usage, capacity)| usage > capacity)
    }

    /// Whether adding `extra` to entry `index` exceeds `capacity` in some dimension.
    pub(crate) fn overflows_with(&self, index: usize, extra: &[i32], capacity: &[i32]) -> bool {
        self.usage(index)
            .iter()
            .zip(extra)
            .zip(capacity)
            .any(|((usage, extra), capacity)| usage + extra > *capacity)
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for index in 0..self.len() {
            write!(f, "{}:{:?} ", self.time(index), self.usage(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Profile;

    #[test]
    fn changes_at_the_same_moment_are_merged() {
        let mut profile = Profile::default();
        profile.reset(&[4, 1]);
        profile.add_change(5, &[2, 1], -1);
        profile.add_change(3, &[1, 0], 1);
        profile.add_change(5, &[3, 3], 1);
        profile.build();

        assert_eq!(3, profile.len());
        assert_eq!((0, &[4, 1][..]), (profile.time(0), profile.usage(0)));
        assert_eq!((3, &[5, 1][..]), (profile.time(1), profile.usage(1)));
        assert_eq!((5, &[6, 3][..]), (profile.time(2), profile.usage(2)));
    }

    #[test]
    fn a_change_at_time_zero_adjusts_the_initial_usage() {
        let mut profile = Profile::default();
        profile.reset(&[3]);
        profile.add_change(0, &[3], -1);
        profile.build();

        assert_eq!(1, profile.len());
        assert_eq!(&[0], profile.usage(0));
    }

    #[test]
    fn overflow_is_detected_per_dimension() {
        let mut profile = Profile::default();
        profile.reset(&[2, 5]);
        profile.build();

        assert_eq!(Some(1), profile.exceeded_dimension(0, &[2, 4]));
        assert_eq!(None, profile.exceeded_dimension(0, &[2, 5]));
        assert!(profile.overflows_with(0, &[1, 0], &[2, 5]));
        assert!(!profile.overflows_with(0, &[0, 0], &[2, 5]));
    }

    #[test]
    fn resetting_discards_the_previous_round() {
        let mut profile = Profile::default();
        profile.reset(&[1]);
        profile.add_change(2, &[1], 1);
        profile.build();

        profile.reset(&[7]);
        profile.build();
        assert_eq!(1, profile.len());
        assert_eq!(&[7], profile.usage(0));
    }
}
