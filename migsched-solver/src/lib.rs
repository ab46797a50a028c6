//! # Migsched solver
//! Plans the timing of a datacenter reconfiguration. The library re-exports `migsched-core`,
//! which holds the scheduling rules and the search; the `migsched-solver` binary reads a JSON
//! instance, posts its rules and prints the schedules it finds.
pub use migsched_core::*;
