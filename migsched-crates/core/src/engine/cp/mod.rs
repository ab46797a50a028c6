mod assignments;
mod domain_events;
mod event_sink;
mod propagator_queue;
pub(crate) mod test_solver;
mod trailed;
mod watch_list_cp;

pub use assignments::Assignments;
pub use assignments::EmptyDomain;
pub use domain_events::DomainEvents;
pub use domain_events::IntDomainEvent;
pub(crate) use propagator_queue::PropagatorQueue;
pub use trailed::*;
pub(crate) use watch_list_cp::WatchListCP;
