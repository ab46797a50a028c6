use enum_map::EnumMap;
use enumset::EnumSet;

use super::IntDomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::PropagatorVarId;

/// For every domain and every kind of event, the propagators subscribed to it.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchListCP {
    watchers: KeyedVec<DomainId, EnumMap<IntDomainEvent, Vec<PropagatorVarId>>>,
}

impl WatchListCP {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(EnumMap::default());
    }

    pub(crate) fn watch_all(
        &mut self,
        domain: DomainId,
        events: EnumSet<IntDomainEvent>,
        propagator_var: PropagatorVarId,
    ) {
        let watcher = &mut self.watchers[domain];
        for event in events {
            let event_watcher = &mut watcher[event];
            if !event_watcher.contains(&propagator_var) {
                event_watcher.push(propagator_var);
            }
        }
    }

    pub(crate) fn get_affected_propagators(
        &self,
        event: IntDomainEvent,
        domain: DomainId,
    ) -> &[PropagatorVarId] {
        &self.watchers[domain][event]
    }
}
