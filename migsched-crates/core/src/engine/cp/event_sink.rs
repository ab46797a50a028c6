use enumset::EnumSet;

use super::IntDomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;

/// Collects the domain events which happened since the last drain, ignoring repeated events of
/// the same kind on the same domain.
#[derive(Default, Debug, Clone)]
pub(crate) struct EventSink {
    present: KeyedVec<DomainId, EnumSet<IntDomainEvent>>,
    events: Vec<(IntDomainEvent, DomainId)>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, event: IntDomainEvent, domain: DomainId) {
        let present = &mut self.present[domain];
        if present.insert(event) {
            self.events.push((event, domain));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (IntDomainEvent, DomainId)> + '_ {
        self.events.drain(..).map(|(event, domain)| {
            self.present[domain].clear();
            (event, domain)
        })
    }
}
