use enum_map::Enum;
use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// The kinds of change that can happen to an integer domain.
#[derive(Debug, Enum, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The domain was reduced to a single value.
    Assign,
    LowerBound,
    UpperBound,
    /// A value was removed from the domain; bound changes caused by the removal of a bound
    /// value are reported as well.
    Removal,
}

/// A set of [`IntDomainEvent`]s a propagator subscribes to for a variable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    int_events: EnumSet<IntDomainEvent>,
}

impl DomainEvents {
    /// Lower and upper bound tightening.
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(IntDomainEvent::LowerBound | IntDomainEvent::UpperBound));
    /// Every kind of change.
    pub const ANY_INT: DomainEvents = DomainEvents::new(enum_set!(
        IntDomainEvent::Assign
            | IntDomainEvent::LowerBound
            | IntDomainEvent::UpperBound
            | IntDomainEvent::Removal
    ));
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::UpperBound));
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::Assign));
    pub const REMOVAL: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::Removal));
    /// Assignment and value removal, the events which change the set of values a placement
    /// variable can still take.
    pub const ASSIGN_AND_REMOVAL: DomainEvents =
        DomainEvents::new(enum_set!(IntDomainEvent::Assign | IntDomainEvent::Removal));

    pub const fn new(int_events: EnumSet<IntDomainEvent>) -> DomainEvents {
        DomainEvents { int_events }
    }

    pub fn events(&self) -> EnumSet<IntDomainEvent> {
        self.int_events
    }
}
