use super::Event;

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

/// Window of the trace over which a pattern must hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    Global,
    After { activator: Event },
    Until { terminator: Event },
    AfterUntil { activator: Event, terminator: Event },
}

impl Scope {
    pub fn activator(&self) -> Option<&Event> {
        match self {
            Scope::After { activator } | Scope::AfterUntil { activator, .. } => Some(activator),
            Scope::Global | Scope::Until { .. } => None,
        }
    }

    pub fn terminator(&self) -> Option<&Event> {
        match self {
            Scope::Until { terminator } | Scope::AfterUntil { terminator, .. } => Some(terminator),
            Scope::Global | Scope::After { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Upper bound, in seconds, of the time window of a pattern.
/// `f64::INFINITY` means unbounded.
pub type MaxTime = f64;

/// One of the five behavioural patterns.
///
/// `behaviour` is the event the pattern is about; `trigger` is the event
/// that opens (response, prevention) or must precede (requirement) it.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Existence {
        behaviour: Event,
        max_time: MaxTime,
    },
    Absence {
        behaviour: Event,
        max_time: MaxTime,
    },
    /// `trigger causes behaviour`
    Response {
        trigger: Event,
        behaviour: Event,
        max_time: MaxTime,
    },
    /// `trigger forbids behaviour`
    Prevention {
        trigger: Event,
        behaviour: Event,
        max_time: MaxTime,
    },
    /// `behaviour requires trigger`, with the bound measured backwards.
    Requirement {
        behaviour: Event,
        trigger: Event,
        max_time: MaxTime,
    },
}

impl Pattern {
    pub fn behaviour(&self) -> &Event {
        match self {
            Pattern::Existence { behaviour, .. }
            | Pattern::Absence { behaviour, .. }
            | Pattern::Response { behaviour, .. }
            | Pattern::Prevention { behaviour, .. }
            | Pattern::Requirement { behaviour, .. } => behaviour,
        }
    }

    pub fn trigger(&self) -> Option<&Event> {
        match self {
            Pattern::Existence { .. } | Pattern::Absence { .. } => None,
            Pattern::Response { trigger, .. }
            | Pattern::Prevention { trigger, .. }
            | Pattern::Requirement { trigger, .. } => Some(trigger),
        }
    }

    pub fn max_time(&self) -> MaxTime {
        match self {
            Pattern::Existence { max_time, .. }
            | Pattern::Absence { max_time, .. }
            | Pattern::Response { max_time, .. }
            | Pattern::Prevention { max_time, .. }
            | Pattern::Requirement { max_time, .. } => *max_time,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max_time().is_finite()
    }

    pub fn is_safety(&self) -> bool {
        matches!(
            self,
            Pattern::Absence { .. } | Pattern::Prevention { .. } | Pattern::Requirement { .. }
        )
    }

    pub fn is_liveness(&self) -> bool {
        matches!(self, Pattern::Existence { .. } | Pattern::Response { .. })
    }
}
