use super::*;

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

/// A pattern applied within a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub scope: Scope,
    pub pattern: Pattern,
}

impl Property {
    pub fn is_safety(&self) -> bool {
        self.pattern.is_safety()
    }

    pub fn is_liveness(&self) -> bool {
        self.pattern.is_liveness()
    }

    /// All events of the property: activator, trigger, behaviour, terminator.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.scope
            .activator()
            .into_iter()
            .chain(self.pattern.trigger())
            .chain(std::iter::once(self.pattern.behaviour()))
            .chain(self.scope.terminator())
    }
}

/// A guard restricting the messages accepted on `topic`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumption {
    pub topic: String,
    pub predicate: Predicate,
}
