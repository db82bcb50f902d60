use super::Expr;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Boolean guard attached to an event or assumption.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub condition: Expr,
}

impl Predicate {
    pub fn new(condition: Expr) -> Self {
        Predicate { condition }
    }

    pub fn vacuous() -> Self {
        Predicate {
            condition: Expr::VacuousTruth,
        }
    }

    pub fn is_vacuous(&self) -> bool {
        matches!(self.condition, Expr::VacuousTruth)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Publication of a message on `topic`, optionally named `alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub topic: String,
    pub alias: Option<String>,
    pub predicate: Predicate,
}

impl Event {
    pub fn publish(topic: impl Into<String>, alias: Option<String>, predicate: Predicate) -> Self {
        Event {
            topic: topic.into(),
            alias,
            predicate,
        }
    }

    /// Aliases referenced by the guard, excluding quantified variables.
    pub fn external_references(&self) -> Vec<&str> {
        self.predicate.condition.free_references()
    }
}
