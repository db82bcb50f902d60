use std::fmt;

use super::*;

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.pattern)
    }
}

impl fmt::Display for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.topic, self.predicate)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "globally"),
            Scope::After { activator } => write!(f, "after {activator}"),
            Scope::Until { terminator } => write!(f, "until {terminator}"),
            Scope::AfterUntil {
                activator,
                terminator,
            } => write!(f, "after {activator} until {terminator}"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Existence { behaviour, .. } => write!(f, "some {behaviour}")?,
            Pattern::Absence { behaviour, .. } => write!(f, "no {behaviour}")?,
            Pattern::Response {
                trigger, behaviour, ..
            } => write!(f, "{trigger} causes {behaviour}")?,
            Pattern::Prevention {
                trigger, behaviour, ..
            } => write!(f, "{trigger} forbids {behaviour}")?,
            Pattern::Requirement {
                behaviour, trigger, ..
            } => write!(f, "{behaviour} requires {trigger}")?,
        }
        if self.is_bounded() {
            write!(f, " within {}s", self.max_time())?;
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.topic)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        if !self.predicate.is_vacuous() {
            write!(f, " {{ {} }}", self.predicate)?;
        }
        Ok(())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.condition)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::VacuousTruth => write!(f, "True"),
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::VarReference(name) => write!(f, "@{name}"),
            Expr::ThisMessage => Ok(()),
            Expr::FieldAccess { base, field } => match base.as_ref() {
                Expr::ThisMessage => write!(f, "{field}"),
                other => write!(f, "{other}.{field}"),
            },
            Expr::ArrayAccess { base, index } => write!(f, "{base}[{index}]"),
            Expr::FunctionCall { function, argument } => write!(f, "{function}({argument})"),
            Expr::Set(members) => {
                write!(f, "{{")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{m}")?;
                }
                write!(f, "}}")
            }
            Expr::Range {
                lower,
                upper,
                exclude_lower,
                exclude_upper,
            } => {
                let l = if *exclude_lower { "![" } else { "[" };
                let r = if *exclude_upper { "]!" } else { "]" };
                write!(f, "{l}{lower} to {upper}{r}")
            }
            Expr::UnaryOperator { op, operand } => match op {
                UnaryOp::Not => write!(f, "not ({operand})"),
                UnaryOp::Neg => write!(f, "-({operand})"),
            },
            Expr::BinaryOperator { op, left, right } => {
                write!(f, "({left}) {} ({right})", op.symbol())
            }
            Expr::Quantifier {
                kind,
                variable,
                domain,
                body,
            } => {
                let q = match kind {
                    QuantifierKind::Forall => "forall",
                    QuantifierKind::Exists => "exists",
                };
                write!(f, "{q} {variable} in {domain}: ({body})")
            }
        }
    }
}
