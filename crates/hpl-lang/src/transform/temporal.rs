use super::{Reduced, arity, contract, literal};
use crate::ast::{Event, MaxTime, Pattern, Scope};
use crate::error::{GrammarError, ParseResult};
use crate::grammar::{Rule, TokenKind};

/// `after A` or `after A until B`.
pub(super) fn after_until(rule: Rule, children: Vec<Reduced>) -> ParseResult<Scope> {
    match children.len() {
        1 => {
            let [activator] = arity(rule, children)?;
            Ok(Scope::After {
                activator: activator.into_event(rule)?,
            })
        }
        2 => {
            let [activator, terminator] = arity(rule, children)?;
            Ok(Scope::AfterUntil {
                activator: activator.into_event(rule)?,
                terminator: terminator.into_event(rule)?,
            })
        }
        n => Err(contract(rule, format!("expected 1 or 2 children, found {n}")).into()),
    }
}

pub(super) fn until(rule: Rule, children: Vec<Reduced>) -> ParseResult<Scope> {
    let [terminator] = arity(rule, children)?;
    Ok(Scope::Until {
        terminator: terminator.into_event(rule)?,
    })
}

/// Time bound in seconds.
pub(super) fn bound(rule: Rule, children: Vec<Reduced>) -> ParseResult<f64> {
    let [amount, unit] = arity(rule, children)?;
    let amount = amount.into_token(rule, TokenKind::Number)?;
    let unit = unit.into_token(rule, TokenKind::Unit)?;
    match rule {
        Rule::Frequency => literal::frequency(&amount, &unit),
        _ => literal::time_amount(&amount, &unit),
    }
}

/// Events of a pattern in source order plus its bound, unbounded when
/// omitted.
fn events_and_bound<const N: usize>(
    rule: Rule,
    mut children: Vec<Reduced>,
) -> Result<([Event; N], MaxTime), GrammarError> {
    let bound = if children.len() > N { children.pop() } else { None };
    let max_time = bound
        .map(|b| b.into_seconds(rule))
        .transpose()?
        .unwrap_or(f64::INFINITY);
    let events = children
        .into_iter()
        .map(|e| e.into_event(rule))
        .collect::<Result<Vec<_>, _>>()?;
    let found = events.len();
    let events = events
        .try_into()
        .map_err(|_| contract(rule, format!("expected {N} events, found {found}")))?;
    Ok((events, max_time))
}

/// `some B`, `no B`, `A causes B`, `A forbids B`, `B requires A`.
pub(super) fn pattern(rule: Rule, children: Vec<Reduced>) -> ParseResult<Pattern> {
    let pattern = match rule {
        Rule::Existence => {
            let ([behaviour], max_time) = events_and_bound::<1>(rule, children)?;
            Pattern::Existence {
                behaviour,
                max_time,
            }
        }
        Rule::Absence => {
            let ([behaviour], max_time) = events_and_bound::<1>(rule, children)?;
            Pattern::Absence {
                behaviour,
                max_time,
            }
        }
        Rule::Response => {
            let ([trigger, behaviour], max_time) = events_and_bound::<2>(rule, children)?;
            Pattern::Response {
                trigger,
                behaviour,
                max_time,
            }
        }
        Rule::Prevention => {
            let ([trigger, behaviour], max_time) = events_and_bound::<2>(rule, children)?;
            Pattern::Prevention {
                trigger,
                behaviour,
                max_time,
            }
        }
        Rule::Requirement => {
            let ([behaviour, trigger], max_time) = events_and_bound::<2>(rule, children)?;
            Pattern::Requirement {
                behaviour,
                trigger,
                max_time,
            }
        }
        other => return Err(contract(other, "not a pattern".into()).into()),
    };
    Ok(pattern)
}
