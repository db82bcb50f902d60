use super::{Reduced, arity, contract};
use crate::ast::{Event, Predicate};
use crate::check::Kinds;
use crate::error::{ParseResult, TypeError};
use crate::grammar::{Rule, TokenKind};

/// `{ condition }`; the condition must be able to produce a boolean.
pub(super) fn predicate(rule: Rule, children: Vec<Reduced>) -> ParseResult<Predicate> {
    let [condition] = arity(rule, children)?;
    let condition = condition.into_expr(rule)?;
    if !condition.ty.admits(Kinds::BOOL) {
        return Err(TypeError(format!(
            "predicate must be bool, found {} in `{}`",
            condition.ty.kinds, condition.expr
        ))
        .into());
    }
    Ok(Predicate::new(condition.expr))
}

pub(super) fn message(rule: Rule, children: Vec<Reduced>) -> ParseResult<Reduced> {
    let (topic, alias) = match children.len() {
        1 => {
            let [topic] = arity(rule, children)?;
            (topic.into_topic(rule)?, None)
        }
        2 => {
            let [topic, alias] = arity(rule, children)?;
            (
                topic.into_topic(rule)?,
                Some(alias.into_token(rule, TokenKind::Name)?),
            )
        }
        n => return Err(contract(rule, format!("expected 1 or 2 children, found {n}")).into()),
    };
    Ok(Reduced::Message { topic, alias })
}

/// A message publication; without a guard the predicate is vacuously true.
pub(super) fn event(rule: Rule, children: Vec<Reduced>) -> ParseResult<Event> {
    let mut children = children.into_iter();
    let (Some(Reduced::Message { topic, alias }), guard, None) =
        (children.next(), children.next(), children.next())
    else {
        return Err(contract(rule, "expected message and optional predicate".into()).into());
    };
    let predicate = match guard {
        Some(p) => p.into_predicate(rule)?,
        None => Predicate::vacuous(),
    };
    Ok(Event::publish(topic, alias, predicate))
}
