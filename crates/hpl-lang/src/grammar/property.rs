use winnow::combinator::{alt, cut_err, opt};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::literal;

use super::expr::condition;
use super::{ParseTree, Rule, TokenKind, token, tree};
use crate::parse_utils::{ident, kw, number_lexeme, ros_name, ws_skip};

// ---------------------------------------------------------------------------
// Top-level rules
// ---------------------------------------------------------------------------

/// `hpl_property = scope ":" pattern`
pub(super) fn hpl_property(input: &mut &str) -> ModalResult<ParseTree> {
    ws_skip.parse_next(input)?;
    let scope = cut_err(scope)
        .context(StrContext::Expected(StrContextValue::Description(
            "scope ('globally', 'after', 'until')",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal(":"))
        .context(StrContext::Expected(StrContextValue::Description(
            "':' after scope",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let pattern = cut_err(pattern)
        .context(StrContext::Expected(StrContextValue::Description(
            "pattern",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    Ok(tree(Rule::HplProperty, vec![scope.into(), pattern.into()]))
}

/// `hpl_assumption = ros_name predicate`
pub(super) fn hpl_assumption(input: &mut &str) -> ModalResult<ParseTree> {
    ws_skip.parse_next(input)?;
    let topic = cut_err(topic)
        .context(StrContext::Expected(StrContextValue::Description(
            "topic name",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let predicate = cut_err(predicate)
        .context(StrContext::Expected(StrContextValue::Description(
            "'{' condition '}'",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    Ok(tree(
        Rule::HplAssumption,
        vec![topic.into(), predicate.into()],
    ))
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

fn scope(input: &mut &str) -> ModalResult<ParseTree> {
    alt((global_scope, after_until, until)).parse_next(input)
}

fn global_scope(input: &mut &str) -> ModalResult<ParseTree> {
    kw("globally").parse_next(input)?;
    Ok(tree(Rule::GlobalScope, vec![]))
}

/// `after_until = "after" activator ["until" terminator]`
fn after_until(input: &mut &str) -> ModalResult<ParseTree> {
    kw("after").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let activator = cut_err(event).parse_next(input)?;
    let mut children = vec![tree(Rule::Activator, vec![activator.into()]).into()];
    ws_skip.parse_next(input)?;
    if opt(kw("until")).parse_next(input)?.is_some() {
        ws_skip.parse_next(input)?;
        let terminator = cut_err(event).parse_next(input)?;
        children.push(tree(Rule::Terminator, vec![terminator.into()]).into());
    }
    Ok(tree(Rule::AfterUntil, children))
}

fn until(input: &mut &str) -> ModalResult<ParseTree> {
    kw("until").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let terminator = cut_err(event).parse_next(input)?;
    Ok(tree(
        Rule::Until,
        vec![tree(Rule::Terminator, vec![terminator.into()]).into()],
    ))
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

fn pattern(input: &mut &str) -> ModalResult<ParseTree> {
    alt((
        unary_pattern("some", Rule::Existence),
        unary_pattern("no", Rule::Absence),
        binary_pattern,
    ))
    .parse_next(input)
}

/// `existence = "some" event [bound]`, `absence = "no" event [bound]`
fn unary_pattern<'a>(
    keyword: &'static str,
    rule: Rule,
) -> impl FnMut(&mut &'a str) -> ModalResult<ParseTree> {
    move |input: &mut &'a str| {
        kw(keyword).parse_next(input)?;
        ws_skip.parse_next(input)?;
        let behaviour = cut_err(event).parse_next(input)?;
        let mut children = vec![behaviour.into()];
        if let Some(bound) = opt(time_bound).parse_next(input)? {
            children.push(bound.into());
        }
        Ok(tree(rule, children))
    }
}

/// `response = event "causes" event [bound]`,
/// `prevention = event "forbids" event [bound]`,
/// `requirement = event "requires" event [bound]`
fn binary_pattern(input: &mut &str) -> ModalResult<ParseTree> {
    let first = event.parse_next(input)?;
    ws_skip.parse_next(input)?;
    let rule = cut_err(alt((
        kw("causes").value(Rule::Response),
        kw("forbids").value(Rule::Prevention),
        kw("requires").value(Rule::Requirement),
    )))
    .context(StrContext::Expected(StrContextValue::Description(
        "'causes', 'forbids' or 'requires'",
    )))
    .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let second = cut_err(event).parse_next(input)?;
    let mut children = vec![first.into(), second.into()];
    if let Some(bound) = opt(time_bound).parse_next(input)? {
        children.push(bound.into());
    }
    Ok(tree(rule, children))
}

/// `bound = "within" (time_amount | frequency)`
fn time_bound(input: &mut &str) -> ModalResult<ParseTree> {
    ws_skip.parse_next(input)?;
    kw("within").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let n = cut_err(number_lexeme)
        .context(StrContext::Expected(StrContextValue::Description(
            "duration after 'within'",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let (rule, unit) = cut_err(alt((
        kw("ms").value((Rule::TimeAmount, "ms")),
        kw("s").value((Rule::TimeAmount, "s")),
        kw("hz").value((Rule::Frequency, "hz")),
    )))
    .context(StrContext::Expected(StrContextValue::Description(
        "time unit (ms|s) or frequency unit (hz)",
    )))
    .parse_next(input)?;
    Ok(tree(
        rule,
        vec![token(TokenKind::Number, n), token(TokenKind::Unit, unit)],
    ))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// `event = message [predicate]`
fn event(input: &mut &str) -> ModalResult<ParseTree> {
    let message = message.parse_next(input)?;
    let mut children = vec![message.into()];
    let saved = *input;
    ws_skip.parse_next(input)?;
    if input.starts_with('{') {
        children.push(predicate.parse_next(input)?.into());
    } else {
        *input = saved;
    }
    Ok(tree(Rule::Event, children))
}

/// `message = ros_name ["as" NAME]`
fn message(input: &mut &str) -> ModalResult<ParseTree> {
    let topic = topic.parse_next(input)?;
    let mut children = vec![topic.into()];
    let saved = *input;
    ws_skip.parse_next(input)?;
    if opt(kw("as")).parse_next(input)?.is_some() {
        ws_skip.parse_next(input)?;
        let alias = cut_err(ident)
            .context(StrContext::Expected(StrContextValue::Description(
                "alias after 'as'",
            )))
            .parse_next(input)?;
        children.push(token(TokenKind::Name, alias));
    } else {
        *input = saved;
    }
    Ok(tree(Rule::Message, children))
}

fn topic(input: &mut &str) -> ModalResult<ParseTree> {
    let name = ros_name.parse_next(input)?;
    Ok(tree(Rule::RosName, vec![token(TokenKind::RosName, name)]))
}

/// `predicate = "{" condition "}"`; the braces may not be empty.
fn predicate(input: &mut &str) -> ModalResult<ParseTree> {
    literal("{").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let condition = cut_err(condition)
        .context(StrContext::Expected(StrContextValue::Description(
            "condition inside '{ }'",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal("}"))
        .context(StrContext::Expected(StrContextValue::Description("'}'")))
        .parse_next(input)?;
    Ok(tree(Rule::Predicate, vec![condition.into()]))
}
