//! Folds a concrete [`ParseTree`] into the AST, bottom-up.
//!
//! Every production has exactly one arm in [`reduce`]. Children are reduced
//! first and handed to the builder of their parent, which destructures them
//! with the arity the grammar guarantees. Any other shape is a
//! [`GrammarError`].

mod event;
mod expr;
pub(crate) mod literal;
mod temporal;

#[cfg(test)]
mod tests;

use crate::ast::{Assumption, Event, Expr, Pattern, Predicate, Property, Scope};
use crate::check::{self, Ty, TypeEnv};
use crate::error::{GrammarError, ParseResult};
use crate::grammar::{Node, ParseTree, Rule, Token, TokenKind};
use crate::schema::FieldTypeResolver;

/// Capabilities available while building.
#[derive(Default, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub resolver: Option<&'a dyn FieldTypeResolver>,
}

/// An expression together with the kinds it was checked to produce.
#[derive(Debug, Clone)]
pub(crate) struct Typed {
    pub expr: Expr,
    pub ty: Ty,
}

/// Result of reducing one node.
#[derive(Debug)]
pub(crate) enum Reduced {
    Token(Token),
    Expr(Typed),
    Predicate(Predicate),
    Topic(String),
    Message { topic: String, alias: Option<String> },
    Event(Event),
    Scope(Scope),
    Pattern(Pattern),
    Seconds(f64),
    Property(Property),
    Assumption(Assumption),
}

impl Reduced {
    fn describe(&self) -> &'static str {
        match self {
            Reduced::Token(_) => "token",
            Reduced::Expr(_) => "expression",
            Reduced::Predicate(_) => "predicate",
            Reduced::Topic(_) => "topic",
            Reduced::Message { .. } => "message",
            Reduced::Event(_) => "event",
            Reduced::Scope(_) => "scope",
            Reduced::Pattern(_) => "pattern",
            Reduced::Seconds(_) => "duration",
            Reduced::Property(_) => "property",
            Reduced::Assumption(_) => "assumption",
        }
    }

    pub(crate) fn into_expr(self, rule: Rule) -> Result<Typed, GrammarError> {
        match self {
            Reduced::Expr(e) => Ok(e),
            other => Err(mismatch(rule, "expression", &other)),
        }
    }

    pub(crate) fn into_token(self, rule: Rule, kind: TokenKind) -> Result<String, GrammarError> {
        match self {
            Reduced::Token(t) if t.kind == kind => Ok(t.text),
            Reduced::Token(t) => Err(contract(
                rule,
                format!("expected {kind:?} token, found {:?} `{}`", t.kind, t.text),
            )),
            other => Err(mismatch(rule, "token", &other)),
        }
    }

    pub(crate) fn into_event(self, rule: Rule) -> Result<Event, GrammarError> {
        match self {
            Reduced::Event(e) => Ok(e),
            other => Err(mismatch(rule, "event", &other)),
        }
    }

    pub(crate) fn into_seconds(self, rule: Rule) -> Result<f64, GrammarError> {
        match self {
            Reduced::Seconds(s) => Ok(s),
            other => Err(mismatch(rule, "duration", &other)),
        }
    }

    pub(crate) fn into_predicate(self, rule: Rule) -> Result<Predicate, GrammarError> {
        match self {
            Reduced::Predicate(p) => Ok(p),
            other => Err(mismatch(rule, "predicate", &other)),
        }
    }

    pub(crate) fn into_topic(self, rule: Rule) -> Result<String, GrammarError> {
        match self {
            Reduced::Topic(t) => Ok(t),
            other => Err(mismatch(rule, "topic", &other)),
        }
    }
}

pub(crate) fn contract(rule: Rule, detail: String) -> GrammarError {
    GrammarError {
        rule: rule.name(),
        detail,
    }
}

fn mismatch(rule: Rule, expected: &str, found: &Reduced) -> GrammarError {
    contract(
        rule,
        format!("expected {expected}, found {}", found.describe()),
    )
}

/// Exactly `N` reduced children.
pub(crate) fn arity<const N: usize>(
    rule: Rule,
    children: Vec<Reduced>,
) -> Result<[Reduced; N], GrammarError> {
    let found = children.len();
    children
        .try_into()
        .map_err(|_| contract(rule, format!("expected {N} children, found {found}")))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub(crate) fn reduce(tree: ParseTree, ctx: Context<'_>) -> ParseResult<Reduced> {
    let ParseTree { rule, children } = tree;
    let children = children
        .into_iter()
        .map(|node| match node {
            Node::Tree(t) => reduce(t, ctx),
            Node::Token(t) => Ok(Reduced::Token(t)),
        })
        .collect::<ParseResult<Vec<_>>>()?;

    match rule {
        Rule::HplProperty => {
            let [scope, pattern] = arity(rule, children)?;
            let (Reduced::Scope(scope), Reduced::Pattern(pattern)) = (scope, pattern) else {
                return Err(contract(rule, "expected scope and pattern".into()).into());
            };
            assemble_property(Property { scope, pattern }, ctx).map(Reduced::Property)
        }
        Rule::HplAssumption => {
            let [topic, predicate] = arity(rule, children)?;
            let assumption = Assumption {
                topic: topic.into_topic(rule)?,
                predicate: predicate.into_predicate(rule)?,
            };
            assemble_assumption(assumption, ctx).map(Reduced::Assumption)
        }
        Rule::TopLevelCondition => {
            let [condition] = arity(rule, children)?;
            let condition = condition.into_expr(rule)?;
            check::check_predicate(&condition.expr)?;
            let env = TypeEnv::new().with_resolver(ctx.resolver);
            env.check_condition(&condition.expr)?;
            Ok(Reduced::Expr(condition))
        }

        Rule::GlobalScope => {
            let [] = arity(rule, children)?;
            Ok(Reduced::Scope(Scope::Global))
        }
        Rule::AfterUntil => temporal::after_until(rule, children).map(Reduced::Scope),
        Rule::Until => temporal::until(rule, children).map(Reduced::Scope),
        Rule::Activator | Rule::Terminator => {
            let [event] = arity(rule, children)?;
            Ok(Reduced::Event(event.into_event(rule)?))
        }
        Rule::Existence
        | Rule::Absence
        | Rule::Response
        | Rule::Prevention
        | Rule::Requirement => temporal::pattern(rule, children).map(Reduced::Pattern),
        Rule::Frequency | Rule::TimeAmount => temporal::bound(rule, children).map(Reduced::Seconds),

        Rule::Event => event::event(rule, children).map(Reduced::Event),
        Rule::Message => event::message(rule, children),
        Rule::Predicate => event::predicate(rule, children).map(Reduced::Predicate),
        Rule::RosName => {
            let [name] = arity(rule, children)?;
            Ok(Reduced::Topic(name.into_token(rule, TokenKind::RosName)?))
        }

        Rule::Condition
        | Rule::Disjunction
        | Rule::Conjunction
        | Rule::AtomicCondition
        | Rule::Expr
        | Rule::Term
        | Rule::Factor => expr::fold(rule, children).map(Reduced::Expr),
        Rule::Negation => expr::negation(rule, children).map(Reduced::Expr),
        Rule::NegativeNumber => expr::negative_number(rule, children).map(Reduced::Expr),
        Rule::Quantification => expr::quantification(rule, children).map(Reduced::Expr),
        Rule::FunctionCall => expr::function_call(rule, children).map(Reduced::Expr),
        Rule::EnumLiteral => expr::enum_literal(rule, children).map(Reduced::Expr),
        Rule::RangeLiteral => expr::range_literal(rule, children).map(Reduced::Expr),
        Rule::Variable => expr::variable(rule, children).map(Reduced::Expr),
        Rule::OwnField => expr::own_field(rule, children).map(Reduced::Expr),
        Rule::FieldAccess => expr::field_access(rule, children).map(Reduced::Expr),
        Rule::ArrayAccess => expr::array_access(rule, children).map(Reduced::Expr),
        Rule::NumberConstant | Rule::Boolean | Rule::String | Rule::Number => {
            expr::literal(rule, children).map(Reduced::Expr)
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Sanity-check a property, then re-check every guard with the aliases of
/// the property in scope.
fn assemble_property(property: Property, ctx: Context<'_>) -> ParseResult<Property> {
    check::check_property(&property)?;
    let aliases: Vec<(&str, &str)> = property
        .events()
        .filter_map(|e| Some((e.alias.as_deref()?, e.topic.as_str())))
        .collect();
    for event in property.events() {
        TypeEnv::new()
            .with_topic(&event.topic)
            .with_aliases(&aliases)
            .with_resolver(ctx.resolver)
            .check_condition(&event.predicate.condition)?;
    }
    Ok(property)
}

fn assemble_assumption(assumption: Assumption, ctx: Context<'_>) -> ParseResult<Assumption> {
    check::check_assumption(&assumption)?;
    TypeEnv::new()
        .with_topic(&assumption.topic)
        .with_resolver(ctx.resolver)
        .check_condition(&assumption.predicate.condition)?;
    Ok(assumption)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub(crate) fn build_property(tree: ParseTree, ctx: Context<'_>) -> ParseResult<Property> {
    match reduce(tree, ctx)? {
        Reduced::Property(p) => Ok(p),
        other => Err(mismatch(Rule::HplProperty, "property", &other).into()),
    }
}

pub(crate) fn build_assumption(tree: ParseTree, ctx: Context<'_>) -> ParseResult<Assumption> {
    match reduce(tree, ctx)? {
        Reduced::Assumption(a) => Ok(a),
        other => Err(mismatch(Rule::HplAssumption, "assumption", &other).into()),
    }
}

pub(crate) fn build_predicate(tree: ParseTree, ctx: Context<'_>) -> ParseResult<Expr> {
    Ok(reduce(tree, ctx)?.into_expr(Rule::TopLevelCondition)?.expr)
}
