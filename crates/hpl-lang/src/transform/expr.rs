use super::{Reduced, Typed, arity, contract, literal as lit};
use crate::ast::{BinaryOp, Expr, QuantifierKind, UnaryOp};
use crate::check::Ty;
use crate::check::types::node_type;
use crate::error::{GrammarError, ParseResult};
use crate::grammar::{Rule, TokenKind};

/// Build `expr` after checking it against the types of its children.
fn typed(expr: Expr, children: &[Ty]) -> ParseResult<Typed> {
    let ty = node_type(&expr, children)?;
    Ok(Typed { expr, ty })
}

fn binary_op(rule: Rule, symbol: &str) -> Result<BinaryOp, GrammarError> {
    let op = match symbol {
        "implies" => BinaryOp::Implies,
        "iff" => BinaryOp::Iff,
        "or" => BinaryOp::Or,
        "and" => BinaryOp::And,
        "=" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "in" => BinaryOp::In,
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "**" => BinaryOp::Pow,
        other => return Err(contract(rule, format!("unknown operator '{other}'"))),
    };
    Ok(op)
}

/// Shared rule of every precedence level: a lone operand passes through
/// unchanged, `left op right` becomes a binary operator.
pub(super) fn fold(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    match children.len() {
        1 => {
            let [operand] = arity(rule, children)?;
            Ok(operand.into_expr(rule)?)
        }
        3 => {
            let [left, op, right] = arity(rule, children)?;
            let op = binary_op(rule, &op.into_token(rule, TokenKind::Operator)?)?;
            let (left, right) = (left.into_expr(rule)?, right.into_expr(rule)?);
            typed(
                Expr::binary(op, left.expr, right.expr),
                &[left.ty, right.ty],
            )
        }
        n => Err(contract(rule, format!("expected 1 or 3 children, found {n}")).into()),
    }
}

pub(super) fn negation(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [_not, operand] = arity(rule, children)?;
    let operand = operand.into_expr(rule)?;
    typed(Expr::unary(UnaryOp::Not, operand.expr), &[operand.ty])
}

/// Unary minus, folded eagerly: numeric literals absorb the sign.
pub(super) fn negative_number(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [_minus, operand] = arity(rule, children)?;
    let operand = operand.into_expr(rule)?;
    if let Expr::Literal(l) = &operand.expr
        && let Some(negated) = lit::negate(l)
    {
        return typed(Expr::Literal(negated), &[]);
    }
    typed(Expr::unary(UnaryOp::Neg, operand.expr), &[operand.ty])
}

pub(super) fn quantification(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [quantifier, variable, domain, body] = arity(rule, children)?;
    let kind = match quantifier.into_token(rule, TokenKind::Quantifier)?.as_str() {
        "forall" => QuantifierKind::Forall,
        "exists" => QuantifierKind::Exists,
        other => return Err(contract(rule, format!("unknown quantifier '{other}'")).into()),
    };
    let variable = variable.into_token(rule, TokenKind::Name)?;
    let (domain, body) = (domain.into_expr(rule)?, body.into_expr(rule)?);
    typed(
        Expr::Quantifier {
            kind,
            variable,
            domain: Box::new(domain.expr),
            body: Box::new(body.expr),
        },
        &[domain.ty, body.ty],
    )
}

pub(super) fn function_call(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [function, argument] = arity(rule, children)?;
    let function = function.into_token(rule, TokenKind::Name)?;
    let argument = argument.into_expr(rule)?;
    typed(
        Expr::FunctionCall {
            function,
            argument: Box::new(argument.expr),
        },
        &[argument.ty],
    )
}

pub(super) fn enum_literal(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    if children.is_empty() {
        return Err(contract(rule, "empty set".into()).into());
    }
    let members = children
        .into_iter()
        .map(|c| c.into_expr(rule))
        .collect::<Result<Vec<_>, _>>()?;
    let types: Vec<Ty> = members.iter().map(|m| m.ty).collect();
    typed(
        Expr::Set(members.into_iter().map(|m| m.expr).collect()),
        &types,
    )
}

/// `[` / `![` open and `]` / `]!` close; each `!` makes its own bound
/// exclusive.
pub(super) fn range_literal(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [open, lower, upper, close] = arity(rule, children)?;
    let exclude_lower = match open.into_token(rule, TokenKind::LeftDelimiter)?.as_str() {
        "[" => false,
        "![" => true,
        other => return Err(contract(rule, format!("bad delimiter '{other}'")).into()),
    };
    let exclude_upper = match close.into_token(rule, TokenKind::RightDelimiter)?.as_str() {
        "]" => false,
        "]!" => true,
        other => return Err(contract(rule, format!("bad delimiter '{other}'")).into()),
    };
    let (lower, upper) = (lower.into_expr(rule)?, upper.into_expr(rule)?);
    typed(
        Expr::Range {
            lower: Box::new(lower.expr),
            upper: Box::new(upper.expr),
            exclude_lower,
            exclude_upper,
        },
        &[lower.ty, upper.ty],
    )
}

pub(super) fn variable(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [name] = arity(rule, children)?;
    typed(
        Expr::VarReference(name.into_token(rule, TokenKind::Name)?),
        &[],
    )
}

/// `name` alone is a field of the message being matched.
pub(super) fn own_field(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [name] = arity(rule, children)?;
    let this = typed(Expr::ThisMessage, &[])?;
    typed(
        Expr::field(this.expr, name.into_token(rule, TokenKind::Name)?),
        &[this.ty],
    )
}

pub(super) fn field_access(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [base, field] = arity(rule, children)?;
    let base = base.into_expr(rule)?;
    typed(
        Expr::field(base.expr, field.into_token(rule, TokenKind::Name)?),
        &[base.ty],
    )
}

pub(super) fn array_access(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [base, index] = arity(rule, children)?;
    let (base, index) = (base.into_expr(rule)?, index.into_expr(rule)?);
    typed(
        Expr::ArrayAccess {
            base: Box::new(base.expr),
            index: Box::new(index.expr),
        },
        &[base.ty, index.ty],
    )
}

pub(super) fn literal(rule: Rule, children: Vec<Reduced>) -> ParseResult<Typed> {
    let [token] = arity(rule, children)?;
    let literal = match rule {
        Rule::Number => lit::number(&token.into_token(rule, TokenKind::Number)?)?,
        Rule::Boolean => lit::boolean(&token.into_token(rule, TokenKind::Boolean)?)?,
        Rule::String => lit::string(&token.into_token(rule, TokenKind::String)?)?,
        Rule::NumberConstant => lit::constant(&token.into_token(rule, TokenKind::Constant)?)?,
        other => return Err(contract(other, "not a literal".into()).into()),
    };
    typed(Expr::Literal(literal), &[])
}
