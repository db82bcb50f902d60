use winnow::combinator::{alt, cut_err, opt, separated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::literal;

use super::{Node, ParseTree, Rule, TokenKind, token, tree};
use crate::parse_utils::{ident, kw, name, number_lexeme, quoted_string, ws_skip};

type Production = fn(&mut &str) -> ModalResult<ParseTree>;
type Operator = fn(&mut &str) -> ModalResult<&'static str>;

// ---------------------------------------------------------------------------
// Conditions (lowest precedence first)
// ---------------------------------------------------------------------------

/// `condition = quantification | disjunction { ("implies" | "iff") disjunction }`
pub(crate) fn condition(input: &mut &str) -> ModalResult<ParseTree> {
    if let Some(q) = opt(quantification).parse_next(input)? {
        return Ok(tree(Rule::Condition, vec![q.into()]));
    }
    left_assoc(Rule::Condition, disjunction, if_op, input)
}

/// `disjunction = conjunction { "or" conjunction }`
fn disjunction(input: &mut &str) -> ModalResult<ParseTree> {
    left_assoc(Rule::Disjunction, conjunction, or_op, input)
}

/// `conjunction = logic_atom { "and" logic_atom }`
fn conjunction(input: &mut &str) -> ModalResult<ParseTree> {
    left_assoc(Rule::Conjunction, logic_atom, and_op, input)
}

fn if_op(input: &mut &str) -> ModalResult<&'static str> {
    alt((kw("implies").value("implies"), kw("iff").value("iff"))).parse_next(input)
}

fn or_op(input: &mut &str) -> ModalResult<&'static str> {
    kw("or").value("or").parse_next(input)
}

fn and_op(input: &mut &str) -> ModalResult<&'static str> {
    kw("and").value("and").parse_next(input)
}

/// `logic_atom = negation | atomic_condition`
fn logic_atom(input: &mut &str) -> ModalResult<ParseTree> {
    alt((negation, atomic_condition)).parse_next(input)
}

/// `negation = "not" logic_atom`
fn negation(input: &mut &str) -> ModalResult<ParseTree> {
    kw("not").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let operand = cut_err(logic_atom)
        .context(StrContext::Expected(StrContextValue::Description(
            "condition after 'not'",
        )))
        .parse_next(input)?;
    Ok(tree(
        Rule::Negation,
        vec![token(TokenKind::Operator, "not"), operand.into()],
    ))
}

/// `quantification = ("forall" | "exists") NAME "in" operand ":" condition`
fn quantification(input: &mut &str) -> ModalResult<ParseTree> {
    let quantifier = alt((kw("forall").value("forall"), kw("exists").value("exists")))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let variable = cut_err(name)
        .context(StrContext::Expected(StrContextValue::Description(
            "quantified variable name",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(kw("in"))
        .context(StrContext::Expected(StrContextValue::Description("'in'")))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let domain = cut_err(operand)
        .context(StrContext::Expected(StrContextValue::Description(
            "quantifier domain",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal(":"))
        .context(StrContext::Expected(StrContextValue::Description("':'")))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let body = cut_err(condition).parse_next(input)?;
    Ok(tree(
        Rule::Quantification,
        vec![
            token(TokenKind::Quantifier, quantifier),
            token(TokenKind::Name, variable),
            domain.into(),
            body.into(),
        ],
    ))
}

/// `atomic_condition = expr [rel_op expr]`
fn atomic_condition(input: &mut &str) -> ModalResult<ParseTree> {
    let left = expr.parse_next(input)?;
    ws_skip.parse_next(input)?;
    match opt(rel_op).parse_next(input)? {
        Some(op) => {
            ws_skip.parse_next(input)?;
            let right = cut_err(expr)
                .context(StrContext::Expected(StrContextValue::Description(
                    "right-hand side of comparison",
                )))
                .parse_next(input)?;
            Ok(tree(
                Rule::AtomicCondition,
                vec![left.into(), token(TokenKind::Operator, op), right.into()],
            ))
        }
        None => Ok(tree(Rule::AtomicCondition, vec![left.into()])),
    }
}

fn rel_op(input: &mut &str) -> ModalResult<&'static str> {
    alt((
        literal("!=").value("!="),
        literal("<=").value("<="),
        literal(">=").value(">="),
        literal("=").value("="),
        literal("<").value("<"),
        literal(">").value(">"),
        kw("in").value("in"),
    ))
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// `expr = term { ("+" | "-") term }`
pub(crate) fn expr(input: &mut &str) -> ModalResult<ParseTree> {
    left_assoc(Rule::Expr, term, add_op, input)
}

/// `term = factor { ("*" | "/") factor }`
fn term(input: &mut &str) -> ModalResult<ParseTree> {
    left_assoc(Rule::Term, factor, mul_op, input)
}

fn add_op(input: &mut &str) -> ModalResult<&'static str> {
    alt((literal("+").value("+"), literal("-").value("-"))).parse_next(input)
}

fn mul_op(input: &mut &str) -> ModalResult<&'static str> {
    if input.starts_with("**") {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    alt((literal("*").value("*"), literal("/").value("/"))).parse_next(input)
}

/// `factor = operand { "**" operand }`
fn factor(input: &mut &str) -> ModalResult<ParseTree> {
    left_assoc(Rule::Factor, operand, pow_op, input)
}

fn pow_op(input: &mut &str) -> ModalResult<&'static str> {
    literal("**").value("**").parse_next(input)
}

/// Shared shape of every binary precedence level: the first operand alone
/// yields `rule(operand)`; each further `op operand` wraps what was parsed so
/// far as the left child, which makes the fold left-associative.
fn left_assoc(
    rule: Rule,
    operand: Production,
    operator: Operator,
    input: &mut &str,
) -> ModalResult<ParseTree> {
    let mut acc = operand(input)?;
    let mut folded = false;
    loop {
        ws_skip.parse_next(input)?;
        let Some(op) = opt(operator).parse_next(input)? else {
            break;
        };
        ws_skip.parse_next(input)?;
        let right = cut_err(operand)
            .context(StrContext::Expected(StrContextValue::Description(
                "operand",
            )))
            .parse_next(input)?;
        acc = tree(
            rule,
            vec![acc.into(), token(TokenKind::Operator, op), right.into()],
        );
        folded = true;
    }
    if folded {
        Ok(acc)
    } else {
        Ok(tree(rule, vec![acc.into()]))
    }
}

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

pub(crate) fn operand(input: &mut &str) -> ModalResult<ParseTree> {
    alt((
        negative_number,
        paren_condition,
        number_constant,
        boolean,
        string,
        number,
        enum_literal,
        range_literal,
        function_call,
        reference,
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

/// `negative_number = "-" operand`
fn negative_number(input: &mut &str) -> ModalResult<ParseTree> {
    literal("-").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let inner = cut_err(operand).parse_next(input)?;
    Ok(tree(
        Rule::NegativeNumber,
        vec![token(TokenKind::Operator, "-"), inner.into()],
    ))
}

fn paren_condition(input: &mut &str) -> ModalResult<ParseTree> {
    literal("(").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let inner = cut_err(condition).parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal(")"))
        .context(StrContext::Expected(StrContextValue::Description("')'")))
        .parse_next(input)?;
    Ok(inner)
}

fn number_constant(input: &mut &str) -> ModalResult<ParseTree> {
    let c = alt((
        kw("PI").value("PI"),
        kw("INF").value("INF"),
        kw("NAN").value("NAN"),
    ))
    .parse_next(input)?;
    Ok(tree(
        Rule::NumberConstant,
        vec![token(TokenKind::Constant, c)],
    ))
}

fn boolean(input: &mut &str) -> ModalResult<ParseTree> {
    let b = alt((kw("True").value("True"), kw("False").value("False"))).parse_next(input)?;
    Ok(tree(Rule::Boolean, vec![token(TokenKind::Boolean, b)]))
}

fn string(input: &mut &str) -> ModalResult<ParseTree> {
    let s = quoted_string.parse_next(input)?;
    Ok(tree(Rule::String, vec![token(TokenKind::String, s)]))
}

fn number(input: &mut &str) -> ModalResult<ParseTree> {
    let n = number_lexeme.parse_next(input)?;
    Ok(tree(Rule::Number, vec![token(TokenKind::Number, n)]))
}

/// `enum_literal = "{" expr { "," expr } "}"`
fn enum_literal(input: &mut &str) -> ModalResult<ParseTree> {
    literal("{").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let members: Vec<ParseTree> = cut_err(separated(
        1..,
        (ws_skip, expr).map(|(_, e)| e),
        (ws_skip, literal(",")),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "set member",
    )))
    .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal("}"))
        .context(StrContext::Expected(StrContextValue::Description("'}'")))
        .parse_next(input)?;
    Ok(tree(
        Rule::EnumLiteral,
        members.into_iter().map(Node::from).collect(),
    ))
}

/// `range_literal = ("[" | "![") expr ("to" | ",") expr ("]" | "]!")`
fn range_literal(input: &mut &str) -> ModalResult<ParseTree> {
    let left = alt((literal("!["), literal("["))).parse_next(input)?;
    ws_skip.parse_next(input)?;
    let lower = cut_err(expr)
        .context(StrContext::Expected(StrContextValue::Description(
            "range lower bound",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(alt((kw("to").void(), literal(",").void())))
        .context(StrContext::Expected(StrContextValue::Description(
            "'to' or ','",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    let upper = cut_err(expr)
        .context(StrContext::Expected(StrContextValue::Description(
            "range upper bound",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal("]"))
        .context(StrContext::Expected(StrContextValue::Description("']'")))
        .parse_next(input)?;
    // `]!=` is a closing bracket followed by an inequality, not `]!`.
    let right = if input.starts_with('!') && !input.starts_with("!=") {
        literal("!").parse_next(input)?;
        "]!"
    } else {
        "]"
    };
    Ok(tree(
        Rule::RangeLiteral,
        vec![
            token(TokenKind::LeftDelimiter, left),
            lower.into(),
            upper.into(),
            token(TokenKind::RightDelimiter, right),
        ],
    ))
}

/// `function_call = NAME "(" condition ")"`, exactly one argument.
fn function_call(input: &mut &str) -> ModalResult<ParseTree> {
    let function = name.parse_next(input)?;
    ws_skip.parse_next(input)?;
    literal("(").parse_next(input)?;
    ws_skip.parse_next(input)?;
    let argument = cut_err(condition)
        .context(StrContext::Expected(StrContextValue::Description(
            "function argument",
        )))
        .parse_next(input)?;
    ws_skip.parse_next(input)?;
    cut_err(literal(")"))
        .context(StrContext::Expected(StrContextValue::Description(
            "')' after the single function argument",
        )))
        .parse_next(input)?;
    Ok(tree(
        Rule::FunctionCall,
        vec![token(TokenKind::Name, function), argument.into()],
    ))
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// `reference = (variable | own_field) { "." NAME | "[" expr "]" }`
///
/// The index bracket must follow its base immediately, and an indexed
/// reference cannot be indexed again (`a[1][2]`).
fn reference(input: &mut &str) -> ModalResult<ParseTree> {
    let mut base = if opt(literal("@")).parse_next(input)?.is_some() {
        let var = cut_err(ident)
            .context(StrContext::Expected(StrContextValue::Description(
                "variable name after '@'",
            )))
            .parse_next(input)?;
        tree(Rule::Variable, vec![token(TokenKind::Name, var)])
    } else {
        let field = name.parse_next(input)?;
        tree(Rule::OwnField, vec![token(TokenKind::Name, field)])
    };

    let mut indexed = false;
    loop {
        if input.starts_with('.') {
            literal(".").parse_next(input)?;
            let field = cut_err(name)
                .context(StrContext::Expected(StrContextValue::Description(
                    "field name after '.'",
                )))
                .parse_next(input)?;
            base = tree(
                Rule::FieldAccess,
                vec![base.into(), token(TokenKind::Name, field)],
            );
            indexed = false;
        } else if input.starts_with('[') && !indexed {
            literal("[").parse_next(input)?;
            ws_skip.parse_next(input)?;
            let index = cut_err(expr)
                .context(StrContext::Expected(StrContextValue::Description(
                    "array index",
                )))
                .parse_next(input)?;
            ws_skip.parse_next(input)?;
            cut_err(literal("]"))
                .context(StrContext::Expected(StrContextValue::Description("']'")))
                .parse_next(input)?;
            base = tree(Rule::ArrayAccess, vec![base.into(), index.into()]);
            indexed = true;
        } else {
            break;
        }
    }
    Ok(base)
}
