//! Grammar producer: turns HPL text into a concrete [`ParseTree`] with one
//! node per grammar production. The tree is consumed by
//! [`crate::transform`], which never sees raw text.

use winnow::prelude::*;

mod expr;
mod property;

use crate::error::SyntaxError;
use crate::parse_utils::ws_skip;

#[cfg(test)]
mod tests;

// ---------------------------------------------------------------------------
// Parse tree
// ---------------------------------------------------------------------------

/// Grammar productions that appear as parse-tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    HplProperty,
    HplAssumption,
    TopLevelCondition,
    GlobalScope,
    AfterUntil,
    Until,
    Activator,
    Terminator,
    Existence,
    Absence,
    Response,
    Prevention,
    Requirement,
    Event,
    Message,
    Predicate,
    Condition,
    Disjunction,
    Conjunction,
    Negation,
    Quantification,
    AtomicCondition,
    FunctionCall,
    Expr,
    Term,
    Factor,
    NegativeNumber,
    NumberConstant,
    EnumLiteral,
    RangeLiteral,
    Variable,
    OwnField,
    FieldAccess,
    ArrayAccess,
    Frequency,
    TimeAmount,
    Boolean,
    String,
    Number,
    RosName,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::HplProperty => "hpl_property",
            Rule::HplAssumption => "hpl_assumption",
            Rule::TopLevelCondition => "top_level_condition",
            Rule::GlobalScope => "global_scope",
            Rule::AfterUntil => "after_until",
            Rule::Until => "until",
            Rule::Activator => "activator",
            Rule::Terminator => "terminator",
            Rule::Existence => "existence",
            Rule::Absence => "absence",
            Rule::Response => "response",
            Rule::Prevention => "prevention",
            Rule::Requirement => "requirement",
            Rule::Event => "event",
            Rule::Message => "message",
            Rule::Predicate => "predicate",
            Rule::Condition => "condition",
            Rule::Disjunction => "disjunction",
            Rule::Conjunction => "conjunction",
            Rule::Negation => "negation",
            Rule::Quantification => "quantification",
            Rule::AtomicCondition => "atomic_condition",
            Rule::FunctionCall => "function_call",
            Rule::Expr => "expr",
            Rule::Term => "term",
            Rule::Factor => "factor",
            Rule::NegativeNumber => "negative_number",
            Rule::NumberConstant => "number_constant",
            Rule::EnumLiteral => "enum_literal",
            Rule::RangeLiteral => "range_literal",
            Rule::Variable => "variable",
            Rule::OwnField => "own_field",
            Rule::FieldAccess => "field_access",
            Rule::ArrayAccess => "array_access",
            Rule::Frequency => "frequency",
            Rule::TimeAmount => "time_amount",
            Rule::Boolean => "boolean",
            Rule::String => "string",
            Rule::Number => "number",
            Rule::RosName => "ros_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    RosName,
    Operator,
    Quantifier,
    Number,
    String,
    Boolean,
    Constant,
    Unit,
    LeftDelimiter,
    RightDelimiter,
}

/// A terminal of the grammar, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Tree(ParseTree),
    Token(Token),
}

impl From<ParseTree> for Node {
    fn from(tree: ParseTree) -> Self {
        Node::Tree(tree)
    }
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Token(token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    pub rule: Rule,
    pub children: Vec<Node>,
}

pub(crate) fn tree(rule: Rule, children: Vec<Node>) -> ParseTree {
    ParseTree { rule, children }
}

pub(crate) fn token(kind: TokenKind, text: &str) -> Node {
    Node::Token(Token {
        kind,
        text: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Start rule of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    Property,
    Assumption,
    Predicate,
}

/// Parse `input` from the given start rule.
pub fn parse_tree(input: &str, start: StartRule) -> Result<ParseTree, SyntaxError> {
    let result = match start {
        StartRule::Property => property::hpl_property.parse(input),
        StartRule::Assumption => property::hpl_assumption.parse(input),
        StartRule::Predicate => top_level_condition.parse(input),
    };
    result.map_err(|e| {
        let detail = e.inner().to_string();
        SyntaxError {
            offset: e.offset(),
            message: if detail.is_empty() {
                "unexpected input".to_string()
            } else {
                detail
            },
        }
    })
}

fn top_level_condition(input: &mut &str) -> ModalResult<ParseTree> {
    ws_skip.parse_next(input)?;
    let condition = expr::condition.parse_next(input)?;
    ws_skip.parse_next(input)?;
    Ok(tree(Rule::TopLevelCondition, vec![condition.into()]))
}
