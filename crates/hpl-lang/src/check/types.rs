use std::fmt;

use super::funcs::signature;
use crate::ast::{BinaryOp, Expr, LiteralValue, UnaryOp};
use crate::error::TypeError;
use crate::schema::{BaseType, FieldType, FieldTypeResolver};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Set of value kinds an expression may evaluate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kinds(u8);

impl Kinds {
    pub const NONE: Kinds = Kinds(0);
    pub const BOOL: Kinds = Kinds(1);
    pub const NUMBER: Kinds = Kinds(1 << 1);
    pub const STRING: Kinds = Kinds(1 << 2);
    pub const ARRAY: Kinds = Kinds(1 << 3);
    pub const MESSAGE: Kinds = Kinds(1 << 4);
    pub const SCALAR: Kinds = Kinds(Self::BOOL.0 | Self::NUMBER.0 | Self::STRING.0);
    pub const ANY: Kinds = Kinds(Self::SCALAR.0 | Self::ARRAY.0 | Self::MESSAGE.0);

    pub const fn union(self, other: Kinds) -> Kinds {
        Kinds(self.0 | other.0)
    }

    pub const fn intersect(self, other: Kinds) -> Kinds {
        Kinds(self.0 & other.0)
    }

    /// True if some kind is possible in both sets.
    pub const fn admits(self, other: Kinds) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Kinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Kinds, &str); 5] = [
            (Kinds::BOOL, "bool"),
            (Kinds::NUMBER, "number"),
            (Kinds::STRING, "string"),
            (Kinds::ARRAY, "array"),
            (Kinds::MESSAGE, "message"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(k, _)| self.admits(*k))
            .map(|(_, n)| *n)
            .collect();
        if names.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

/// Possible kinds of a value, plus the possible kinds of its elements when
/// it may be an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ty {
    pub kinds: Kinds,
    pub elems: Kinds,
}

impl Ty {
    pub const ANY: Ty = Ty {
        kinds: Kinds::ANY,
        elems: Kinds::ANY,
    };
    pub const BOOL: Ty = Ty::of(Kinds::BOOL);
    pub const NUMBER: Ty = Ty::of(Kinds::NUMBER);

    pub const fn of(kinds: Kinds) -> Ty {
        Ty {
            kinds,
            elems: Kinds::ANY,
        }
    }

    pub const fn array(elems: Kinds) -> Ty {
        Ty {
            kinds: Kinds::ARRAY,
            elems,
        }
    }

    pub fn admits(&self, kinds: Kinds) -> bool {
        self.kinds.admits(kinds)
    }
}

impl From<FieldType> for Ty {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Base(b) => Ty::of(base_kind(b)),
            FieldType::Array(b) => Ty::array(base_kind(b)),
        }
    }
}

fn base_kind(b: BaseType) -> Kinds {
    match b {
        BaseType::Bool => Kinds::BOOL,
        BaseType::Int | BaseType::Float => Kinds::NUMBER,
        BaseType::String => Kinds::STRING,
        BaseType::Message => Kinds::MESSAGE,
    }
}

// ---------------------------------------------------------------------------
// Local rule
// ---------------------------------------------------------------------------

fn expect(ty: Ty, kinds: Kinds, what: &str, expr: &Expr) -> Result<(), TypeError> {
    if ty.admits(kinds) {
        Ok(())
    } else {
        Err(TypeError(format!(
            "{what} must be {kinds}, found {} in `{expr}`",
            ty.kinds
        )))
    }
}

/// Type of `expr` given the types of its direct children, in
/// [`Expr::children`] order. References and field accesses get the widest
/// type here; [`TypeEnv::infer`] narrows them.
pub fn node_type(expr: &Expr, children: &[Ty]) -> Result<Ty, TypeError> {
    match (expr, children) {
        (Expr::VacuousTruth, []) => Ok(Ty::BOOL),
        (Expr::Literal(lit), []) => Ok(Ty::of(match lit.value {
            LiteralValue::Int(_) | LiteralValue::Float(_) => Kinds::NUMBER,
            LiteralValue::Bool(_) => Kinds::BOOL,
            LiteralValue::Str(_) => Kinds::STRING,
        })),
        (Expr::VarReference(_), []) => Ok(Ty::ANY),
        (Expr::ThisMessage, []) => Ok(Ty::of(Kinds::MESSAGE)),
        (Expr::FieldAccess { .. }, [base]) => {
            expect(*base, Kinds::MESSAGE, "field access base", expr)?;
            Ok(Ty::ANY)
        }
        (Expr::ArrayAccess { .. }, [base, index]) => {
            expect(*base, Kinds::ARRAY, "indexed value", expr)?;
            expect(*index, Kinds::NUMBER, "array index", expr)?;
            Ok(Ty::of(base.elems))
        }
        (Expr::FunctionCall { function, .. }, [arg]) => {
            let sig = signature(function)
                .ok_or_else(|| TypeError(format!("unknown function '{function}'")))?;
            expect(*arg, sig.argument, &format!("argument of {function}()"), expr)?;
            Ok(Ty::of(sig.result))
        }
        (Expr::Set(_), members) => {
            let mut elems = Kinds::NONE;
            for m in members {
                expect(*m, Kinds::SCALAR, "set member", expr)?;
                elems = elems.union(m.kinds.intersect(Kinds::SCALAR));
            }
            Ok(Ty::array(elems))
        }
        (Expr::Range { .. }, [lower, upper]) => {
            expect(*lower, Kinds::NUMBER, "range lower bound", expr)?;
            expect(*upper, Kinds::NUMBER, "range upper bound", expr)?;
            Ok(Ty::array(Kinds::NUMBER))
        }
        (Expr::UnaryOperator { op, .. }, [operand]) => match op {
            UnaryOp::Not => {
                expect(*operand, Kinds::BOOL, "operand of 'not'", expr)?;
                Ok(Ty::BOOL)
            }
            UnaryOp::Neg => {
                expect(*operand, Kinds::NUMBER, "operand of unary '-'", expr)?;
                Ok(Ty::NUMBER)
            }
        },
        (Expr::BinaryOperator { op, .. }, [left, right]) => binary_type(*op, *left, *right, expr),
        (Expr::Quantifier { .. }, [domain, body]) => {
            expect(*domain, Kinds::ARRAY, "quantifier domain", expr)?;
            expect(*body, Kinds::BOOL, "quantifier body", expr)?;
            Ok(Ty::BOOL)
        }
        _ => Err(TypeError(format!(
            "unexpected operand count {} in `{expr}`",
            children.len()
        ))),
    }
}

fn binary_type(op: BinaryOp, left: Ty, right: Ty, expr: &Expr) -> Result<Ty, TypeError> {
    let what = |side: &str| format!("{side} operand of '{}'", op.symbol());
    if op.is_logical() {
        expect(left, Kinds::BOOL, &what("left"), expr)?;
        expect(right, Kinds::BOOL, &what("right"), expr)?;
        return Ok(Ty::BOOL);
    }
    if op.is_arithmetic() {
        expect(left, Kinds::NUMBER, &what("left"), expr)?;
        expect(right, Kinds::NUMBER, &what("right"), expr)?;
        return Ok(Ty::NUMBER);
    }
    match op {
        BinaryOp::Eq | BinaryOp::Ne => {
            if !left.kinds.admits(right.kinds) {
                return Err(TypeError(format!(
                    "cannot compare {} with {} in `{expr}`",
                    left.kinds, right.kinds
                )));
            }
        }
        BinaryOp::In => {
            expect(right, Kinds::ARRAY, &what("right"), expr)?;
            expect(left, right.elems, &what("left"), expr)?;
        }
        _ => {
            expect(left, Kinds::NUMBER, &what("left"), expr)?;
            expect(right, Kinds::NUMBER, &what("right"), expr)?;
        }
    }
    Ok(Ty::BOOL)
}

// ---------------------------------------------------------------------------
// Environment-aware inference
// ---------------------------------------------------------------------------

/// Bindings visible to a guard: the topic of the guarded message, event
/// aliases with their topics, and an optional field type resolver.
#[derive(Default, Clone, Copy)]
pub struct TypeEnv<'a> {
    topic: Option<&'a str>,
    aliases: &'a [(&'a str, &'a str)],
    resolver: Option<&'a dyn FieldTypeResolver>,
}

impl<'a> TypeEnv<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic(mut self, topic: &'a str) -> Self {
        self.topic = Some(topic);
        self
    }

    /// `(alias, topic)` pairs.
    pub fn with_aliases(mut self, aliases: &'a [(&'a str, &'a str)]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_resolver(mut self, resolver: Option<&'a dyn FieldTypeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Infer the type of `expr`, binding quantified variables to the
    /// element kinds of their domains.
    pub fn infer(&self, expr: &Expr) -> Result<Ty, TypeError> {
        self.infer_in(expr, &mut Vec::new())
    }

    /// Check that `expr` is a valid boolean condition.
    pub fn check_condition(&self, expr: &Expr) -> Result<(), TypeError> {
        let ty = self.infer(expr)?;
        expect(ty, Kinds::BOOL, "condition", expr)
    }

    fn infer_in<'e>(&self, expr: &'e Expr, vars: &mut Vec<(&'e str, Ty)>) -> Result<Ty, TypeError> {
        match expr {
            Expr::VarReference(name) => {
                if let Some((_, ty)) = vars.iter().rev().find(|(v, _)| *v == name.as_str()) {
                    return Ok(*ty);
                }
                if self.alias_topic(name).is_some() {
                    return Ok(Ty::of(Kinds::MESSAGE));
                }
                Ok(Ty::ANY)
            }
            Expr::Quantifier {
                variable,
                domain,
                body,
                ..
            } => {
                let d = self.infer_in(domain, vars)?;
                vars.push((variable.as_str(), Ty::of(d.elems)));
                let b = self.infer_in(body, vars);
                vars.pop();
                node_type(expr, &[d, b?])
            }
            Expr::FieldAccess { base, .. } => {
                let b = self.infer_in(base, vars)?;
                let ty = node_type(expr, &[b])?;
                match self.resolve_field(expr, vars)? {
                    Some(resolved) => Ok(resolved),
                    None => Ok(ty),
                }
            }
            _ => {
                let children = expr
                    .children()
                    .into_iter()
                    .map(|c| self.infer_in(c, vars))
                    .collect::<Result<Vec<_>, _>>()?;
                node_type(expr, &children)
            }
        }
    }

    fn alias_topic(&self, alias: &str) -> Option<&'a str> {
        self.aliases
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, topic)| *topic)
    }

    /// Field type from the resolver, when the access is rooted at the own
    /// message or at an alias of a topic the resolver knows.
    fn resolve_field(&self, expr: &Expr, vars: &[(&str, Ty)]) -> Result<Option<Ty>, TypeError> {
        let Some(resolver) = self.resolver else {
            return Ok(None);
        };
        let Some((root, path)) = field_path(expr) else {
            return Ok(None);
        };
        let topic = match root {
            None => self.topic,
            Some(name) if vars.iter().any(|(v, _)| *v == name) => None,
            Some(name) => self.alias_topic(name),
        };
        let Some(topic) = topic.filter(|t| resolver.knows_topic(t)) else {
            return Ok(None);
        };
        match resolver.field_type(topic, &path) {
            Some(ty) => Ok(Some(ty.into())),
            None => Err(TypeError(format!(
                "topic '{topic}' has no field '{path}' in `{expr}`"
            ))),
        }
    }
}

/// Dotted field path of a field access and the alias it is rooted at
/// (`None` for the own message). Array steps are dropped from the path.
fn field_path(expr: &Expr) -> Option<(Option<&str>, String)> {
    match expr {
        Expr::ThisMessage => Some((None, String::new())),
        Expr::VarReference(name) => Some((Some(name), String::new())),
        Expr::ArrayAccess { base, .. } => field_path(base),
        Expr::FieldAccess { base, field } => {
            let (root, mut path) = field_path(base)?;
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(field);
            Some((root, path))
        }
        _ => None,
    }
}
