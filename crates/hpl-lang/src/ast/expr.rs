use super::Literal;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Implies,
    Iff,
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn is_logical(self) -> bool {
        matches!(self, Self::Implies | Self::Iff | Self::Or | Self::And)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Pow
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Implies => "implies",
            Self::Iff => "iff",
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierKind {
    Forall,
    Exists,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Value-producing node shared by conditions and values.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// Implicit guard of an event without a condition.
    VacuousTruth,
    Literal(Literal),
    /// `@name`: a quantified variable or an event alias.
    VarReference(String),
    /// Implicit receiver of an unqualified field access.
    ThisMessage,
    FieldAccess {
        base: Box<Expr>,
        field: String,
    },
    ArrayAccess {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    FunctionCall {
        function: String,
        argument: Box<Expr>,
    },
    /// `{a, b, c}`
    Set(Vec<Expr>),
    /// `[lo to hi]` with `!` markers for exclusive bounds.
    Range {
        lower: Box<Expr>,
        upper: Box<Expr>,
        exclude_lower: bool,
        exclude_upper: bool,
    },
    UnaryOperator {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinaryOperator {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Quantifier {
        kind: QuantifierKind,
        variable: String,
        domain: Box<Expr>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOperator {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOperator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn field(base: Expr, field: impl Into<String>) -> Self {
        Expr::FieldAccess {
            base: Box::new(base),
            field: field.into(),
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::VacuousTruth | Expr::Literal(_) | Expr::VarReference(_) | Expr::ThisMessage => {
                vec![]
            }
            Expr::FieldAccess { base, .. } => vec![base],
            Expr::ArrayAccess { base, index } => vec![base, index],
            Expr::FunctionCall { argument, .. } => vec![argument],
            Expr::Set(members) => members.iter().collect(),
            Expr::Range { lower, upper, .. } => vec![lower, upper],
            Expr::UnaryOperator { operand, .. } => vec![operand],
            Expr::BinaryOperator { left, right, .. } => vec![left, right],
            Expr::Quantifier { domain, body, .. } => vec![domain, body],
        }
    }

    /// Names referenced with `@name` that no enclosing quantifier binds.
    pub fn free_references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_free(self, &mut Vec::new(), &mut out);
        out
    }
}

fn collect_free<'a>(expr: &'a Expr, bound: &mut Vec<&'a str>, out: &mut Vec<&'a str>) {
    match expr {
        Expr::VarReference(name) => {
            if !bound.contains(&name.as_str()) && !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        Expr::Quantifier {
            variable,
            domain,
            body,
            ..
        } => {
            collect_free(domain, bound, out);
            bound.push(variable);
            collect_free(body, bound, out);
            bound.pop();
        }
        other => {
            for child in other.children() {
                collect_free(child, bound, out);
            }
        }
    }
}
