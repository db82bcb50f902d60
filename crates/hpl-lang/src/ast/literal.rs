// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Normalized value of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i128),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// A literal together with the lexeme it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub token: String,
    pub value: LiteralValue,
}

impl Literal {
    pub fn new(token: impl Into<String>, value: LiteralValue) -> Self {
        Literal {
            token: token.into(),
            value,
        }
    }

    /// Numeric value widened to `f64`, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            LiteralValue::Int(n) => Some(n as f64),
            LiteralValue::Float(x) => Some(x),
            _ => None,
        }
    }
}
