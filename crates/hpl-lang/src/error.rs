use derive_more::From;

/// The text does not conform to the HPL grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

/// The text is well-formed but structurally invalid (alias bindings,
/// bounds, scope shape).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct SanityError(pub String);

/// Operand types are incompatible with an operator, quantifier or domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TypeError(pub String);

/// A parse tree violated the shape the grammar guarantees. Indicates a bug
/// in the grammar producer, never in user input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("grammar contract violated in `{rule}`: {detail}")]
pub struct GrammarError {
    pub rule: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Sanity,
    Type,
    Grammar,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Sanity => "sanity",
            ErrorKind::Type => "type",
            ErrorKind::Grammar => "grammar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(SyntaxError),
    #[error("sanity error: {0}")]
    Sanity(SanityError),
    #[error("type error: {0}")]
    Type(TypeError),
    #[error("{0}")]
    Grammar(GrammarError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::Sanity(_) => ErrorKind::Sanity,
            Self::Type(_) => ErrorKind::Type,
            Self::Grammar(_) => ErrorKind::Grammar,
        }
    }

    /// Sanity and type errors are local to one specification text.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Sanity(_) | Self::Type(_))
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
