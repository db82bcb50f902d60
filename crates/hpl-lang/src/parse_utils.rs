use winnow::ascii::multispace0;
use winnow::combinator::{cut_err, opt};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_while};

/// Words that cannot be used as field, variable or function names.
///
/// `implies` and `iff` are keywords only where an operator is expected, so
/// `a implies iff` compares against a field named `iff`.
pub const RESERVED: &[&str] = &[
    "and", "or", "not", "forall", "exists", "in", "to", "True", "False", "PI", "INF", "NAN",
];

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

pub fn ident<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    // First character must be alphabetic or underscore (not digit).
    if !input.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

/// An identifier that is not one of the [`RESERVED`] words.
pub fn name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let saved = *input;
    let id = ident.parse_next(input)?;
    if RESERVED.contains(&id) {
        *input = saved;
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(id)
}

/// ROS graph name: optional `/` or `~` prefix, then `/`-separated segments,
/// e.g. `~events/bumper`, `/cmd_vel`, `scan`.
pub fn ros_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let start = *input;
    let _ = opt(one_of(['/', '~'])).parse_next(input)?;
    ident.parse_next(input)?;
    while input.starts_with('/') {
        let _ = literal("/").parse_next(input)?;
        cut_err(ident)
            .context(StrContext::Expected(StrContextValue::Description(
                "name segment after '/'",
            )))
            .parse_next(input)?;
    }
    Ok(&start[..start.len() - input.len()])
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// A double-quoted string; the returned lexeme keeps its quotes.
pub fn quoted_string<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let start = *input;
    literal("\"").parse_next(input)?;
    let _ = take_while(0.., |c: char| c != '"').parse_next(input)?;
    cut_err(literal("\""))
        .context(StrContext::Expected(StrContextValue::Description(
            "closing quote",
        )))
        .parse_next(input)?;
    Ok(&start[..start.len() - input.len()])
}

// ---------------------------------------------------------------------------
// Whitespace & comments
// ---------------------------------------------------------------------------

/// Skip whitespace and `# ...` line comments.
pub fn ws_skip(input: &mut &str) -> ModalResult<()> {
    loop {
        let _ = multispace0.parse_next(input)?;
        if opt(literal("#")).parse_next(input)?.is_some() {
            let _ = take_while(0.., |c: char| c != '\n').parse_next(input)?;
        } else {
            break;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Keyword matching with word boundary
// ---------------------------------------------------------------------------

/// Match an exact keyword string, ensuring it's not a prefix of a longer
/// identifier (i.e. the next character is not alphanumeric or `_`).
pub fn kw<'a>(keyword: &'static str) -> impl FnMut(&mut &'a str) -> ModalResult<()> {
    move |input: &mut &'a str| {
        let saved = *input;
        literal(keyword).parse_next(input)?;
        if input.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
            *input = saved;
            return Err(ErrMode::Backtrack(ContextError::new()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Number literal
// ---------------------------------------------------------------------------

/// Lexeme of an unsigned number: `42`, `3.0`, `1e-3`, `2.5E+4`.
///
/// Only the lexeme is returned; whether it denotes an integer or a float is
/// decided when the literal is built.
pub fn number_lexeme<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let start = *input;
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') && input[1..].starts_with(|c: char| c.is_ascii_digit()) {
        let _ = literal(".").parse_next(input)?;
        let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    }
    if input.starts_with(['e', 'E']) {
        let saved = *input;
        let _ = one_of(['e', 'E']).parse_next(input)?;
        let _ = opt(one_of(['+', '-'])).parse_next(input)?;
        let exp: ModalResult<&str> = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input);
        if exp.is_err() {
            // `2e` followed by something else is not an exponent.
            *input = saved;
        }
    }
    Ok(&start[..start.len() - input.len()])
}
