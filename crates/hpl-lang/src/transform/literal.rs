use std::f64::consts::PI;

use super::contract;
use crate::ast::{Literal, LiteralValue};
use crate::error::{GrammarError, ParseResult, SanityError};
use crate::grammar::Rule;

/// Named numeric constants. Built once, never mutated.
static CONSTANTS: [(&str, f64); 3] = [("PI", PI), ("INF", f64::INFINITY), ("NAN", f64::NAN)];

/// Integer for a plain digit string, float for anything with a fraction or
/// an exponent. Digits that overflow the integer type are an error, never a
/// float.
pub(crate) fn number(lexeme: &str) -> ParseResult<Literal> {
    if !lexeme.is_empty() && lexeme.bytes().all(|b| b.is_ascii_digit()) {
        let n = lexeme
            .parse::<i128>()
            .map_err(|_| SanityError(format!("integer literal out of range: {lexeme}")))?;
        return Ok(Literal::new(lexeme, LiteralValue::Int(n)));
    }
    match lexeme.parse::<f64>() {
        Ok(x) => Ok(Literal::new(lexeme, LiteralValue::Float(x))),
        Err(_) => Err(contract(Rule::Number, format!("bad number '{lexeme}'")).into()),
    }
}

pub(crate) fn boolean(lexeme: &str) -> Result<Literal, GrammarError> {
    let value = match lexeme {
        "True" => true,
        "False" => false,
        other => return Err(contract(Rule::Boolean, format!("bad boolean '{other}'"))),
    };
    Ok(Literal::new(lexeme, LiteralValue::Bool(value)))
}

/// The lexeme keeps its quotes; the value does not.
pub(crate) fn string(lexeme: &str) -> Result<Literal, GrammarError> {
    let value = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| contract(Rule::String, format!("unquoted string {lexeme}")))?;
    Ok(Literal::new(lexeme, LiteralValue::Str(value.to_string())))
}

pub(crate) fn constant(name: &str) -> Result<Literal, GrammarError> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(n, v)| Literal::new(*n, LiteralValue::Float(*v)))
        .ok_or_else(|| contract(Rule::NumberConstant, format!("unknown constant '{name}'")))
}

/// `-literal`, folded into the literal itself. `None` for non-numbers and
/// for integers whose negation overflows.
pub(crate) fn negate(lit: &Literal) -> Option<Literal> {
    let value = match lit.value {
        LiteralValue::Int(n) => LiteralValue::Int(n.checked_neg()?),
        LiteralValue::Float(x) => LiteralValue::Float(-x),
        _ => return None,
    };
    Some(Literal::new(format!("-{}", lit.token), value))
}

fn amount(rule: Rule, lexeme: &str) -> ParseResult<f64> {
    let n = number(lexeme)?
        .as_f64()
        .ok_or_else(|| contract(rule, format!("bad amount '{lexeme}'")))?;
    Ok(n)
}

/// `<n> ms` or `<n> s`, in seconds.
pub(crate) fn time_amount(lexeme: &str, unit: &str) -> ParseResult<f64> {
    let n = amount(Rule::TimeAmount, lexeme)?;
    match unit {
        "ms" => Ok(n / 1000.0),
        "s" => Ok(n),
        other => Err(contract(Rule::TimeAmount, format!("unknown time unit '{other}'")).into()),
    }
}

/// `<n> hz`, as a period in seconds.
pub(crate) fn frequency(lexeme: &str, unit: &str) -> ParseResult<f64> {
    let n = amount(Rule::Frequency, lexeme)?;
    if unit != "hz" {
        return Err(contract(Rule::Frequency, format!("unknown frequency unit '{unit}'")).into());
    }
    if !(n.is_finite() && n > 0.0) {
        return Err(SanityError(format!("invalid frequency: {lexeme} {unit}")).into());
    }
    Ok(1.0 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn integers_and_floats_stay_distinct() {
        assert_eq!(number("3").unwrap().value, LiteralValue::Int(3));
        assert_eq!(number("3.0").unwrap().value, LiteralValue::Float(3.0));
        assert_eq!(number("1e3").unwrap().value, LiteralValue::Float(1000.0));
        assert_eq!(number("3.0").unwrap().token, "3.0");
    }

    #[test]
    fn wide_integers_stay_integers() {
        let lit = number("99999999999999999999").unwrap();
        assert_eq!(lit.value, LiteralValue::Int(99_999_999_999_999_999_999));
        let min = negate(&number("9223372036854775808").unwrap()).unwrap();
        assert_eq!(min.value, LiteralValue::Int(i64::MIN.into()));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let digits = "1".repeat(40);
        assert!(matches!(number(&digits), Err(ParseError::Sanity(_))));
        assert_eq!(number("1e400").unwrap().as_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn booleans() {
        assert_eq!(boolean("True").unwrap().value, LiteralValue::Bool(true));
        assert_eq!(boolean("False").unwrap().value, LiteralValue::Bool(false));
        assert!(boolean("true").is_err());
    }

    #[test]
    fn strings_drop_quotes() {
        let lit = string("\"abc\"").unwrap();
        assert_eq!(lit.token, "\"abc\"");
        assert_eq!(lit.value, LiteralValue::Str("abc".into()));
    }

    #[test]
    fn constants() {
        let pi = constant("PI").unwrap();
        assert_eq!(pi.token, "PI");
        assert_eq!(pi.as_f64(), Some(std::f64::consts::PI));
        assert_eq!(constant("INF").unwrap().as_f64(), Some(f64::INFINITY));
        assert!(constant("NAN").unwrap().as_f64().unwrap().is_nan());
        assert!(constant("E").is_err());
    }

    #[test]
    fn negation_keeps_lexeme() {
        let lit = negate(&number("42").unwrap()).unwrap();
        assert_eq!(lit.value, LiteralValue::Int(-42));
        assert_eq!(lit.token, "-42");
        let twice = negate(&lit).unwrap();
        assert_eq!(twice.value, LiteralValue::Int(42));
        assert!(negate(&boolean("True").unwrap()).is_none());
    }

    #[test]
    fn unit_conversion() {
        assert_eq!(time_amount("500", "ms").unwrap(), 0.5);
        assert_eq!(time_amount("2", "s").unwrap(), 2.0);
        assert_eq!(frequency("4", "hz").unwrap(), 0.25);
        assert!(matches!(frequency("0", "hz"), Err(ParseError::Sanity(_))));
        assert!(matches!(frequency("0.0", "hz"), Err(ParseError::Sanity(_))));
        assert!(matches!(frequency("1e400", "hz"), Err(ParseError::Sanity(_))));
        assert!(matches!(
            time_amount("1", "min"),
            Err(ParseError::Grammar(_))
        ));
    }
}
