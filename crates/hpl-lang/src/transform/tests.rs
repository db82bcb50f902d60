use super::*;
use crate::ast::{BinaryOp, Literal, LiteralValue, QuantifierKind, UnaryOp};
use crate::error::{ErrorKind, ParseError};
use crate::grammar::{token, tree};
use crate::{parse_assumption, parse_predicate, parse_property};

fn property(text: &str) -> Property {
    match parse_property(text) {
        Ok(p) => p,
        Err(e) => panic!("`{text}` should parse: {e}"),
    }
}

fn predicate(text: &str) -> Expr {
    match parse_predicate(text) {
        Ok(p) => p,
        Err(e) => panic!("`{text}` should parse: {e}"),
    }
}

fn int(n: i128) -> Expr {
    Expr::Literal(Literal::new(n.to_string(), LiteralValue::Int(n)))
}

fn own(field: &str) -> Expr {
    Expr::field(Expr::ThisMessage, field)
}

fn number_tree(lexeme: &str) -> ParseTree {
    tree(Rule::Number, vec![token(TokenKind::Number, lexeme)])
}

// -----------------------------------------------------------------------
// Literals and units
// -----------------------------------------------------------------------

#[test]
fn integer_and_float_literals() {
    let e = predicate("x = 3");
    let Expr::BinaryOperator { right, .. } = e else {
        panic!("expected comparison");
    };
    assert_eq!(*right, int(3));

    let e = predicate("x = 3.0");
    let Expr::BinaryOperator { right, .. } = e else {
        panic!("expected comparison");
    };
    assert_eq!(
        *right,
        Expr::Literal(Literal::new("3.0", LiteralValue::Float(3.0)))
    );
}

#[test]
fn time_bounds_in_seconds() {
    let p = property("globally: some a within 500 ms");
    assert_eq!(p.pattern.max_time(), 0.5);
    let p = property("globally: some a within 2 s");
    assert_eq!(p.pattern.max_time(), 2.0);
    let p = property("globally: some a within 4 hz");
    assert_eq!(p.pattern.max_time(), 0.25);
}

#[test]
fn zero_frequency_is_sanity_error() {
    let err = parse_property("globally: some a within 0 hz").unwrap_err();
    assert!(matches!(err, ParseError::Sanity(_)), "{err}");
}

#[test]
fn overflowing_frequency_is_sanity_error() {
    let err = parse_property("globally: some a within 1e400 hz").unwrap_err();
    assert!(matches!(err, ParseError::Sanity(_)), "{err}");
}

#[test]
fn most_negative_i64_stays_an_integer() {
    let Expr::BinaryOperator { right, .. } = predicate("x = -9223372036854775808") else {
        panic!("expected comparison");
    };
    assert_eq!(
        *right,
        Expr::Literal(Literal::new(
            "-9223372036854775808",
            LiteralValue::Int(i64::MIN.into())
        ))
    );
}

#[test]
fn integer_literal_out_of_range() {
    let text = format!("x = {}", "9".repeat(40));
    let err = parse_predicate(&text).unwrap_err();
    assert!(matches!(err, ParseError::Sanity(_)), "{err}");
}

#[test]
fn default_bound_is_unbounded() {
    let p = property("globally: some a");
    assert_eq!(p.pattern.max_time(), f64::INFINITY);
    assert!(!p.pattern.is_bounded());
    let p = property("globally: some a within 5 s");
    assert_eq!(p.pattern.max_time(), 5.0);
}

#[test]
fn named_constants() {
    let e = predicate("x < PI");
    let Expr::BinaryOperator { right, .. } = e else {
        panic!("expected comparison");
    };
    let Expr::Literal(lit) = *right else {
        panic!("expected literal");
    };
    assert_eq!(lit.token, "PI");
    assert_eq!(lit.as_f64(), Some(std::f64::consts::PI));
}

#[test]
fn range_exclusivity_is_independent() {
    for (text, lower, upper) in [
        ("x in [0, 10]", false, false),
        ("x in ![0, 10]", true, false),
        ("x in [0, 10]!", false, true),
        ("x in ![0, 10]!", true, true),
        ("x in ![0 to 10]!", true, true),
    ] {
        let Expr::BinaryOperator { op, right, .. } = predicate(text) else {
            panic!("expected `in`");
        };
        assert_eq!(op, BinaryOp::In);
        let Expr::Range {
            exclude_lower,
            exclude_upper,
            ..
        } = *right
        else {
            panic!("expected range in `{text}`");
        };
        assert_eq!((exclude_lower, exclude_upper), (lower, upper), "{text}");
    }
}

// -----------------------------------------------------------------------
// Folding
// -----------------------------------------------------------------------

#[test]
fn single_operand_folds_to_identity_at_every_level() {
    for rule in [
        Rule::Condition,
        Rule::Disjunction,
        Rule::Conjunction,
        Rule::AtomicCondition,
        Rule::Expr,
        Rule::Term,
        Rule::Factor,
    ] {
        let t = tree(rule, vec![number_tree("7").into()]);
        let reduced = reduce(t, Context::default())
            .and_then(|r| Ok(r.into_expr(rule)?))
            .unwrap();
        assert_eq!(reduced.expr, int(7), "{}", rule.name());
    }
}

#[test]
fn three_children_fold_to_binary_operator() {
    let t = tree(
        Rule::Expr,
        vec![
            number_tree("1").into(),
            token(TokenKind::Operator, "+"),
            number_tree("2").into(),
        ],
    );
    let reduced = reduce(t, Context::default())
        .and_then(|r| Ok(r.into_expr(Rule::Expr)?))
        .unwrap();
    assert_eq!(reduced.expr, Expr::binary(BinaryOp::Add, int(1), int(2)));
}

#[test]
fn wrong_arity_is_grammar_error() {
    let t = tree(
        Rule::Term,
        vec![number_tree("1").into(), number_tree("2").into()],
    );
    assert!(matches!(
        reduce(t, Context::default()),
        Err(ParseError::Grammar(_))
    ));

    let t = tree(Rule::GlobalScope, vec![number_tree("1").into()]);
    assert!(matches!(
        reduce(t, Context::default()),
        Err(ParseError::Grammar(_))
    ));
}

#[test]
fn wrong_token_is_grammar_error() {
    let t = tree(Rule::Boolean, vec![token(TokenKind::Boolean, "true")]);
    assert!(matches!(
        reduce(t, Context::default()),
        Err(ParseError::Grammar(_))
    ));
}

#[test]
fn arithmetic_is_left_associative() {
    let e = predicate("a - b - c = 0");
    let Expr::BinaryOperator { left, .. } = e else {
        panic!("expected comparison");
    };
    assert_eq!(
        *left,
        Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, own("a"), own("b")),
            own("c"),
        )
    );
}

#[test]
fn power_is_left_associative() {
    let e = predicate("a ** b ** c = 0");
    let Expr::BinaryOperator { left, .. } = e else {
        panic!("expected comparison");
    };
    assert_eq!(
        *left,
        Expr::binary(
            BinaryOp::Pow,
            Expr::binary(BinaryOp::Pow, own("a"), own("b")),
            own("c"),
        )
    );
}

#[test]
fn implication_chains_are_left_associative() {
    assert_eq!(
        predicate("a implies b implies c"),
        Expr::binary(
            BinaryOp::Implies,
            Expr::binary(BinaryOp::Implies, own("a"), own("b")),
            own("c"),
        )
    );
    assert_eq!(
        predicate("a iff b iff c"),
        Expr::binary(
            BinaryOp::Iff,
            Expr::binary(BinaryOp::Iff, own("a"), own("b")),
            own("c"),
        )
    );
    assert_eq!(
        predicate("a implies iff iff iff"),
        Expr::binary(
            BinaryOp::Iff,
            Expr::binary(BinaryOp::Implies, own("a"), own("iff")),
            own("iff"),
        )
    );
}

// -----------------------------------------------------------------------
// Expressions
// -----------------------------------------------------------------------

#[test]
fn negative_numbers_fold_into_literals() {
    let Expr::BinaryOperator { left, right, .. } = predicate("---42 = -42") else {
        panic!("expected comparison");
    };
    let Expr::Literal(l) = *left else {
        panic!("expected literal");
    };
    assert_eq!(l.value, LiteralValue::Int(-42));
    assert_eq!(l.token, "---42");
    assert_eq!(*right, Expr::Literal(Literal::new("-42", LiteralValue::Int(-42))));
}

#[test]
fn negated_expression_stays_an_operator() {
    let Expr::BinaryOperator { right, .. } = predicate("x = -(a - b)") else {
        panic!("expected comparison");
    };
    assert_eq!(
        *right,
        Expr::unary(UnaryOp::Neg, Expr::binary(BinaryOp::Sub, own("a"), own("b")))
    );
}

#[test]
fn field_and_array_access() {
    let Expr::BinaryOperator { left, .. } = predicate("a.b[0].c > 1") else {
        panic!("expected comparison");
    };
    let expected = Expr::field(
        Expr::ArrayAccess {
            base: Box::new(Expr::field(own("a"), "b")),
            index: Box::new(int(0)),
        },
        "c",
    );
    assert_eq!(*left, expected);
}

#[test]
fn variables_and_quantifiers() {
    let e = predicate("forall x in {1, 2}: @x > 0");
    let Expr::Quantifier {
        kind,
        variable,
        domain,
        body,
    } = e
    else {
        panic!("expected quantifier");
    };
    assert_eq!(kind, QuantifierKind::Forall);
    assert_eq!(variable, "x");
    assert_eq!(*domain, Expr::Set(vec![int(1), int(2)]));
    assert_eq!(
        *body,
        Expr::binary(BinaryOp::Gt, Expr::VarReference("x".into()), int(0))
    );
}

#[test]
fn function_call_has_one_argument() {
    let Expr::BinaryOperator { left, .. } = predicate("len(xs) > 0") else {
        panic!("expected comparison");
    };
    assert_eq!(
        *left,
        Expr::FunctionCall {
            function: "len".into(),
            argument: Box::new(own("xs")),
        }
    );
}

#[test]
fn top_level_predicate_is_a_bare_expression() {
    assert_eq!(predicate("a"), own("a"));
    assert_eq!(
        predicate("not a"),
        Expr::unary(UnaryOp::Not, own("a"))
    );
}

#[test]
fn good_predicates() {
    for text in [
        "@a < 3",
        "forall x in xs: @x",
        "---42 = -42",
        "a + b * c ** d = e ** -(f - g) / h",
        "(not ((a or b) implies c) and d)",
        "a[1] = a[@i + 1]",
        "exists s in {\"a\", \"b\"}: str(x) = @s",
        "abs(x) <= 1.5e3 iff flag",
        "forall i in [0 to len(xs)]!: xs[@i] > 0",
    ] {
        predicate(text);
    }
}

#[test]
fn bad_predicates() {
    for (text, kind) in [
        ("a + b + c", ErrorKind::Type),
        ("a < b < c", ErrorKind::Syntax),
        ("a[1][2]", ErrorKind::Syntax),
        ("a implies forall x in xs: b", ErrorKind::Syntax),
        ("not a + b", ErrorKind::Type),
        ("x = -{1, 2, 3}", ErrorKind::Type),
        ("forall x in 42: phi", ErrorKind::Type),
        ("(a < b) < c", ErrorKind::Type),
        ("\"a\" = 1", ErrorKind::Type),
        ("x in {1, 2} and x in 3", ErrorKind::Type),
        ("unknown(x)", ErrorKind::Type),
        ("forall x in {1, 2}: @x", ErrorKind::Type),
        ("forall x in xs: exists x in ys: @x", ErrorKind::Sanity),
    ] {
        match parse_predicate(text) {
            Ok(e) => panic!("`{text}` should fail, got {e}"),
            Err(e) => assert_eq!(e.kind(), kind, "`{text}`: {e}"),
        }
    }
}

// -----------------------------------------------------------------------
// Events, scopes and patterns
// -----------------------------------------------------------------------

#[test]
fn event_without_guard_is_vacuous() {
    let p = property("globally: some /topic");
    let b = p.pattern.behaviour();
    assert_eq!(b.topic, "/topic");
    assert_eq!(b.alias, None);
    assert!(b.predicate.is_vacuous());
}

#[test]
fn scopes() {
    assert_eq!(property("globally: some a").scope, Scope::Global);
    assert!(matches!(
        property("after x: some a").scope,
        Scope::After { .. }
    ));
    assert!(matches!(
        property("until y: some a").scope,
        Scope::Until { .. }
    ));
    let p = property("after x until y: some a");
    let Scope::AfterUntil {
        activator,
        terminator,
    } = p.scope
    else {
        panic!("expected after-until");
    };
    assert_eq!(activator.topic, "x");
    assert_eq!(terminator.topic, "y");
}

#[test]
fn patterns_keep_argument_order() {
    let p = property("globally: a causes b within 1 s");
    assert!(matches!(p.pattern, Pattern::Response { .. }));
    assert_eq!(p.pattern.trigger().map(|e| e.topic.as_str()), Some("a"));
    assert_eq!(p.pattern.behaviour().topic, "b");
    assert_eq!(p.pattern.max_time(), 1.0);

    let p = property("globally: a forbids b");
    assert!(matches!(p.pattern, Pattern::Prevention { .. }));
    assert_eq!(p.pattern.trigger().map(|e| e.topic.as_str()), Some("a"));
    assert_eq!(p.pattern.max_time(), f64::INFINITY);

    let p = property("globally: b requires a");
    assert!(matches!(p.pattern, Pattern::Requirement { .. }));
    assert_eq!(p.pattern.behaviour().topic, "b");
    assert_eq!(p.pattern.trigger().map(|e| e.topic.as_str()), Some("a"));

    let p = property("globally: no a");
    assert!(matches!(p.pattern, Pattern::Absence { .. }));
    assert!(p.is_safety());
}

#[test]
fn good_properties() {
    for text in [
        "globally: some topic",
        "after input as M: some output {x = @M.x}",
        "globally: output requires input within 100 ms",
        "globally: input as M causes output {x = @M.x} within 1 s",
        "globally: output {x = @M.x} requires input as M",
        "after a as A until b {y > @A.y}: no c {z = @A.z}",
        "globally: some topic {forall i in [0 to len(int_array)]!: int_array[@i] > 0}",
    ] {
        property(text);
    }
}

#[test]
fn bad_properties() {
    for (text, kind) in [
        ("globally: input as M causes output1 as M", ErrorKind::Sanity),
        ("globally: some topic {}", ErrorKind::Syntax),
        ("globally: some topic {a [1] = 2}", ErrorKind::Syntax),
        ("globally: some topic {int > \"42\"}", ErrorKind::Type),
        ("globally: some a {x = @B.x}", ErrorKind::Sanity),
        ("after a {x = @M.x}: some b as M", ErrorKind::Sanity),
        ("globally: some a as A {x = @A.x}", ErrorKind::Sanity),
        ("globally: some a {x + 1}", ErrorKind::Type),
    ] {
        match parse_property(text) {
            Ok(p) => panic!("`{text}` should fail, got {p}"),
            Err(e) => assert_eq!(e.kind(), kind, "`{text}`: {e}"),
        }
    }
}

#[test]
fn assumptions() {
    let a = parse_assumption("/cmd_vel { linear.x <= 1.0 }").unwrap();
    assert_eq!(a.topic, "/cmd_vel");
    assert!(!a.predicate.is_vacuous());

    let err = parse_assumption("/cmd_vel { x = @M.x }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Sanity);
}

#[test]
fn display_parses_back() {
    for text in [
        "after input as M until stop: some output {x = @M.x and not flag} within 100 ms",
        "globally: b requires a {forall i in ![0 to len(xs)]!: xs[@i] > -1.5}",
        "globally: a forbids b {s in {\"on\", \"off\"}} within 4 hz",
    ] {
        let p = property(text);
        let shown = p.to_string();
        assert_eq!(property(&shown), p, "{shown}");
    }
}
