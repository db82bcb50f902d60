use super::*;

fn parse_ok(input: &str, start: StartRule) -> ParseTree {
    match parse_tree(input, start) {
        Ok(tree) => tree,
        Err(e) => panic!("expected `{input}` to parse, got {e}"),
    }
}

fn child_rules(tree: &ParseTree) -> Vec<Rule> {
    tree.children
        .iter()
        .filter_map(|c| match c {
            Node::Tree(t) => Some(t.rule),
            Node::Token(_) => None,
        })
        .collect()
}

fn subtree(tree: &ParseTree, i: usize) -> &ParseTree {
    match &tree.children[i] {
        Node::Tree(t) => t,
        Node::Token(t) => panic!("child {i} is token {:?}", t.text),
    }
}

fn tok(tree: &ParseTree, i: usize) -> &Token {
    match &tree.children[i] {
        Node::Token(t) => t,
        Node::Tree(t) => panic!("child {i} is tree {:?}", t.rule),
    }
}

// -----------------------------------------------------------------------
// Properties
// -----------------------------------------------------------------------

#[test]
fn global_existence() {
    let t = parse_ok("globally: some topic", StartRule::Property);
    assert_eq!(t.rule, Rule::HplProperty);
    assert_eq!(child_rules(&t), vec![Rule::GlobalScope, Rule::Existence]);
    let pattern = subtree(&t, 1);
    assert_eq!(child_rules(pattern), vec![Rule::Event]);
}

#[test]
fn after_scope_with_alias() {
    let t = parse_ok(
        "after input as M: some output {x = @M.x}",
        StartRule::Property,
    );
    let scope = subtree(&t, 0);
    assert_eq!(scope.rule, Rule::AfterUntil);
    assert_eq!(child_rules(scope), vec![Rule::Activator]);
    let event = subtree(subtree(scope, 0), 0);
    let message = subtree(event, 0);
    assert_eq!(message.rule, Rule::Message);
    assert_eq!(tok(message, 1).text, "M");
    assert_eq!(tok(subtree(message, 0), 0).text, "input");
}

#[test]
fn after_until_scope() {
    let t = parse_ok(
        "after /a until ~events/b: no c within 1 s",
        StartRule::Property,
    );
    let scope = subtree(&t, 0);
    assert_eq!(child_rules(scope), vec![Rule::Activator, Rule::Terminator]);
    let pattern = subtree(&t, 1);
    assert_eq!(pattern.rule, Rule::Absence);
    assert_eq!(child_rules(pattern), vec![Rule::Event, Rule::TimeAmount]);
}

#[test]
fn until_scope() {
    let t = parse_ok("until stop: some go", StartRule::Property);
    assert_eq!(subtree(&t, 0).rule, Rule::Until);
}

#[test]
fn binary_patterns_keep_source_order() {
    for (text, rule) in [
        ("globally: a causes b", Rule::Response),
        ("globally: a forbids b", Rule::Prevention),
        ("globally: a requires b", Rule::Requirement),
    ] {
        let t = parse_ok(text, StartRule::Property);
        let pattern = subtree(&t, 1);
        assert_eq!(pattern.rule, rule);
        let first = subtree(subtree(pattern, 0), 0);
        assert_eq!(tok(subtree(first, 0), 0).text, "a");
    }
}

#[test]
fn time_bounds() {
    let t = parse_ok(
        "globally: output requires input within 100 ms",
        StartRule::Property,
    );
    let bound = subtree(subtree(&t, 1), 2);
    assert_eq!(bound.rule, Rule::TimeAmount);
    assert_eq!(tok(bound, 0).text, "100");
    assert_eq!(tok(bound, 1).text, "ms");

    let t = parse_ok("globally: some a within 10 hz", StartRule::Property);
    let bound = subtree(subtree(&t, 1), 1);
    assert_eq!(bound.rule, Rule::Frequency);
}

#[test]
fn quantified_range_predicate() {
    parse_ok(
        "globally: some topic {forall i in [0 to len(int_array)]!: int_array[@i] > 0}",
        StartRule::Property,
    );
}

#[test]
fn assumption() {
    let t = parse_ok("/cmd_vel { linear.x < 1.0 }", StartRule::Assumption);
    assert_eq!(t.rule, Rule::HplAssumption);
    assert_eq!(child_rules(&t), vec![Rule::RosName, Rule::Predicate]);
}

#[test]
fn rejects_malformed_properties() {
    for text in [
        "",
        "globally some a",
        "globally: a",
        "globally: some a {}",
        "globally: some a {x}}",
        "globally: some a {b [1] = 2}",
        "globally: some a within 1 min",
        "sometimes: some a",
        "after a until: some b",
    ] {
        assert!(
            parse_tree(text, StartRule::Property).is_err(),
            "`{text}` should not parse"
        );
    }
}

#[test]
fn assumption_needs_predicate() {
    assert!(parse_tree("/cmd_vel", StartRule::Assumption).is_err());
}

// -----------------------------------------------------------------------
// Predicates
// -----------------------------------------------------------------------

#[test]
fn good_predicates() {
    for text in [
        "a",
        "@a < 3",
        "forall x in xs: @x",
        "exists x in {1, 2, 3}: @x = a",
        "---42 = -42",
        "a + b * c ** d = e ** -(f - g) / h",
        "(not ((a or b) implies c) and d)",
        "a[1] = a[@i + 1]",
        "a.b.c[0].d in ![0 to 10]",
        "x in [1, 2]! ",
        "s = \"text\" and t != \"more\"",
        "PI > 3 iff True",
        "a implies b implies c",
        "a implies iff iff iff",
        "a ** b ** c > 0",
        "len(xs) > 0 # trailing comment",
    ] {
        parse_ok(text, StartRule::Predicate);
    }
}

#[test]
fn bad_predicate_syntax() {
    for text in [
        "a < b < c",
        "a[1][2]",
        "a implies forall x in xs: b",
        "f(a, b)",
        "{}",
        "a and",
        "forall and in xs: True",
        "\"unterminated",
    ] {
        assert!(
            parse_tree(text, StartRule::Predicate).is_err(),
            "`{text}` should not parse"
        );
    }
}

#[test]
fn left_associative_sum() {
    let t = parse_ok("a + b - c", StartRule::Predicate);
    let cond = subtree(&t, 0);
    let disj = subtree(cond, 0);
    let conj = subtree(disj, 0);
    let atomic = subtree(conj, 0);
    let sum = subtree(atomic, 0);
    assert_eq!(sum.rule, Rule::Expr);
    assert_eq!(tok(sum, 1).text, "-");
    let left = subtree(sum, 0);
    assert_eq!(left.rule, Rule::Expr);
    assert_eq!(tok(left, 1).text, "+");
}

#[test]
fn left_associative_implication() {
    let t = parse_ok("a implies b iff c", StartRule::Predicate);
    let cond = subtree(&t, 0);
    assert_eq!(cond.rule, Rule::Condition);
    assert_eq!(tok(cond, 1).text, "iff");
    let left = subtree(cond, 0);
    assert_eq!(left.rule, Rule::Condition);
    assert_eq!(tok(left, 1).text, "implies");
    assert_eq!(subtree(cond, 2).rule, Rule::Disjunction);
}

#[test]
fn left_associative_power() {
    let t = parse_ok("a ** b ** c", StartRule::Predicate);
    let atomic = subtree(subtree(subtree(subtree(&t, 0), 0), 0), 0);
    let term = subtree(subtree(atomic, 0), 0);
    let power = subtree(term, 0);
    assert_eq!(power.rule, Rule::Factor);
    assert_eq!(tok(power, 1).text, "**");
    let left = subtree(power, 0);
    assert_eq!(left.rule, Rule::Factor);
    assert_eq!(tok(left, 1).text, "**");
}

#[test]
fn range_closing_bracket_before_inequality() {
    let t = parse_ok("[0 to 1] != x", StartRule::Predicate);
    let atomic = subtree(subtree(subtree(subtree(&t, 0), 0), 0), 0);
    assert_eq!(atomic.rule, Rule::AtomicCondition);
    assert_eq!(tok(atomic, 1).text, "!=");
}

#[test]
fn syntax_error_reports_offset() {
    let err = parse_tree("a < b < c", StartRule::Predicate).unwrap_err();
    assert_eq!(err.offset, 6);
}
