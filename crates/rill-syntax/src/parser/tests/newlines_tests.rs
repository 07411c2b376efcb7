//! The newline policy: terminators at top level, continuation after a
//! trailing operator, transparency inside delimiters.

use indoc::indoc;

use super::{dump, must_parse, parse_source};

#[test]
fn trailing_binary_operator_continues_the_expression() {
    assert_eq!(dump("x +\ny"), "(x + y)");
    assert_eq!(dump("a &&\nb &&\nc"), "((a && b) && c)");
    assert_eq!(must_parse("x +\ny").len(), 1);
}

#[test]
fn leading_operator_starts_a_broken_statement() {
    let result = parse_source("x\n+ y");
    assert_eq!(result.program.len(), 1);
    assert_eq!(result.errors.count(), 1);
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("unexpected token '+'")
    );
}

#[test]
fn newlines_are_free_inside_delimiters() {
    assert_eq!(dump("[\n1,\n2,\n]"), "[1, 2]");
    assert_eq!(dump("f(\n1,\n2\n)"), "f(1, 2)");
    assert_eq!(dump("{\na: 1,\nb: 2\n}"), "{\"a\": 1, \"b\": 2}");
    // even before an operator, inside parentheses
    assert_eq!(dump("(1\n+ 2)"), "(1 + 2)");
    assert_eq!(dump("(1 +\n2)"), "(1 + 2)");
}

#[test]
fn ternary_allows_newlines_after_its_markers() {
    assert_eq!(dump("c ?\n1 :\n2"), "(c ? 1 : 2)");
}

#[test]
fn postfix_must_be_glued_to_its_operand() {
    assert_eq!(dump("i++"), "(i++)");

    let result = parse_source("i\n++");
    assert_eq!(result.program.len(), 1); // `i` parses alone
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("unexpected token '++'")
    );

    // whitespace splits the statement from a stray operator
    let result = parse_source("i ++");
    assert_eq!(result.program.len(), 1);
    assert!(!result.is_valid());
}

#[test]
fn catch_and_finally_may_follow_after_newlines() {
    let source = indoc! {"
        try {
            risky()
        }

        catch err {
            recover()
        }

        finally {
            cleanup()
        }
    "};
    let program = must_parse(source);
    assert_eq!(program.len(), 1);
}

#[test]
fn lookahead_restores_when_no_catch_follows() {
    let source = indoc! {"
        try {
            a()
        } finally {
            b()
        }

        next()
    "};
    let program = must_parse(source);
    assert_eq!(program.len(), 2);
}

#[test]
fn pipe_newlines_only_after_the_operator() {
    assert_eq!(dump("xs |\nsum"), "(xs | sum)");

    let result = parse_source("xs\n| sum");
    assert_eq!(result.program.len(), 1);
    assert!(!result.is_valid());
}

#[test]
fn else_may_start_a_new_line() {
    let source = indoc! {"
        if ok {
            a()
        }
        else {
            b()
        }
    "};
    assert_eq!(must_parse(source).len(), 1);
}
