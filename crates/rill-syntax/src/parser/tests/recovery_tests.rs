//! Error recovery: synchronization, the error bound, lexer promotion,
//! and rendered diagnostics.

use indoc::indoc;

use crate::ast::Stmt;
use crate::context::Context;
use crate::diagnostics::ErrorKind;
use crate::parser::{MAX_ERRORS, ParseOptions, parse};

use super::parse_source;

#[test]
fn missing_values_recover_per_statement() {
    let result = parse_source("let x =\nlet y =\nlet z =");
    assert_eq!(result.errors.count(), 3);
    for err in &result.errors {
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert_eq!(err.message, "assignment is missing a value");
    }
    assert!(result.program.is_empty());
}

#[test]
fn statements_after_an_error_still_parse() {
    let result = parse_source("let x = @\nlet y = 5");
    assert_eq!(result.errors.count(), 1);
    assert_eq!(result.program.len(), 1);
    assert!(matches!(
        result.program.statements[0],
        Stmt::Var { ref name, .. } if name == "y"
    ));
}

#[test]
fn lexer_errors_become_syntax_errors() {
    let result = parse_source("let s = \"abc");
    assert!(!result.is_valid());
    let err = result.errors.first().unwrap();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert_eq!(err.message, "unterminated string literal");

    let result = parse_source("let t = `abc");
    assert_eq!(
        result.errors.first().unwrap().message,
        "unterminated template literal"
    );
}

#[test]
fn trailing_tokens_after_a_statement_are_reported() {
    let result = parse_source("let x = 5 let y = 6");
    assert_eq!(result.errors.count(), 1);
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("unexpected token 'let' following statement")
    );
    // both statements survive recovery
    assert_eq!(result.program.len(), 2);
}

#[test]
fn error_collection_is_bounded() {
    let source = "let x =\n".repeat(25);
    let result = parse_source(&source);
    assert_eq!(result.errors.count(), MAX_ERRORS);
}

#[test]
fn diagnostics_arrive_in_source_order() {
    let result = parse_source("let a =\n@\nlet b =");
    assert!(result.errors.count() >= 2);
    let mut last = crate::position::Position::ZERO;
    for err in &result.errors {
        assert!(err.span.start >= last);
        last = err.span.start;
    }
}

#[test]
fn aggregate_display_summarizes() {
    let result = parse_source("let x =\nlet y =");
    assert_eq!(
        result.errors.to_string(),
        "parse error: assignment is missing a value at 1:7 (and 1 more errors)"
    );
}

#[test]
fn rendered_diagnostics_show_snippets_and_carets() {
    let result = parse(
        &Context::background(),
        "let x =\nlet y =",
        ParseOptions::with_filename("bad.rl"),
    );
    insta::assert_snapshot!(result.render_errors(), @r"
    [1/2] parse error[E1008]: assignment is missing a value
     --> bad.rl:1:7
      |
    1 | let x =
      |       ^

    [2/2] parse error[E1008]: assignment is missing a value
     --> bad.rl:2:7
      |
    2 | let y =
      |       ^

    found 2 errors
    ");
}

#[test]
fn rendered_single_error_without_filename() {
    let result = parse_source("let x = @");
    insta::assert_snapshot!(result.render_errors(), @r"
    syntax error[E1012]: unexpected character '@'
     --> 1:9
      |
    1 | let x = @
      |         ^
    ");
}

#[test]
fn unclosed_delimiters_point_at_the_opener() {
    let result = parse_source("let xs = [1, 2");
    assert!(!result.is_valid());
    let err = result.errors.first().unwrap();
    assert!(err.message.contains("missing closing ']'"));
    assert_eq!(err.span.start.column, 10);
}

#[test]
fn unclosed_block_is_reported() {
    let result = parse_source(indoc! {"
        function f() {
            g()
    "});
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("missing closing '}'")
    );
}

#[test]
fn bad_tokens_do_not_cascade() {
    // one bad character produces one diagnostic, not a trail of them
    let result = parse_source("let x = @");
    assert_eq!(result.errors.count(), 1);
}

#[test]
fn partial_program_is_returned_alongside_errors() {
    let result = parse_source("let a = 1\nlet broken =\nlet b = 2");
    assert_eq!(result.errors.count(), 1);
    assert_eq!(result.program.len(), 2);
    let names: Vec<_> = result
        .program
        .statements
        .iter()
        .map(|s| match s {
            Stmt::Var { name, .. } => name.as_str(),
            other => panic!("expected Var, got {other:?}"),
        })
        .collect();
    assert_eq!(names, ["a", "b"]);
}
