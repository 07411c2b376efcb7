//! Statement grammar: declarations, destructuring, return/throw/try,
//! assignment promotion, terminators.

use indoc::indoc;

use crate::ast::{Expr, Stmt};
use crate::position::Position;
use crate::token::TokenKind;

use super::{dump, must_parse, parse_source};

#[test]
fn bare_let_binds_one_name() {
    let program = must_parse("let x = 5");
    assert_eq!(program.len(), 1);
    match &program.statements[0] {
        Stmt::Var { name, value, .. } => {
            assert_eq!(name, "x");
            assert!(matches!(value, Expr::Int { value: 5, .. }));
        }
        other => panic!("expected Var, got {other:?}"),
    }
}

#[test]
fn let_spans_cover_the_whole_declaration() {
    let program = must_parse("let x = 5");
    let span = program.statements[0].span();
    assert_eq!(span.start, Position::new(1, 1, 0));
    assert_eq!(span.end, Position::new(1, 9, 8));
}

#[test]
fn multi_var_declares_several_names() {
    let program = must_parse("let a, b = vals");
    match &program.statements[0] {
        Stmt::MultiVar { names, .. } => assert_eq!(names, &["a", "b"]),
        other => panic!("expected MultiVar, got {other:?}"),
    }
    assert_eq!(dump("let a, b = vals"), "let a, b = vals");
}

#[test]
fn const_requires_single_name_and_value() {
    assert_eq!(dump("const pi = 3.14"), "const pi = 3.14");

    let multi = parse_source("const a, b = 1");
    assert!(!multi.is_valid());
    assert!(
        multi
            .errors
            .first()
            .unwrap()
            .message
            .contains("single declaration")
    );

    let missing = parse_source("const a =");
    assert!(!missing.is_valid());
    assert_eq!(
        missing.errors.first().unwrap().message,
        "assignment is missing a value"
    );
}

#[test]
fn object_destructure_declaration() {
    let program = must_parse("let {a, b: c = 1} = obj");
    match &program.statements[0] {
        Stmt::ObjectDestructure { bindings, .. } => {
            assert_eq!(bindings.len(), 2);
            assert_eq!(bindings[0].key, "a");
            assert!(bindings[0].alias.is_none());
            assert_eq!(bindings[1].key, "b");
            assert_eq!(bindings[1].alias.as_deref(), Some("c"));
            assert!(bindings[1].default.is_some());
        }
        other => panic!("expected ObjectDestructure, got {other:?}"),
    }
    assert_eq!(dump("let {a, b: c = 1} = obj"), "let {a, b: c = 1} = obj");
}

#[test]
fn array_destructure_declaration() {
    let program = must_parse("let [x, y = 2] = arr");
    match &program.statements[0] {
        Stmt::ArrayDestructure { elements, .. } => {
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[0].name, "x");
            assert!(elements[0].default.is_none());
            assert!(elements[1].default.is_some());
        }
        other => panic!("expected ArrayDestructure, got {other:?}"),
    }
    assert_eq!(dump("let [x, y = 2] = arr"), "let [x, y = 2] = arr");
}

#[test]
fn top_level_assignment_becomes_a_statement() {
    let program = must_parse("x = 1\nx += 2\nitems[0] = 3");
    for stmt in &program.statements {
        assert!(matches!(stmt, Stmt::Assign { .. }), "got {stmt:?}");
    }
    match &program.statements[1] {
        Stmt::Assign { op, .. } => assert_eq!(*op, TokenKind::PlusAssign),
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn return_value_is_optional() {
    let program = must_parse("function f() { return }");
    let Stmt::Expr(Expr::Func(func)) = &program.statements[0] else {
        panic!("expected function");
    };
    assert!(matches!(
        func.body.statements[0],
        Stmt::Return { value: None, .. }
    ));

    let program = must_parse("function f() { return 1 + 2 }");
    let Stmt::Expr(Expr::Func(func)) = &program.statements[0] else {
        panic!("expected function");
    };
    assert!(matches!(
        func.body.statements[0],
        Stmt::Return { value: Some(_), .. }
    ));
}

#[test]
fn throw_requires_a_value() {
    assert_eq!(dump("throw err"), "throw err");

    let result = parse_source("throw");
    assert!(!result.is_valid());
    assert_eq!(
        result.errors.first().unwrap().message,
        "throw requires a value"
    );
}

#[test]
fn try_needs_catch_or_finally() {
    assert_eq!(
        dump("try { f() } catch err { g() } finally { h() }"),
        "try { f() } catch err { g() } finally { h() }"
    );
    assert_eq!(dump("try { f() } catch { g() }"), "try { f() } catch { g() }");
    assert_eq!(dump("try { f() } finally { h() }"), "try { f() } finally { h() }");

    let bare = parse_source("try { f() }");
    assert!(!bare.is_valid());
    assert!(
        bare.errors
            .first()
            .unwrap()
            .message
            .contains("catch or finally")
    );
}

#[test]
fn try_captures_the_error_name() {
    let program = must_parse("try { f() } catch problem { g() }");
    match &program.statements[0] {
        Stmt::Try {
            catch_name, catch, ..
        } => {
            assert_eq!(catch_name.as_deref(), Some("problem"));
            assert!(catch.is_some());
        }
        other => panic!("expected Try, got {other:?}"),
    }
}

#[test]
fn semicolons_and_newlines_both_terminate() {
    let program = must_parse("a; b; c");
    assert_eq!(program.len(), 3);
    let program = must_parse("a\nb\nc");
    assert_eq!(program.len(), 3);
    let program = must_parse("a;;\n\n;b");
    assert_eq!(program.len(), 2);
}

#[test]
fn blocks_nest_statements() {
    let source = indoc! {"
        try {
            let x = 1
            x = x + 1
        } finally {
            cleanup()
        }
    "};
    let program = must_parse(source);
    match &program.statements[0] {
        Stmt::Try { body, finally, .. } => {
            assert_eq!(body.statements.len(), 2);
            assert_eq!(finally.as_ref().unwrap().statements.len(), 1);
        }
        other => panic!("expected Try, got {other:?}"),
    }
}

#[test]
fn program_display_joins_statements() {
    let program = must_parse("let x = 1\nx = x + 1");
    assert_eq!(program.to_string(), "let x = 1\nx = (x + 1)");
}

#[test]
fn empty_and_blank_sources_parse_to_empty_programs() {
    assert!(must_parse("").is_empty());
    assert!(must_parse("\n\n\n").is_empty());
    assert!(must_parse("// just a comment\n# and another").is_empty());
}

#[test]
fn filename_is_carried_onto_the_program() {
    let result = crate::parser::parse(
        &crate::context::Context::background(),
        "let x = 1",
        crate::parser::ParseOptions::with_filename("main.rl"),
    );
    assert_eq!(result.program.filename, "main.rl");
}
