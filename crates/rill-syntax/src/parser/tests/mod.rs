mod expressions_tests;
mod newlines_tests;
mod recovery_tests;
mod statements_tests;

use crate::ast::Program;
use crate::context::Context;
use crate::parser::{ParseOptions, ParseResult, parse};

pub(crate) fn parse_source(source: &str) -> ParseResult {
    parse(&Context::background(), source, ParseOptions::default())
}

pub(crate) fn must_parse(source: &str) -> Program {
    let result = parse_source(source);
    assert!(
        result.is_valid(),
        "unexpected errors for {source:?}:\n{}",
        result.render_errors()
    );
    result.program
}

/// The debug form of a program that must parse cleanly.
pub(crate) fn dump(source: &str) -> String {
    must_parse(source).to_string()
}
