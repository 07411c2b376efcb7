//! Rill front-end: source text in, positioned AST and diagnostics out.
//!
//! # Example
//!
//! ```
//! use rill_syntax::{Context, ParseOptions, parse};
//!
//! let result = parse(
//!     &Context::background(),
//!     "let greeting = `hello ${name}`",
//!     ParseOptions::with_filename("main.rl"),
//! );
//!
//! if !result.is_valid() {
//!     eprintln!("{}", result.render_errors());
//! }
//! for stmt in &result.program.statements {
//!     println!("{stmt}");
//! }
//! ```
//!
//! The crate covers the pipeline up to (and including) the AST: lexer,
//! Pratt parser with error recovery and resource bounds, structured
//! diagnostics with a terminal renderer and suggestion engine, and a
//! syntax-policy validator. Compilation and evaluation live downstream.

pub mod ast;
#[cfg(test)]
mod ast_tests;
pub mod context;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token;
pub mod validate;

pub use ast::{Expr, Program, Stmt};
pub use context::{CancelHandle, Context, ContextError};
pub use diagnostics::{
    ErrorCode, ErrorKind, ErrorList, FormattedError, Formatter, ParseError, format_suggestions,
    suggest_similar,
};
pub use parser::{DEFAULT_MAX_DEPTH, MAX_ERRORS, ParseOptions, ParseResult, parse};
pub use position::{Position, Span};
pub use validate::{SyntaxConfig, SyntaxFeature, ValidationError, validate};
