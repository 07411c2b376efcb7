//! Parser state machine and low-level operations.
//!
//! Grammar productions live in the sibling modules as further `impl
//! Parser` blocks; this file owns the token window, error recording, the
//! depth and error bounds, cancellation checks, and synchronization.
//!
//! Conventions shared by every production:
//!
//! - a `parse_*` method is entered with `cur` on its first token and
//!   returns with `cur` on its last token; the caller advances past it
//! - `None` means a diagnostic was recorded (or a fatal condition hit);
//!   control unwinds to the statement driver, which synchronizes
//! - while `group_depth > 0` the Pratt loop treats newlines as
//!   transparent, so on return from a sub-expression inside `( ) [ ]` or
//!   a map literal, `peek` is never a newline

use crate::ast::Program;
use crate::context::Context;
use crate::diagnostics::{ErrorCode, ErrorKind, ErrorList, ParseError};
use crate::lexer::{LexError, Lexer, LexerState};
use crate::position::{Position, Span};
use crate::token::{Token, TokenKind};

use super::{MAX_ERRORS, ParseOptions, ParseResult};

pub(super) struct Parser<'src> {
    pub(super) lexer: Lexer<'src>,
    pub(super) ctx: Context,
    pub(super) cur: Token,
    pub(super) peek: Token,
    pub(super) errors: ErrorList,
    pub(super) depth: u32,
    pub(super) max_depth: u32,
    pub(super) group_depth: u32,
    pub(super) in_ternary: bool,
    pub(super) fatal: bool,
    last_error_pos: Option<Position>,
}

/// Checkpoint for [`Parser::skip_newlines_and_peek`], the parser's only
/// rollback point.
struct SavedState {
    lexer: LexerState,
    cur: Token,
    peek: Token,
}

impl<'src> Parser<'src> {
    pub(super) fn new(ctx: Context, source: &'src str, options: &ParseOptions) -> Self {
        let filename = options.filename.clone().unwrap_or_default();
        Self::with_depth(ctx, source, filename, 0, options.max_depth)
    }

    /// Nested parser for template fragments: shares the context and
    /// continues from the outer depth so the resource guarantees hold
    /// across the recursion.
    pub(super) fn with_depth(
        ctx: Context,
        source: &'src str,
        filename: String,
        depth: u32,
        max_depth: u32,
    ) -> Self {
        let lexer = Lexer::with_filename(source, filename);
        let placeholder = Token::synthetic(TokenKind::Eof, Span::ZERO);
        let mut parser = Self {
            lexer,
            ctx,
            cur: placeholder.clone(),
            peek: placeholder,
            errors: ErrorList::new(),
            depth,
            max_depth,
            group_depth: 0,
            in_ternary: false,
            fatal: false,
            last_error_pos: None,
        };
        parser.advance();
        parser.advance();
        parser
    }

    pub(super) fn parse(mut self) -> ParseResult {
        if let Some(err) = self.ctx.err() {
            self.fail(ErrorKind::ContextError, None, Span::ZERO, err.to_string());
            let program = Program {
                statements: Vec::new(),
                filename: self.lexer.filename().to_string(),
            };
            return ParseResult {
                program,
                errors: self.errors,
            };
        }
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    // -- token window -------------------------------------------------------

    pub(super) fn advance(&mut self) {
        let next = self.next_lexer_token();
        self.cur = std::mem::replace(&mut self.peek, next);
    }

    fn next_lexer_token(&mut self) -> Token {
        match self.lexer.next_token() {
            Ok(token) => token,
            Err(err) => {
                let span = err.span;
                self.lex_error(err);
                Token::synthetic(TokenKind::Illegal, span)
            }
        }
    }

    pub(super) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    pub(super) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    pub(super) fn skip_newlines(&mut self) {
        while self.cur_is(TokenKind::Newline) {
            self.advance();
        }
    }

    /// True when, after skipping any newlines, the next token is `kind` —
    /// in which case the newlines stay consumed and `peek` is that token.
    /// Otherwise the window is rolled back untouched.
    pub(super) fn skip_newlines_and_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            return true;
        }
        if !self.peek_is(TokenKind::Newline) {
            return false;
        }
        let saved = SavedState {
            lexer: self.lexer.save_state(),
            cur: self.cur.clone(),
            peek: self.peek.clone(),
        };
        while self.peek_is(TokenKind::Newline) {
            self.advance();
        }
        if self.peek_is(kind) {
            true
        } else {
            self.lexer.restore_state(saved.lexer);
            self.cur = saved.cur;
            self.peek = saved.peek;
            false
        }
    }

    /// Consume `peek` when it matches; otherwise record `expected {what}`.
    pub(super) fn expect_peek(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.peek_is(kind) {
            self.advance();
            return true;
        }
        let span = self.peek.span;
        let found = describe(&self.peek);
        self.parse_error(
            ErrorCode::UnexpectedToken,
            span,
            format!("expected {what} but found {found}"),
        );
        false
    }

    // -- diagnostics --------------------------------------------------------

    pub(super) fn parse_error(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.record(ErrorKind::ParseError, Some(code), span, message);
    }

    pub(super) fn error_cur(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.cur.span;
        self.parse_error(code, span, message);
    }

    fn lex_error(&mut self, err: LexError) {
        let code = if err.message.starts_with("unterminated") {
            ErrorCode::UnterminatedString
        } else {
            ErrorCode::IllegalCharacter
        };
        self.record(ErrorKind::SyntaxError, Some(code), err.span, err.message);
    }

    fn record(
        &mut self,
        kind: ErrorKind,
        code: Option<ErrorCode>,
        span: Span,
        message: impl Into<String>,
    ) {
        if self.fatal {
            return;
        }
        if self.errors.count() >= MAX_ERRORS {
            self.fatal = true;
            return;
        }
        // one diagnostic per position, so a bad token doesn't cascade
        if self.last_error_pos == Some(span.start) {
            return;
        }
        self.last_error_pos = Some(span.start);
        let line_text = self.lexer.line_text_at(span.start.line).to_string();
        self.errors.push(ParseError {
            kind,
            code,
            message: message.into(),
            filename: self.lexer.filename().to_string(),
            span,
            line_text,
            hint: None,
        });
        if self.errors.count() >= MAX_ERRORS {
            self.fatal = true;
        }
    }

    /// Record a parse-ending condition (depth, cancellation) and stop.
    /// Unlike [`record`](Self::record), this may exceed the error bound by
    /// the one entry the contract allows.
    pub(super) fn fail(
        &mut self,
        kind: ErrorKind,
        code: Option<ErrorCode>,
        span: Span,
        message: impl Into<String>,
    ) {
        if !self.fatal {
            let line_text = self.lexer.line_text_at(span.start.line).to_string();
            self.errors.push(ParseError {
                kind,
                code,
                message: message.into(),
                filename: self.lexer.filename().to_string(),
                span,
                line_text,
                hint: None,
            });
        }
        self.fatal = true;
    }

    /// Adopt a diagnostic produced by a nested template parse. The span is
    /// already re-based by the caller; only the bound applies here.
    pub(super) fn merge_error(&mut self, err: ParseError) {
        if self.fatal {
            return;
        }
        if self.errors.count() >= MAX_ERRORS {
            self.fatal = true;
            return;
        }
        self.errors.push(err);
        if self.errors.count() >= MAX_ERRORS {
            self.fatal = true;
        }
    }

    pub(super) fn error_count(&self) -> usize {
        self.errors.count()
    }

    /// Short-circuit helper for inner productions: true when errors were
    /// recorded since the caller took its watermark.
    pub(super) fn had_new_error(&self, watermark: usize) -> bool {
        self.fatal || self.errors.count() > watermark
    }

    // -- bounds -------------------------------------------------------------

    /// Depth guard for the generic expression/statement entries. A `false`
    /// return means the limit diagnostic is recorded and parsing is over.
    pub(super) fn enter_depth(&mut self) -> bool {
        if self.fatal {
            return false;
        }
        if self.depth >= self.max_depth {
            let span = self.cur.span;
            self.fail(
                ErrorKind::ParseError,
                Some(ErrorCode::MaxDepthExceeded),
                span,
                "maximum nesting depth exceeded",
            );
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Cancellation check for statement boundaries and bounded loops.
    pub(super) fn check_context(&mut self) -> bool {
        if self.fatal {
            return false;
        }
        match self.ctx.err() {
            Some(err) => {
                let span = self.cur.span;
                self.fail(ErrorKind::ContextError, None, span, err.to_string());
                false
            }
            None => true,
        }
    }

    // -- recovery -----------------------------------------------------------

    pub(super) fn is_terminator(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Semicolon | TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        )
    }

    pub(super) fn starts_statement(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Let
                | TokenKind::Const
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::Function
                | TokenKind::Switch
                | TokenKind::Try
                | TokenKind::Throw
        )
    }

    /// Advance to the next plausible statement boundary. Returns
    /// immediately when already at one, leaving progress to the driver.
    pub(super) fn synchronize(&mut self) {
        while !self.fatal {
            let kind = self.cur.kind;
            if Self::is_terminator(kind) || Self::starts_statement(kind) {
                return;
            }
            self.advance();
        }
    }
}

/// Human description of a token for error messages.
pub(super) fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Illegal => "illegal character".to_string(),
        _ if !token.literal.is_empty() => format!("'{}'", token.literal),
        kind => kind.token_type().to_string(),
    }
}
