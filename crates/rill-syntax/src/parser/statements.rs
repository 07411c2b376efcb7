//! Statement grammar and the error-recovery driver.
//!
//! Every statement parses inside a recovery scope: on failure the driver
//! records the diagnostic, synchronizes to the next statement boundary,
//! and keeps going until EOF, the error bound, or a fatal condition.

use crate::ast::{Block, Program, Stmt};
use crate::diagnostics::ErrorCode;
use crate::token::TokenKind;

use super::core::{Parser, describe};
use super::precedence::Precedence;

impl Parser<'_> {
    pub(super) fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        loop {
            self.skip_statement_separators();
            if self.fatal || self.cur_is(TokenKind::Eof) {
                break;
            }
            if !self.check_context() {
                break;
            }

            let before = (self.cur.span.start.offset, self.cur.kind);
            let watermark = self.error_count();
            match self.parse_statement() {
                Some(stmt) => {
                    statements.push(stmt);
                    self.finish_statement(watermark);
                }
                None => {
                    if self.fatal {
                        break;
                    }
                    self.synchronize();
                }
            }
            self.force_progress(before);
        }

        Program {
            statements,
            filename: self.lexer.filename().to_string(),
        }
    }

    fn skip_statement_separators(&mut self) {
        while self.cur_is(TokenKind::Newline) || self.cur_is(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Step past a finished statement and insist on a terminator. When the
    /// statement already produced errors, synchronize quietly instead of
    /// piling a cascading "unexpected token" on top.
    fn finish_statement(&mut self, watermark: usize) {
        self.advance();
        if Self::is_terminator(self.cur.kind) {
            return;
        }
        if !self.had_new_error(watermark) {
            let msg = format!(
                "unexpected token {} following statement",
                describe(&self.cur)
            );
            self.error_cur(ErrorCode::UnexpectedToken, msg);
        }
        self.synchronize();
    }

    /// The synchronizer may legitimately stop without consuming anything
    /// (it is already at a boundary); the driver then guarantees progress.
    fn force_progress(&mut self, before: (u32, TokenKind)) {
        if !self.fatal
            && !self.cur_is(TokenKind::Eof)
            && self.cur.span.start.offset == before.0
            && self.cur.kind == before.1
        {
            self.advance();
        }
    }

    pub(super) fn parse_statement(&mut self) -> Option<Stmt> {
        if !self.enter_depth() {
            return None;
        }
        let result = self.parse_statement_inner();
        self.exit_depth();
        result
    }

    fn parse_statement_inner(&mut self) -> Option<Stmt> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Const => self.parse_const(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            _ => {
                let expr = self.parse_expression(Precedence::Lowest)?;
                // assignment is an infix production; surface it as the
                // statement it is when it stands alone
                Some(match expr {
                    crate::ast::Expr::Assign {
                        span,
                        target,
                        op,
                        value,
                    } => Stmt::Assign {
                        span,
                        target: *target,
                        op,
                        value: *value,
                    },
                    other => Stmt::Expr(other),
                })
            }
        }
    }

    fn parse_let(&mut self) -> Option<Stmt> {
        let start = self.cur.span;
        match self.peek.kind {
            TokenKind::LBrace => {
                self.advance();
                let bindings = self.parse_object_pattern()?;
                if !self.expect_peek(TokenKind::Assign, "'=' after destructuring pattern") {
                    return None;
                }
                let value = self.parse_decl_value()?;
                Some(Stmt::ObjectDestructure {
                    span: start.to(value.span()),
                    bindings,
                    value,
                })
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_array_pattern()?;
                if !self.expect_peek(TokenKind::Assign, "'=' after destructuring pattern") {
                    return None;
                }
                let value = self.parse_decl_value()?;
                Some(Stmt::ArrayDestructure {
                    span: start.to(value.span()),
                    elements,
                    value,
                })
            }
            TokenKind::Ident => {
                self.advance();
                let mut names = vec![self.cur.literal.clone()];
                while self.peek_is(TokenKind::Comma) {
                    self.advance();
                    if !self.expect_peek(TokenKind::Ident, "a variable name after ','") {
                        return None;
                    }
                    names.push(self.cur.literal.clone());
                }
                if !self.expect_peek(TokenKind::Assign, "'=' in let declaration") {
                    return None;
                }
                let value = self.parse_decl_value()?;
                let span = start.to(value.span());
                Some(if names.len() == 1 {
                    Stmt::Var {
                        span,
                        name: names.remove(0),
                        value,
                    }
                } else {
                    Stmt::MultiVar { span, names, value }
                })
            }
            _ => {
                let msg = format!(
                    "expected a name or destructuring pattern after 'let' but found {}",
                    describe(&self.peek)
                );
                let span = self.peek.span;
                self.parse_error(ErrorCode::UnexpectedToken, span, msg);
                None
            }
        }
    }

    fn parse_const(&mut self) -> Option<Stmt> {
        let start = self.cur.span;
        if !self.expect_peek(TokenKind::Ident, "a constant name after 'const'") {
            return None;
        }
        let name = self.cur.literal.clone();
        if self.peek_is(TokenKind::Comma) {
            let span = self.peek.span;
            self.parse_error(
                ErrorCode::UnexpectedToken,
                span,
                "const supports only a single declaration",
            );
            return None;
        }
        if !self.expect_peek(TokenKind::Assign, "'=' in const declaration") {
            return None;
        }
        let value = self.parse_decl_value()?;
        Some(Stmt::Const {
            span: start.to(value.span()),
            name,
            value,
        })
    }

    /// Value position of a declaration or assignment; `cur` is on the
    /// operator. A terminator or statement keyword instead of a value is
    /// the classic `let x =` mistake and gets its own message.
    pub(super) fn parse_decl_value(&mut self) -> Option<crate::ast::Expr> {
        let op_span = self.cur.span;
        self.advance();
        self.skip_newlines();
        if matches!(
            self.cur.kind,
            TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::Return
                | TokenKind::Throw
        ) {
            self.parse_error(
                ErrorCode::MissingExpression,
                op_span,
                "assignment is missing a value",
            );
            return None;
        }
        self.parse_expression(Precedence::Lowest)
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let span = self.cur.span;
        // bare `return`: the value is absent iff the statement ends here
        if Self::is_terminator(self.peek.kind) {
            return Some(Stmt::Return { span, value: None });
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Stmt::Return {
            span: span.to(value.span()),
            value: Some(value),
        })
    }

    fn parse_throw(&mut self) -> Option<Stmt> {
        let span = self.cur.span;
        if Self::is_terminator(self.peek.kind) {
            self.parse_error(ErrorCode::MissingExpression, span, "throw requires a value");
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Stmt::Throw {
            span: span.to(value.span()),
            value,
        })
    }

    fn parse_try(&mut self) -> Option<Stmt> {
        let start = self.cur.span;
        if !self.expect_peek(TokenKind::LBrace, "'{' after 'try'") {
            return None;
        }
        let body = self.parse_block()?;

        let mut catch_name = None;
        let mut catch = None;
        let mut finally = None;

        // `catch` / `finally` may follow the block after any newlines
        if self.skip_newlines_and_peek(TokenKind::Catch) {
            self.advance();
            if self.peek_is(TokenKind::Ident) {
                self.advance();
                catch_name = Some(self.cur.literal.clone());
            }
            if !self.expect_peek(TokenKind::LBrace, "'{' after 'catch'") {
                return None;
            }
            catch = Some(self.parse_block()?);
        }
        if self.skip_newlines_and_peek(TokenKind::Finally) {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace, "'{' after 'finally'") {
                return None;
            }
            finally = Some(self.parse_block()?);
        }

        if catch.is_none() && finally.is_none() {
            self.parse_error(
                ErrorCode::UnexpectedToken,
                start,
                "try requires a catch or finally block",
            );
            return None;
        }

        let end = finally
            .as_ref()
            .or(catch.as_ref())
            .map_or(body.span, |b| b.span);
        Some(Stmt::Try {
            span: start.to(end),
            body,
            catch_name,
            catch,
            finally,
        })
    }

    /// `cur` is on `{`; returns with `cur` on the matching `}`.
    pub(super) fn parse_block(&mut self) -> Option<Block> {
        let start = self.cur.span;
        let mut statements = Vec::new();
        self.advance();

        loop {
            self.skip_statement_separators();
            if self.cur_is(TokenKind::RBrace) {
                break;
            }
            if self.cur_is(TokenKind::Eof) {
                self.parse_error(
                    ErrorCode::UnclosedDelimiter,
                    start,
                    "missing closing '}' for block",
                );
                return None;
            }
            if self.fatal || !self.check_context() {
                return None;
            }

            let before = (self.cur.span.start.offset, self.cur.kind);
            match self.parse_statement() {
                Some(stmt) => {
                    statements.push(stmt);
                    self.advance();
                    if !Self::is_terminator(self.cur.kind) {
                        let msg = format!(
                            "unexpected token {} following statement",
                            describe(&self.cur)
                        );
                        self.error_cur(ErrorCode::UnexpectedToken, msg);
                        self.synchronize();
                    }
                }
                None => {
                    if self.fatal {
                        return None;
                    }
                    self.synchronize();
                }
            }
            self.force_progress(before);
        }

        Some(Block {
            span: start.to(self.cur.span),
            statements,
        })
    }
}
