//! Pratt engine and expression grammar.
//!
//! The driver reads one prefix expression, then keeps consuming infix
//! operators while the next token binds tighter than the calling level.
//! All binary operators are left-associative except `**`, whose right
//! operand is parsed one level lower so that `2 ** 2 ** 3` nests to the
//! right. Unary `-`/`!` bind below `**` (`-2 ** 3` is `-(2 ** 3)`).

use crate::ast::{Expr, MapItem, MatchArm, Stmt, SwitchCase};
use crate::diagnostics::ErrorCode;
use crate::position::Span;
use crate::token::TokenKind;

use super::core::{Parser, describe};
use super::precedence::{Precedence, token_precedence};

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self, prec: Precedence) -> Option<Expr> {
        if !self.enter_depth() {
            return None;
        }
        let result = self.parse_expression_inner(prec);
        self.exit_depth();
        result
    }

    fn parse_expression_inner(&mut self, prec: Precedence) -> Option<Expr> {
        // a newline in prefix position is a no-op
        self.skip_newlines();
        let mut left = self.parse_prefix()?;

        loop {
            if self.fatal {
                return None;
            }
            if self.group_depth > 0 {
                while self.peek_is(TokenKind::Newline) {
                    self.advance();
                }
            }
            if self.peek_is(TokenKind::Semicolon) {
                break;
            }
            if prec >= token_precedence(self.peek.kind) {
                break;
            }
            self.advance();
            left = self.parse_infix(left)?;
        }

        // postfix ++/-- binds only when glued to its operand; spans have
        // inclusive ends, so adjacency means "ends right before"
        if matches!(self.peek.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
            && self.peek.span.start.offset == self.cur.span.end.offset + 1
        {
            self.advance();
            left = self.finish_postfix(left)?;
        }

        Some(left)
    }

    // -- prefix dispatch ----------------------------------------------------

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur.kind {
            TokenKind::Int => self.parse_int(),
            TokenKind::Float => self.parse_float(),
            TokenKind::Str => self.parse_string(),
            TokenKind::TemplateStr => self.parse_template(),
            TokenKind::True | TokenKind::False => Some(Expr::Bool {
                span: self.cur.span,
                value: self.cur_is(TokenKind::True),
            }),
            TokenKind::Nil => Some(Expr::Nil {
                span: self.cur.span,
            }),
            TokenKind::Ident => self.parse_ident(),
            TokenKind::Minus | TokenKind::Bang => self.parse_prefix_op(),
            TokenKind::LParen => self.parse_grouped_or_arrow(),
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_map(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::If => self.parse_if(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Ellipsis => self.parse_spread(),
            TokenKind::Eof => {
                self.error_cur(
                    ErrorCode::MissingExpression,
                    "unexpected end of file, expected an expression",
                );
                None
            }
            _ => {
                let msg = format!("unexpected token {}", describe(&self.cur));
                self.error_cur(ErrorCode::UnexpectedToken, msg);
                None
            }
        }
    }

    fn parse_int(&mut self) -> Option<Expr> {
        let span = self.cur.span;
        let literal = self.cur.literal.clone();
        let parsed = if let Some(digits) = literal
            .strip_prefix("0x")
            .or_else(|| literal.strip_prefix("0X"))
        {
            i64::from_str_radix(digits, 16)
        } else if let Some(digits) = literal
            .strip_prefix("0b")
            .or_else(|| literal.strip_prefix("0B"))
        {
            i64::from_str_radix(digits, 2)
        } else if let Some(digits) = literal
            .strip_prefix("0o")
            .or_else(|| literal.strip_prefix("0O"))
        {
            i64::from_str_radix(digits, 8)
        } else if literal.len() > 1 && literal.starts_with('0') {
            // legacy octal: leading zero with more digits
            i64::from_str_radix(&literal[1..], 8)
        } else {
            literal.parse::<i64>()
        };
        match parsed {
            Ok(value) => Some(Expr::Int { span, value }),
            Err(_) => {
                self.parse_error(
                    ErrorCode::InvalidLiteral,
                    span,
                    format!("invalid integer literal '{literal}'"),
                );
                None
            }
        }
    }

    fn parse_float(&mut self) -> Option<Expr> {
        let span = self.cur.span;
        let literal = self.cur.literal.clone();
        match literal.parse::<f64>() {
            Ok(value) => Some(Expr::Float { span, value }),
            Err(_) => {
                self.parse_error(
                    ErrorCode::InvalidLiteral,
                    span,
                    format!("invalid float literal '{literal}'"),
                );
                None
            }
        }
    }

    fn parse_string(&mut self) -> Option<Expr> {
        let span = self.cur.span;
        let raw = self.cur.literal.clone();
        let inner = &raw[1..raw.len() - 1];
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                value.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('\\') => value.push('\\'),
                Some('\'') => value.push('\''),
                Some('"') => value.push('"'),
                Some('`') => value.push('`'),
                Some('0') => value.push('\0'),
                other => {
                    let shown: String = other.map(String::from).unwrap_or_default();
                    self.parse_error(
                        ErrorCode::InvalidEscape,
                        span,
                        format!("invalid escape sequence '\\{shown}'"),
                    );
                    return None;
                }
            }
        }
        Some(Expr::Str {
            span,
            value,
            parts: None,
        })
    }

    fn parse_ident(&mut self) -> Option<Expr> {
        if self.peek_is(TokenKind::Arrow) {
            return self.parse_arrow_from_ident();
        }
        Some(Expr::Ident {
            span: self.cur.span,
            name: self.cur.literal.clone(),
        })
    }

    fn parse_prefix_op(&mut self) -> Option<Expr> {
        let op = self.cur.kind;
        let start = self.cur.span;
        self.advance();
        // below `**`, above `*`: -2 ** 3 is -(2 ** 3), -a * b is (-a) * b
        let operand = self.parse_expression(Precedence::Product)?;
        Some(Expr::Prefix {
            span: start.to(operand.span()),
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_spread(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        self.advance();
        self.skip_newlines();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::Spread {
            span: start.to(value.span()),
            value: Box::new(value),
        })
    }

    fn parse_list(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        let items = self.parse_expression_list(TokenKind::RBracket, "']'")?;
        Some(Expr::List {
            span: start.to(self.cur.span),
            items,
        })
    }

    /// Comma-separated expressions between delimiters; `cur` is on the
    /// opening token and ends on the closing one. Trailing commas and
    /// newlines around items are fine.
    pub(super) fn parse_expression_list(
        &mut self,
        end: TokenKind,
        end_name: &str,
    ) -> Option<Vec<Expr>> {
        self.group_depth += 1;
        let result = self.expression_list_inner(end, end_name);
        self.group_depth -= 1;
        result
    }

    fn expression_list_inner(&mut self, end: TokenKind, end_name: &str) -> Option<Vec<Expr>> {
        let open = self.cur.span;
        let mut items = Vec::new();
        self.advance();
        self.skip_newlines();
        if self.cur_is(end) {
            return Some(items);
        }
        loop {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, end_name);
                return None;
            }
            items.push(self.parse_expression(Precedence::Lowest)?);

            if self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                self.skip_newlines();
                if self.cur_is(end) {
                    break;
                }
                continue;
            }
            if self.peek_is(end) {
                self.advance();
                break;
            }
            if self.peek_is(TokenKind::Eof) {
                self.advance();
                self.unclosed(open, end_name);
                return None;
            }
            let span = self.peek.span;
            let msg = format!(
                "expected ',' or {end_name} but found {}",
                describe(&self.peek)
            );
            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
            return None;
        }
        Some(items)
    }

    pub(super) fn unclosed(&mut self, open: Span, end_name: &str) {
        self.parse_error(
            ErrorCode::UnclosedDelimiter,
            open,
            format!("missing closing {end_name}"),
        );
    }

    fn parse_map(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        self.group_depth += 1;
        let items = self.map_items_inner(start);
        self.group_depth -= 1;
        let items = items?;
        Some(Expr::Map {
            span: start.to(self.cur.span),
            items,
        })
    }

    fn map_items_inner(&mut self, open: Span) -> Option<Vec<MapItem>> {
        let mut items = Vec::new();
        self.advance();
        self.skip_newlines();
        if self.cur_is(TokenKind::RBrace) {
            return Some(items);
        }
        loop {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "'}'");
                return None;
            }

            let item_start = self.cur.span;
            if self.cur_is(TokenKind::Ellipsis) {
                // spread entry: no key
                let value = self.parse_expression(Precedence::Lowest)?;
                items.push(MapItem {
                    span: item_start.to(value.span()),
                    key: None,
                    value,
                });
            } else {
                let key_expr = self.parse_expression(Precedence::Lowest)?;
                if self.peek_is(TokenKind::Colon) {
                    // identifier keys mean their name, not a variable
                    let key = match key_expr {
                        Expr::Ident { span, name } => Expr::Str {
                            span,
                            value: name,
                            parts: None,
                        },
                        other => other,
                    };
                    self.advance();
                    self.advance();
                    self.skip_newlines();
                    let value = self.parse_expression(Precedence::Lowest)?;
                    items.push(MapItem {
                        span: item_start.to(value.span()),
                        key: Some(key),
                        value,
                    });
                } else {
                    match key_expr {
                        // `{name}` shorthand binds the variable under its own name
                        Expr::Ident { span, name } => items.push(MapItem {
                            span,
                            key: Some(Expr::Str {
                                span,
                                value: name.clone(),
                                parts: None,
                            }),
                            value: Expr::Ident { span, name },
                        }),
                        _ => {
                            let span = self.peek.span;
                            let msg = format!(
                                "expected ':' after map key but found {}",
                                describe(&self.peek)
                            );
                            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
                            return None;
                        }
                    }
                }
            }

            if self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                self.skip_newlines();
                if self.cur_is(TokenKind::RBrace) {
                    break;
                }
                continue;
            }
            if self.peek_is(TokenKind::RBrace) {
                self.advance();
                break;
            }
            if self.peek_is(TokenKind::Eof) {
                self.advance();
                self.unclosed(open, "'}'");
                return None;
            }
            let span = self.peek.span;
            let msg = format!("expected ',' or '}}' but found {}", describe(&self.peek));
            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
            return None;
        }
        Some(items)
    }

    fn parse_if(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        self.advance();
        self.skip_newlines();
        let cond = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace, "'{' after if condition") {
            return None;
        }
        let consequence = self.parse_block()?;

        let mut alternative = None;
        if self.skip_newlines_and_peek(TokenKind::Else) {
            self.advance();
            if self.peek_is(TokenKind::If) {
                // `else if` is sugar for a nested if in a one-statement block
                self.advance();
                if !self.enter_depth() {
                    return None;
                }
                let nested = self.parse_if();
                self.exit_depth();
                let nested = nested?;
                alternative = Some(crate::ast::Block {
                    span: nested.span(),
                    statements: vec![Stmt::Expr(nested)],
                });
            } else {
                if !self.expect_peek(TokenKind::LBrace, "'{' after 'else'") {
                    return None;
                }
                alternative = Some(self.parse_block()?);
            }
        }

        let end = alternative.as_ref().map_or(consequence.span, |b| b.span);
        Some(Expr::If {
            span: start.to(end),
            cond: Box::new(cond),
            consequence,
            alternative,
        })
    }

    fn parse_switch(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        self.advance();
        self.skip_newlines();
        let subject = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace, "'{' after switch subject") {
            return None;
        }
        let open = self.cur.span;
        self.advance();
        self.skip_newlines();

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.cur_is(TokenKind::RBrace) {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "'}'");
                return None;
            }
            match self.cur.kind {
                TokenKind::Case => {
                    let case_start = self.cur.span;
                    self.advance();
                    self.skip_newlines();
                    let mut values = vec![self.parse_expression(Precedence::Lowest)?];
                    while self.peek_is(TokenKind::Comma) {
                        self.advance();
                        self.advance();
                        self.skip_newlines();
                        values.push(self.parse_expression(Precedence::Lowest)?);
                    }
                    if !self.expect_peek(TokenKind::Colon, "':' after case values") {
                        return None;
                    }
                    let colon = self.cur.span;
                    let body = self.parse_case_body()?;
                    let end = body.last().map_or(colon, |s| s.span());
                    cases.push(SwitchCase {
                        span: case_start.to(end),
                        values: Some(values),
                        body,
                    });
                }
                TokenKind::Default => {
                    if seen_default {
                        self.error_cur(
                            ErrorCode::MultipleDefaults,
                            "switch has more than one default case",
                        );
                        return None;
                    }
                    seen_default = true;
                    let case_start = self.cur.span;
                    if !self.expect_peek(TokenKind::Colon, "':' after 'default'") {
                        return None;
                    }
                    let colon = self.cur.span;
                    let body = self.parse_case_body()?;
                    let end = body.last().map_or(colon, |s| s.span());
                    cases.push(SwitchCase {
                        span: case_start.to(end),
                        values: None,
                        body,
                    });
                }
                _ => {
                    let msg = format!(
                        "expected 'case' or 'default' but found {}",
                        describe(&self.cur)
                    );
                    self.error_cur(ErrorCode::UnexpectedToken, msg);
                    return None;
                }
            }
            self.skip_newlines();
        }

        Some(Expr::Switch {
            span: start.to(self.cur.span),
            subject: Box::new(subject),
            cases,
        })
    }

    /// Statements after `case …:` until the next case, default, or `}`.
    /// An empty body is a no-op; there is no fallthrough.
    fn parse_case_body(&mut self) -> Option<Vec<Stmt>> {
        let mut body = Vec::new();
        self.advance();
        loop {
            while self.cur_is(TokenKind::Newline) || self.cur_is(TokenKind::Semicolon) {
                self.advance();
            }
            if matches!(
                self.cur.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                break;
            }
            if self.fatal || !self.check_context() {
                return None;
            }

            let before = (self.cur.span.start.offset, self.cur.kind);
            match self.parse_statement() {
                Some(stmt) => {
                    body.push(stmt);
                    self.advance();
                    if !Self::is_terminator(self.cur.kind)
                        && !matches!(self.cur.kind, TokenKind::Case | TokenKind::Default)
                    {
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
            if !self.fatal
                && !self.cur_is(TokenKind::Eof)
                && self.cur.span.start.offset == before.0
                && self.cur.kind == before.1
            {
                self.advance();
            }
        }
        Some(body)
    }

    fn parse_match(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        self.advance();
        self.skip_newlines();
        let subject = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace, "'{' after match subject") {
            return None;
        }
        let open = self.cur.span;
        self.advance();
        self.skip_newlines();

        let mut arms: Vec<MatchArm> = Vec::new();
        let mut has_default = false;
        loop {
            if self.cur_is(TokenKind::RBrace) {
                break;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "'}'");
                return None;
            }
            if !self.check_context() {
                return None;
            }

            let arm_start = self.cur.span;
            let pattern = if self.cur_is(TokenKind::Ident) && self.cur.literal == "_" {
                if has_default {
                    self.error_cur(
                        ErrorCode::MultipleDefaults,
                        "match has more than one default arm",
                    );
                    return None;
                }
                has_default = true;
                None
            } else if self.cur_is(TokenKind::Ellipsis) {
                self.error_cur(
                    ErrorCode::UnexpectedToken,
                    "spread patterns are not allowed in match",
                );
                return None;
            } else {
                Some(self.parse_expression(Precedence::Lowest)?)
            };

            if !self.expect_peek(TokenKind::Arrow, "'=>' after match pattern") {
                return None;
            }
            self.advance();
            self.skip_newlines();
            let body = self.parse_expression(Precedence::Lowest)?;
            arms.push(MatchArm {
                span: arm_start.to(body.span()),
                pattern,
                body,
            });

            while self.peek_is(TokenKind::Newline) {
                self.advance();
            }
            if self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                self.skip_newlines();
                if self.cur_is(TokenKind::RBrace) {
                    break;
                }
                continue;
            }
            if self.peek_is(TokenKind::RBrace) {
                self.advance();
                break;
            }
            if self.peek_is(TokenKind::Eof) {
                self.advance();
                self.unclosed(open, "'}'");
                return None;
            }
            let span = self.peek.span;
            let msg = format!("expected ',' or '}}' but found {}", describe(&self.peek));
            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
            return None;
        }

        if !has_default {
            self.parse_error(
                ErrorCode::MissingExpression,
                start,
                "match requires a default arm ('_')",
            );
            return None;
        }

        Some(Expr::Match {
            span: start.to(self.cur.span),
            subject: Box::new(subject),
            arms,
        })
    }

    // -- infix dispatch -----------------------------------------------------

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.cur.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Power
            | TokenKind::Amp
            | TokenKind::Shl
            | TokenKind::Shr
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Nullish => self.parse_infix_op(left),
            TokenKind::In => self.parse_in(left),
            TokenKind::Not => self.parse_not_in(left),
            TokenKind::Question => self.parse_ternary(left),
            TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::SlashAssign => self.parse_assign(left),
            TokenKind::LParen => self.parse_call(left),
            TokenKind::LBracket => self.parse_index(left),
            TokenKind::Dot => self.parse_attr(left, false),
            TokenKind::QuestionDot => self.parse_attr(left, true),
            TokenKind::Pipe | TokenKind::PipeArrow => self.parse_pipe(left),
            _ => {
                let msg = format!("unexpected token {}", describe(&self.cur));
                self.error_cur(ErrorCode::UnexpectedToken, msg);
                None
            }
        }
    }

    fn parse_infix_op(&mut self, left: Expr) -> Option<Expr> {
        let op = self.cur.kind;
        let prec = token_precedence(op);
        // `**` is right-associative: parse its right side one level lower
        let right_prec = if op == TokenKind::Power {
            Precedence::Product
        } else {
            prec
        };
        self.advance();
        let right = self.parse_expression(right_prec)?;
        Some(Expr::Infix {
            span: left.span().to(right.span()),
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_in(&mut self, left: Expr) -> Option<Expr> {
        self.advance();
        let right = self.parse_expression(Precedence::LessGreater)?;
        Some(Expr::In {
            span: left.span().to(right.span()),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_not_in(&mut self, left: Expr) -> Option<Expr> {
        if !self.expect_peek(TokenKind::In, "'in' after 'not'") {
            return None;
        }
        self.advance();
        let right = self.parse_expression(Precedence::LessGreater)?;
        Some(Expr::NotIn {
            span: left.span().to(right.span()),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_ternary(&mut self, cond: Expr) -> Option<Expr> {
        if self.in_ternary {
            self.error_cur(
                ErrorCode::NestedTernary,
                "nested ternary expressions are not allowed",
            );
            return None;
        }
        self.in_ternary = true;
        let result = self.ternary_inner(cond);
        self.in_ternary = false;
        result
    }

    fn ternary_inner(&mut self, cond: Expr) -> Option<Expr> {
        // newlines are allowed after `?` and after `:`
        self.advance();
        self.skip_newlines();
        let if_true = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Colon, "':' in ternary expression") {
            return None;
        }
        self.advance();
        self.skip_newlines();
        let if_false = self.parse_expression(Precedence::Lowest)?;
        Some(Expr::Ternary {
            span: cond.span().to(if_false.span()),
            cond: Box::new(cond),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    fn parse_assign(&mut self, target: Expr) -> Option<Expr> {
        let op = self.cur.kind;
        // only `=`, `+=`, `-=`, `*=`, `/=` assign
        if !op.is_assignment_op() {
            self.error_cur(ErrorCode::InvalidAssignment, "invalid assignment operator");
            return None;
        }
        if !matches!(target, Expr::Ident { .. } | Expr::Index { .. }) {
            self.parse_error(
                ErrorCode::InvalidAssignment,
                target.span(),
                "invalid assignment target",
            );
            return None;
        }
        let value = self.parse_decl_value()?;
        Some(Expr::Assign {
            span: target.span().to(value.span()),
            target: Box::new(target),
            op,
            value: Box::new(value),
        })
    }

    pub(super) fn parse_call(&mut self, func: Expr) -> Option<Expr> {
        let args = self.parse_expression_list(TokenKind::RParen, "')'")?;
        Some(Expr::Call {
            span: func.span().to(self.cur.span),
            func: Box::new(func),
            args,
        })
    }

    fn parse_index(&mut self, object: Expr) -> Option<Expr> {
        self.group_depth += 1;
        let result = self.index_inner(object);
        self.group_depth -= 1;
        result
    }

    fn index_inner(&mut self, object: Expr) -> Option<Expr> {
        let open = self.cur.span;
        self.advance();
        self.skip_newlines();

        if self.cur_is(TokenKind::Colon) {
            // x[:high] or x[:]
            self.advance();
            self.skip_newlines();
            if self.cur_is(TokenKind::RBracket) {
                return Some(Expr::Slice {
                    span: object.span().to(self.cur.span),
                    object: Box::new(object),
                    low: None,
                    high: None,
                });
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "']'");
                return None;
            }
            let high = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::RBracket, "']' to close slice") {
                return None;
            }
            return Some(Expr::Slice {
                span: object.span().to(self.cur.span),
                object: Box::new(object),
                low: None,
                high: Some(Box::new(high)),
            });
        }

        if self.cur_is(TokenKind::RBracket) {
            self.error_cur(ErrorCode::MissingExpression, "index expression is missing");
            return None;
        }
        if self.cur_is(TokenKind::Eof) {
            self.unclosed(open, "']'");
            return None;
        }

        let index = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Colon) {
            self.advance();
            self.advance();
            self.skip_newlines();
            if self.cur_is(TokenKind::RBracket) {
                return Some(Expr::Slice {
                    span: object.span().to(self.cur.span),
                    object: Box::new(object),
                    low: Some(Box::new(index)),
                    high: None,
                });
            }
            let high = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::RBracket, "']' to close slice") {
                return None;
            }
            return Some(Expr::Slice {
                span: object.span().to(self.cur.span),
                object: Box::new(object),
                low: Some(Box::new(index)),
                high: Some(Box::new(high)),
            });
        }

        if !self.expect_peek(TokenKind::RBracket, "']' to close index") {
            return None;
        }
        Some(Expr::Index {
            span: object.span().to(self.cur.span),
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    /// Attribute access and everything it can turn into: `x.a`, `x?.a`,
    /// `x.a(…)`, `x?.a(…)`, `x.a = v`. Optional chaining never appears on
    /// an assignment target, so the `?.` path offers no assignment.
    fn parse_attr(&mut self, object: Expr, optional: bool) -> Option<Expr> {
        if !self.expect_peek(TokenKind::Ident, "an attribute name after '.'") {
            return None;
        }
        let name_span = self.cur.span;
        let name = self.cur.literal.clone();

        if !optional && self.peek.kind.is_assignment_op() {
            self.advance();
            let op = self.cur.kind;
            let value = self.parse_decl_value()?;
            return Some(Expr::SetAttr {
                span: object.span().to(value.span()),
                object: Box::new(object),
                name,
                op,
                value: Box::new(value),
            });
        }

        if self.peek_is(TokenKind::LParen) {
            self.advance();
            let callee = Expr::Ident {
                span: name_span,
                name,
            };
            let call = self.parse_call(callee)?;
            return Some(Expr::ObjectCall {
                span: object.span().to(call.span()),
                object: Box::new(object),
                call: Box::new(call),
                optional,
            });
        }

        Some(Expr::GetAttr {
            span: object.span().to(name_span),
            object: Box::new(object),
            name,
            optional,
        })
    }

    fn parse_pipe(&mut self, left: Expr) -> Option<Expr> {
        self.advance();
        let right = self.parse_expression(Precedence::Pipe)?;
        let span = left.span().to(right.span());
        let stages = match left {
            Expr::Pipe { mut stages, .. } => {
                stages.push(right);
                stages
            }
            first => vec![first, right],
        };
        Some(Expr::Pipe { span, stages })
    }

    fn finish_postfix(&mut self, operand: Expr) -> Option<Expr> {
        let op = self.cur.kind;
        if !operand.is_place() {
            self.parse_error(
                ErrorCode::InvalidAssignment,
                operand.span(),
                format!("invalid operand for postfix '{op}'"),
            );
            return None;
        }
        Some(Expr::Postfix {
            span: operand.span().to(self.cur.span),
            op,
            operand: Box::new(operand),
        })
    }
}
