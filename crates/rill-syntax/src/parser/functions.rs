//! Function literals, arrow functions, and destructuring patterns.
//!
//! `(` in prefix position is ambiguous: a parenthesized expression or an
//! arrow-function parameter list. The parser collects comma-separated
//! items — expressions, or destructure patterns when an item starts with
//! `{`/`[` — and decides when it sees whether `=>` follows the closing
//! `)`. Without the arrow, exactly one expression item must be present.

use indexmap::IndexMap;

use crate::ast::{
    Block, DestructureBinding, DestructureElement, Expr, FuncLit, Param, Stmt,
};
use crate::diagnostics::ErrorCode;
use crate::position::Span;
use crate::token::TokenKind;

use super::core::{Parser, describe};
use super::precedence::Precedence;

enum GroupItem {
    Expr(Expr),
    Object {
        span: Span,
        bindings: Vec<DestructureBinding>,
    },
    Array {
        span: Span,
        elements: Vec<DestructureElement>,
    },
}

impl GroupItem {
    fn span(&self) -> Span {
        match self {
            GroupItem::Expr(expr) => expr.span(),
            GroupItem::Object { span, .. } | GroupItem::Array { span, .. } => *span,
        }
    }
}

impl Parser<'_> {
    pub(super) fn parse_grouped_or_arrow(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        self.group_depth += 1;
        let items = self.group_items_inner(start);
        self.group_depth -= 1;
        let items = items?; // cur is on ')'

        if self.peek_is(TokenKind::Arrow) {
            self.advance();
            return self.arrow_from_items(start, items);
        }

        match items.len() {
            1 => match items.into_iter().next() {
                Some(GroupItem::Expr(expr)) => Some(expr),
                Some(pattern) => {
                    self.parse_error(
                        ErrorCode::InvalidParameter,
                        pattern.span(),
                        "destructuring pattern is only valid before '=>'",
                    );
                    None
                }
                None => unreachable!("length checked above"),
            },
            0 => {
                self.parse_error(
                    ErrorCode::MissingExpression,
                    start.to(self.cur.span),
                    "empty parentheses require '=>' to form a function",
                );
                None
            }
            _ => {
                self.parse_error(
                    ErrorCode::UnexpectedToken,
                    start.to(self.cur.span),
                    "expected '=>' after parameter list",
                );
                None
            }
        }
    }

    fn group_items_inner(&mut self, open: Span) -> Option<Vec<GroupItem>> {
        let mut items = Vec::new();
        self.advance();
        self.skip_newlines();
        if self.cur_is(TokenKind::RParen) {
            return Some(items);
        }
        loop {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "')'");
                return None;
            }

            let item = match self.cur.kind {
                TokenKind::LBrace => {
                    let pattern_start = self.cur.span;
                    let bindings = self.parse_object_pattern()?;
                    GroupItem::Object {
                        span: pattern_start.to(self.cur.span),
                        bindings,
                    }
                }
                TokenKind::LBracket => {
                    let pattern_start = self.cur.span;
                    let elements = self.parse_array_pattern()?;
                    GroupItem::Array {
                        span: pattern_start.to(self.cur.span),
                        elements,
                    }
                }
                _ => GroupItem::Expr(self.parse_expression(Precedence::Lowest)?),
            };
            items.push(item);

            if self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                self.skip_newlines();
                if self.cur_is(TokenKind::RParen) {
                    break;
                }
                continue;
            }
            if self.peek_is(TokenKind::RParen) {
                self.advance();
                break;
            }
            if self.peek_is(TokenKind::Eof) {
                self.advance();
                self.unclosed(open, "')'");
                return None;
            }
            let span = self.peek.span;
            let msg = format!("expected ',' or ')' but found {}", describe(&self.peek));
            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
            return None;
        }
        Some(items)
    }

    /// Reinterpret grouped items as parameters; `cur` is on `=>`.
    fn arrow_from_items(&mut self, start: Span, items: Vec<GroupItem>) -> Option<Expr> {
        let mut params = Vec::new();
        let mut defaults = IndexMap::new();
        let mut rest: Option<String> = None;

        for item in items {
            if rest.is_some() {
                self.parse_error(
                    ErrorCode::InvalidParameter,
                    item.span(),
                    "rest parameter must be the last parameter",
                );
                return None;
            }
            match item {
                GroupItem::Expr(Expr::Ident { span, name }) => {
                    params.push(Param::Ident { span, name });
                }
                GroupItem::Expr(Expr::Assign {
                    span,
                    target,
                    op: TokenKind::Assign,
                    value,
                }) => match *target {
                    Expr::Ident { name, .. } => {
                        defaults.insert(name.clone(), *value);
                        params.push(Param::Ident { span, name });
                    }
                    other => {
                        self.parse_error(
                            ErrorCode::InvalidParameter,
                            other.span(),
                            "invalid arrow function parameter",
                        );
                        return None;
                    }
                },
                GroupItem::Expr(Expr::Spread { span, value }) => match *value {
                    Expr::Ident { name, .. } => rest = Some(name),
                    _ => {
                        self.parse_error(
                            ErrorCode::InvalidParameter,
                            span,
                            "rest parameter must be a single name",
                        );
                        return None;
                    }
                },
                GroupItem::Expr(other) => {
                    self.parse_error(
                        ErrorCode::InvalidParameter,
                        other.span(),
                        "invalid arrow function parameter",
                    );
                    return None;
                }
                GroupItem::Object { span, bindings } => {
                    params.push(Param::Object { span, bindings });
                }
                GroupItem::Array { span, elements } => {
                    params.push(Param::Array { span, elements });
                }
            }
        }

        if !self.check_unique_params(&params, rest.as_deref()) {
            return None;
        }
        self.parse_arrow_body(start, params, defaults, rest)
    }

    /// Single-identifier arrow: `x => body`. `cur` is on the identifier.
    pub(super) fn parse_arrow_from_ident(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        let params = vec![Param::Ident {
            span: start,
            name: self.cur.literal.clone(),
        }];
        self.advance(); // onto '=>'
        self.parse_arrow_body(start, params, IndexMap::new(), None)
    }

    /// `cur` is on `=>`. The body is a block, or a single expression that
    /// becomes an implicit `return`.
    fn parse_arrow_body(
        &mut self,
        start: Span,
        params: Vec<Param>,
        defaults: IndexMap<String, Expr>,
        rest: Option<String>,
    ) -> Option<Expr> {
        let body = if self.peek_is(TokenKind::LBrace) {
            self.advance();
            self.parse_block()?
        } else {
            self.advance();
            self.skip_newlines();
            let expr = self.parse_expression(Precedence::Lowest)?;
            let span = expr.span();
            Block {
                span,
                statements: vec![Stmt::Return {
                    span,
                    value: Some(expr),
                }],
            }
        };
        Some(Expr::Func(FuncLit {
            span: start.to(body.span),
            name: None,
            params,
            defaults,
            rest,
            body,
        }))
    }

    pub(super) fn parse_function_literal(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        let name = if self.peek_is(TokenKind::Ident) {
            self.advance();
            Some(self.cur.literal.clone())
        } else {
            None
        };
        if !self.expect_peek(TokenKind::LParen, "'(' to begin function parameters") {
            return None;
        }
        let (params, defaults, rest) = self.parse_function_params()?;
        if !self.expect_peek(TokenKind::LBrace, "'{' to begin function body") {
            return None;
        }
        let body = self.parse_block()?;
        if !self.check_unique_params(&params, rest.as_deref()) {
            return None;
        }
        Some(Expr::Func(FuncLit {
            span: start.to(body.span),
            name,
            params,
            defaults,
            rest,
            body,
        }))
    }

    /// `cur` is on `(`; ends on `)`.
    fn parse_function_params(
        &mut self,
    ) -> Option<(Vec<Param>, IndexMap<String, Expr>, Option<String>)> {
        self.group_depth += 1;
        let result = self.function_params_inner();
        self.group_depth -= 1;
        result
    }

    #[allow(clippy::type_complexity)]
    fn function_params_inner(
        &mut self,
    ) -> Option<(Vec<Param>, IndexMap<String, Expr>, Option<String>)> {
        let open = self.cur.span;
        let mut params = Vec::new();
        let mut defaults = IndexMap::new();
        let mut rest: Option<String> = None;

        self.advance();
        self.skip_newlines();
        if self.cur_is(TokenKind::RParen) {
            return Some((params, defaults, rest));
        }
        loop {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "')'");
                return None;
            }
            if rest.is_some() {
                let msg = if self.cur_is(TokenKind::Ellipsis) {
                    "duplicate rest parameter"
                } else {
                    "rest parameter must be the last parameter"
                };
                self.error_cur(ErrorCode::InvalidParameter, msg);
                return None;
            }

            match self.cur.kind {
                TokenKind::Ellipsis => {
                    if !self.expect_peek(TokenKind::Ident, "a name for the rest parameter") {
                        return None;
                    }
                    rest = Some(self.cur.literal.clone());
                }
                TokenKind::Ident => {
                    let param_span = self.cur.span;
                    let name = self.cur.literal.clone();
                    if self.peek_is(TokenKind::Assign) {
                        self.advance();
                        self.advance();
                        self.skip_newlines();
                        let default = self.parse_expression(Precedence::Lowest)?;
                        defaults.insert(name.clone(), default);
                    }
                    params.push(Param::Ident {
                        span: param_span,
                        name,
                    });
                }
                TokenKind::LBrace => {
                    let pattern_start = self.cur.span;
                    let bindings = self.parse_object_pattern()?;
                    params.push(Param::Object {
                        span: pattern_start.to(self.cur.span),
                        bindings,
                    });
                }
                TokenKind::LBracket => {
                    let pattern_start = self.cur.span;
                    let elements = self.parse_array_pattern()?;
                    params.push(Param::Array {
                        span: pattern_start.to(self.cur.span),
                        elements,
                    });
                }
                _ => {
                    let msg = format!("invalid function parameter {}", describe(&self.cur));
                    self.error_cur(ErrorCode::InvalidParameter, msg);
                    return None;
                }
            }

            if self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                self.skip_newlines();
                if self.cur_is(TokenKind::RParen) {
                    break;
                }
                continue;
            }
            if self.peek_is(TokenKind::RParen) {
                self.advance();
                break;
            }
            if self.peek_is(TokenKind::Eof) {
                self.advance();
                self.unclosed(open, "')'");
                return None;
            }
            let span = self.peek.span;
            let msg = format!("expected ',' or ')' but found {}", describe(&self.peek));
            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
            return None;
        }
        Some((params, defaults, rest))
    }

    /// Parameter names within one function are unique; checked after the
    /// whole list is known.
    fn check_unique_params(&mut self, params: &[Param], rest: Option<&str>) -> bool {
        let mut named: Vec<(&str, Span)> = Vec::new();
        for param in params {
            match param {
                Param::Ident { span, name } => named.push((name, *span)),
                Param::Object { bindings, .. } => {
                    named.extend(bindings.iter().map(|b| (b.name(), b.span)));
                }
                Param::Array { elements, .. } => {
                    named.extend(elements.iter().map(|e| (e.name.as_str(), e.span)));
                }
            }
        }
        if let Some(name) = rest {
            named.push((name, self.cur.span));
        }

        let mut duplicates = Vec::new();
        for (i, (name, span)) in named.iter().enumerate() {
            if named[..i].iter().any(|(earlier, _)| earlier == name) {
                duplicates.push((name.to_string(), *span));
            }
        }
        for (name, span) in &duplicates {
            self.parse_error(
                ErrorCode::DuplicateParameter,
                *span,
                format!("duplicate parameter '{name}'"),
            );
        }
        duplicates.is_empty()
    }

    /// Object destructure pattern `{key, other: alias = default}`.
    /// `cur` is on `{`; ends on `}`. Shared by `let` declarations and
    /// parameter lists.
    pub(super) fn parse_object_pattern(&mut self) -> Option<Vec<DestructureBinding>> {
        self.group_depth += 1;
        let result = self.object_pattern_inner();
        self.group_depth -= 1;
        result
    }

    fn object_pattern_inner(&mut self) -> Option<Vec<DestructureBinding>> {
        let open = self.cur.span;
        let mut bindings = Vec::new();
        self.advance();
        self.skip_newlines();
        if self.cur_is(TokenKind::RBrace) {
            return Some(bindings);
        }
        loop {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "'}'");
                return None;
            }
            if !self.cur_is(TokenKind::Ident) {
                let msg = format!("expected a binding name but found {}", describe(&self.cur));
                self.error_cur(ErrorCode::InvalidParameter, msg);
                return None;
            }

            let binding_start = self.cur.span;
            let key = self.cur.literal.clone();
            let mut alias = None;
            if self.peek_is(TokenKind::Colon) {
                self.advance();
                if !self.expect_peek(TokenKind::Ident, "an alias after ':'") {
                    return None;
                }
                alias = Some(self.cur.literal.clone());
            }
            let mut default = None;
            if self.peek_is(TokenKind::Assign) {
                self.advance();
                self.advance();
                self.skip_newlines();
                default = Some(self.parse_expression(Precedence::Lowest)?);
            }
            bindings.push(DestructureBinding {
                span: binding_start.to(self.cur.span),
                key,
                alias,
                default,
            });

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
        Some(bindings)
    }

    /// Array destructure pattern `[a, b = default]`. `cur` is on `[`;
    /// ends on `]`.
    pub(super) fn parse_array_pattern(&mut self) -> Option<Vec<DestructureElement>> {
        self.group_depth += 1;
        let result = self.array_pattern_inner();
        self.group_depth -= 1;
        result
    }

    fn array_pattern_inner(&mut self) -> Option<Vec<DestructureElement>> {
        let open = self.cur.span;
        let mut elements = Vec::new();
        self.advance();
        self.skip_newlines();
        if self.cur_is(TokenKind::RBracket) {
            return Some(elements);
        }
        loop {
            if !self.check_context() {
                return None;
            }
            if self.cur_is(TokenKind::Eof) {
                self.unclosed(open, "']'");
                return None;
            }
            if !self.cur_is(TokenKind::Ident) {
                let msg = format!("expected a binding name but found {}", describe(&self.cur));
                self.error_cur(ErrorCode::InvalidParameter, msg);
                return None;
            }

            let element_start = self.cur.span;
            let name = self.cur.literal.clone();
            let mut default = None;
            if self.peek_is(TokenKind::Assign) {
                self.advance();
                self.advance();
                self.skip_newlines();
                default = Some(self.parse_expression(Precedence::Lowest)?);
            }
            elements.push(DestructureElement {
                span: element_start.to(self.cur.span),
                name,
                default,
            });

            if self.peek_is(TokenKind::Comma) {
                self.advance();
                self.advance();
                self.skip_newlines();
                if self.cur_is(TokenKind::RBracket) {
                    break;
                }
                continue;
            }
            if self.peek_is(TokenKind::RBracket) {
                self.advance();
                break;
            }
            if self.peek_is(TokenKind::Eof) {
                self.advance();
                self.unclosed(open, "']'");
                return None;
            }
            let span = self.peek.span;
            let msg = format!("expected ',' or ']' but found {}", describe(&self.peek));
            self.parse_error(ErrorCode::UnexpectedToken, span, msg);
            return None;
        }
        Some(elements)
    }
}
