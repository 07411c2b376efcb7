//! Template-string sub-parser.
//!
//! A backtick literal with no `${` is a plain string. Otherwise it splits
//! into literal and expression fragments; each fragment is parsed by a
//! nested parser that shares the outer context and depth budget, and must
//! yield exactly one expression statement. Everything the nested parse
//! produces — node spans and diagnostics alike — is re-based to the
//! coordinates of the enclosing file so carets point into the template.

use crate::ast::{Block, Expr, FuncLit, MapItem, MatchArm, Param, Stmt, StrPart, SwitchCase};
use crate::diagnostics::{ErrorCode, ErrorKind};
use crate::position::{Position, Span};

use super::core::Parser;

impl Parser<'_> {
    pub(super) fn parse_template(&mut self) -> Option<Expr> {
        let span = self.cur.span;
        let raw = self.cur.literal.clone();
        let inner = &raw[1..raw.len() - 1];

        if !inner.contains("${") {
            return Some(Expr::Str {
                span,
                value: inner.to_string(),
                parts: None,
            });
        }

        // position of the first character inside the backticks
        let inner_base = Position::new(
            span.start.line,
            span.start.column + 1,
            span.start.offset + 1,
        );
        let parts = self.template_parts(inner, inner_base, span)?;
        Some(Expr::Str {
            span,
            value: inner.to_string(),
            parts: Some(parts),
        })
    }

    fn template_parts(
        &mut self,
        inner: &str,
        inner_base: Position,
        token_span: Span,
    ) -> Option<Vec<StrPart>> {
        let bytes = inner.as_bytes();
        let mut parts = Vec::new();
        let mut lit_start = 0usize;
        let mut i = 0usize;

        while i < bytes.len() {
            if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
                if i > lit_start {
                    parts.push(literal_part(inner, lit_start, i, inner_base));
                }
                let frag_start = i + 2;
                let Some(frag_end) = find_fragment_end(inner, frag_start) else {
                    self.parse_error(
                        ErrorCode::UnclosedDelimiter,
                        token_span,
                        "missing '}' in template expression",
                    );
                    return None;
                };
                let expr = self.parse_fragment(inner, frag_start, frag_end, inner_base)?;
                parts.push(StrPart::Expr {
                    span: expr.span(),
                    expr,
                });
                i = frag_end + 1;
                lit_start = i;
            } else {
                i += 1;
            }
        }
        if lit_start < inner.len() {
            parts.push(literal_part(inner, lit_start, inner.len(), inner_base));
        }
        Some(parts)
    }

    /// Parse one `${…}` fragment through a nested parser.
    fn parse_fragment(
        &mut self,
        inner: &str,
        start: usize,
        end: usize,
        inner_base: Position,
    ) -> Option<Expr> {
        let fragment = &inner[start..end];
        let base = rebase_position(local_pos(inner, start), inner_base);

        if fragment.trim().is_empty() {
            self.parse_error(
                ErrorCode::MissingExpression,
                Span::new(base, base),
                "template expression is empty",
            );
            return None;
        }

        let sub = Parser::with_depth(
            self.ctx.clone(),
            fragment,
            self.lexer.filename().to_string(),
            self.depth,
            self.max_depth,
        );
        let result = sub.parse();

        let had_errors = !result.errors.is_empty();
        for err in &result.errors {
            let mut rebased = err.clone();
            rebased.span = rebase_span(err.span, base);
            rebased.line_text = self.lexer.line_text_at(rebased.span.start.line).to_string();
            let ends_parse = rebased.kind == ErrorKind::ContextError
                || rebased.code == Some(ErrorCode::MaxDepthExceeded);
            self.merge_error(rebased);
            if ends_parse {
                self.fatal = true;
            }
        }
        if had_errors {
            return None;
        }

        let mut statements = result.program.statements;
        if statements.len() != 1 || !matches!(statements.first(), Some(Stmt::Expr(_))) {
            self.parse_error(
                ErrorCode::UnexpectedToken,
                Span::new(base, base),
                "template expression must be a single expression",
            );
            return None;
        }
        let Some(Stmt::Expr(mut expr)) = statements.pop() else {
            unreachable!("shape checked above");
        };
        rebase_expr(&mut expr, base);
        Some(expr)
    }
}

fn literal_part(inner: &str, start: usize, end: usize, inner_base: Position) -> StrPart {
    let last = inner[start..end]
        .char_indices()
        .last()
        .map_or(start, |(i, _)| start + i);
    let span = Span::new(
        rebase_position(local_pos(inner, start), inner_base),
        rebase_position(local_pos(inner, last), inner_base),
    );
    StrPart::Lit {
        span,
        value: inner[start..end].to_string(),
    }
}

/// Find the `}` closing a fragment opened at `from`, skipping braces
/// inside nested strings and balancing bare ones.
fn find_fragment_end(s: &str, from: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && q != b'`' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// 1-based position of `offset` within `text`.
fn local_pos(text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() as u32 + 1;
    Position::new(line, column, offset as u32)
}

/// Shift a fragment-local position to outer-file coordinates: `base` is
/// where the fragment's first character sits in the outer file.
fn rebase_position(pos: Position, base: Position) -> Position {
    if pos.is_zero() {
        return pos;
    }
    if pos.line <= 1 {
        Position::new(
            base.line,
            base.column + pos.column.saturating_sub(1),
            base.offset + pos.offset,
        )
    } else {
        Position::new(base.line + pos.line - 1, pos.column, base.offset + pos.offset)
    }
}

fn rebase_span(span: Span, base: Position) -> Span {
    Span::new(
        rebase_position(span.start, base),
        rebase_position(span.end, base),
    )
}

fn rebase_stmt(stmt: &mut Stmt, base: Position) {
    match stmt {
        Stmt::Var { span, value, .. } | Stmt::Const { span, value, .. } => {
            *span = rebase_span(*span, base);
            rebase_expr(value, base);
        }
        Stmt::MultiVar { span, value, .. } => {
            *span = rebase_span(*span, base);
            rebase_expr(value, base);
        }
        Stmt::Assign {
            span,
            target,
            value,
            ..
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(target, base);
            rebase_expr(value, base);
        }
        Stmt::Return { span, value } => {
            *span = rebase_span(*span, base);
            if let Some(value) = value {
                rebase_expr(value, base);
            }
        }
        Stmt::Throw { span, value } => {
            *span = rebase_span(*span, base);
            rebase_expr(value, base);
        }
        Stmt::Try {
            span,
            body,
            catch,
            finally,
            ..
        } => {
            *span = rebase_span(*span, base);
            rebase_block(body, base);
            if let Some(catch) = catch {
                rebase_block(catch, base);
            }
            if let Some(finally) = finally {
                rebase_block(finally, base);
            }
        }
        Stmt::ObjectDestructure {
            span,
            bindings,
            value,
        } => {
            *span = rebase_span(*span, base);
            for binding in bindings {
                binding.span = rebase_span(binding.span, base);
                if let Some(default) = &mut binding.default {
                    rebase_expr(default, base);
                }
            }
            rebase_expr(value, base);
        }
        Stmt::ArrayDestructure {
            span,
            elements,
            value,
        } => {
            *span = rebase_span(*span, base);
            for element in elements {
                element.span = rebase_span(element.span, base);
                if let Some(default) = &mut element.default {
                    rebase_expr(default, base);
                }
            }
            rebase_expr(value, base);
        }
        Stmt::Expr(expr) => rebase_expr(expr, base),
    }
}

fn rebase_block(block: &mut Block, base: Position) {
    block.span = rebase_span(block.span, base);
    for stmt in &mut block.statements {
        rebase_stmt(stmt, base);
    }
}

fn rebase_func(func: &mut FuncLit, base: Position) {
    func.span = rebase_span(func.span, base);
    for param in &mut func.params {
        match param {
            Param::Ident { span, .. } => *span = rebase_span(*span, base),
            Param::Object { span, bindings } => {
                *span = rebase_span(*span, base);
                for binding in bindings {
                    binding.span = rebase_span(binding.span, base);
                    if let Some(default) = &mut binding.default {
                        rebase_expr(default, base);
                    }
                }
            }
            Param::Array { span, elements } => {
                *span = rebase_span(*span, base);
                for element in elements {
                    element.span = rebase_span(element.span, base);
                    if let Some(default) = &mut element.default {
                        rebase_expr(default, base);
                    }
                }
            }
        }
    }
    for (_, default) in func.defaults.iter_mut() {
        rebase_expr(default, base);
    }
    rebase_block(&mut func.body, base);
}

fn rebase_expr(expr: &mut Expr, base: Position) {
    match expr {
        Expr::Int { span, .. }
        | Expr::Float { span, .. }
        | Expr::Bool { span, .. }
        | Expr::Nil { span }
        | Expr::Ident { span, .. } => *span = rebase_span(*span, base),
        Expr::Str { span, parts, .. } => {
            *span = rebase_span(*span, base);
            if let Some(parts) = parts {
                for part in parts {
                    match part {
                        StrPart::Lit { span, .. } => *span = rebase_span(*span, base),
                        StrPart::Expr { span, expr } => {
                            *span = rebase_span(*span, base);
                            rebase_expr(expr, base);
                        }
                    }
                }
            }
        }
        Expr::List { span, items } => {
            *span = rebase_span(*span, base);
            for item in items {
                rebase_expr(item, base);
            }
        }
        Expr::Map { span, items } => {
            *span = rebase_span(*span, base);
            for MapItem { span, key, value } in items {
                *span = rebase_span(*span, base);
                if let Some(key) = key {
                    rebase_expr(key, base);
                }
                rebase_expr(value, base);
            }
        }
        Expr::Spread { span, value } => {
            *span = rebase_span(*span, base);
            rebase_expr(value, base);
        }
        Expr::Prefix { span, operand, .. } | Expr::Postfix { span, operand, .. } => {
            *span = rebase_span(*span, base);
            rebase_expr(operand, base);
        }
        Expr::Infix {
            span, left, right, ..
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(left, base);
            rebase_expr(right, base);
        }
        Expr::Assign {
            span,
            target,
            value,
            ..
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(target, base);
            rebase_expr(value, base);
        }
        Expr::Ternary {
            span,
            cond,
            if_true,
            if_false,
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(cond, base);
            rebase_expr(if_true, base);
            rebase_expr(if_false, base);
        }
        Expr::If {
            span,
            cond,
            consequence,
            alternative,
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(cond, base);
            rebase_block(consequence, base);
            if let Some(alternative) = alternative {
                rebase_block(alternative, base);
            }
        }
        Expr::Switch {
            span,
            subject,
            cases,
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(subject, base);
            for SwitchCase { span, values, body } in cases {
                *span = rebase_span(*span, base);
                if let Some(values) = values {
                    for value in values {
                        rebase_expr(value, base);
                    }
                }
                for stmt in body {
                    rebase_stmt(stmt, base);
                }
            }
        }
        Expr::Match {
            span,
            subject,
            arms,
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(subject, base);
            for MatchArm {
                span,
                pattern,
                body,
            } in arms
            {
                *span = rebase_span(*span, base);
                if let Some(pattern) = pattern {
                    rebase_expr(pattern, base);
                }
                rebase_expr(body, base);
            }
        }
        Expr::Call { span, func, args } => {
            *span = rebase_span(*span, base);
            rebase_expr(func, base);
            for arg in args {
                rebase_expr(arg, base);
            }
        }
        Expr::ObjectCall {
            span, object, call, ..
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(object, base);
            rebase_expr(call, base);
        }
        Expr::GetAttr { span, object, .. } => {
            *span = rebase_span(*span, base);
            rebase_expr(object, base);
        }
        Expr::SetAttr {
            span,
            object,
            value,
            ..
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(object, base);
            rebase_expr(value, base);
        }
        Expr::Index {
            span,
            object,
            index,
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(object, base);
            rebase_expr(index, base);
        }
        Expr::Slice {
            span,
            object,
            low,
            high,
        } => {
            *span = rebase_span(*span, base);
            rebase_expr(object, base);
            if let Some(low) = low {
                rebase_expr(low, base);
            }
            if let Some(high) = high {
                rebase_expr(high, base);
            }
        }
        Expr::Pipe { span, stages } => {
            *span = rebase_span(*span, base);
            for stage in stages {
                rebase_expr(stage, base);
            }
        }
        Expr::In { span, left, right } | Expr::NotIn { span, left, right } => {
            *span = rebase_span(*span, base);
            rebase_expr(left, base);
            rebase_expr(right, base);
        }
        Expr::Func(func) => rebase_func(func, base),
    }
}
