//! Syntax-policy validation.
//!
//! A post-parse walk that rejects occurrences of disallowed constructs.
//! The walk is pure: it never mutates the AST, always completes, and
//! reports every violation in source order, so running it twice yields
//! identical results.

use crate::ast::{Block, Expr, MapItem, MatchArm, Param, Program, Stmt, StrPart, SwitchCase};
use crate::position::Span;

/// Boolean feature switches; `false` (default) allows the construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxConfig {
    pub disallow_variable_decl: bool,
    pub disallow_assignment: bool,
    pub disallow_return: bool,
    pub disallow_func_def: bool,
    pub disallow_func_call: bool,
    pub disallow_try_catch: bool,
    pub disallow_if: bool,
    pub disallow_switch: bool,
    pub disallow_destructure: bool,
    pub disallow_spread: bool,
    pub disallow_pipe: bool,
    pub disallow_templates: bool,
}

impl SyntaxConfig {
    /// Everything allowed; same as `Default`.
    pub fn full_language() -> Self {
        Self::default()
    }

    /// Scripting without user-defined functions.
    pub fn basic_scripting() -> Self {
        Self {
            disallow_func_def: true,
            disallow_return: true,
            ..Self::default()
        }
    }

    /// Pure expressions: no declarations, mutation, or control statements.
    pub fn expression_only() -> Self {
        Self {
            disallow_variable_decl: true,
            disallow_assignment: true,
            disallow_return: true,
            disallow_func_def: true,
            disallow_try_catch: true,
            disallow_if: true,
            disallow_destructure: true,
            disallow_spread: true,
            disallow_pipe: true,
            ..Self::default()
        }
    }
}

/// The construct a [`ValidationError`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxFeature {
    VariableDecl,
    Assignment,
    Return,
    FuncDef,
    FuncCall,
    TryCatch,
    If,
    Switch,
    Destructure,
    Spread,
    Pipe,
    Template,
}

impl SyntaxFeature {
    pub fn message(self) -> &'static str {
        match self {
            SyntaxFeature::VariableDecl => "variable declarations are not allowed",
            SyntaxFeature::Assignment => "assignments are not allowed",
            SyntaxFeature::Return => "return statements are not allowed",
            SyntaxFeature::FuncDef => "function definitions are not allowed",
            SyntaxFeature::FuncCall => "function calls are not allowed",
            SyntaxFeature::TryCatch => "try/catch blocks are not allowed",
            SyntaxFeature::If => "if expressions are not allowed",
            SyntaxFeature::Switch => "switch statements are not allowed",
            SyntaxFeature::Destructure => "destructuring is not allowed",
            SyntaxFeature::Spread => "spread expressions are not allowed",
            SyntaxFeature::Pipe => "pipe expressions are not allowed",
            SyntaxFeature::Template => "template strings with interpolation are not allowed",
        }
    }
}

/// One disallowed construct, at the span of the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub feature: SyntaxFeature,
    pub message: String,
    pub span: Span,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.span.start)
    }
}

impl std::error::Error for ValidationError {}

/// Collect every violation of `config` in `program`.
pub fn validate(program: &Program, config: &SyntaxConfig) -> Vec<ValidationError> {
    let mut walker = Walker {
        config: *config,
        errors: Vec::new(),
    };
    for stmt in &program.statements {
        walker.stmt(stmt);
    }
    walker.errors
}

struct Walker {
    config: SyntaxConfig,
    errors: Vec<ValidationError>,
}

impl Walker {
    fn reject(&mut self, disallowed: bool, feature: SyntaxFeature, span: Span) {
        if disallowed {
            self.errors.push(ValidationError {
                feature,
                message: feature.message().to_string(),
                span,
            });
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var { span, value, .. }
            | Stmt::MultiVar { span, value, .. }
            | Stmt::Const { span, value, .. } => {
                self.reject(
                    self.config.disallow_variable_decl,
                    SyntaxFeature::VariableDecl,
                    *span,
                );
                self.expr(value);
            }
            Stmt::Assign {
                span,
                target,
                value,
                ..
            } => {
                self.reject(
                    self.config.disallow_assignment,
                    SyntaxFeature::Assignment,
                    *span,
                );
                self.expr(target);
                self.expr(value);
            }
            Stmt::Return { span, value } => {
                self.reject(self.config.disallow_return, SyntaxFeature::Return, *span);
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            Stmt::Throw { span, value } => {
                self.reject(
                    self.config.disallow_try_catch,
                    SyntaxFeature::TryCatch,
                    *span,
                );
                self.expr(value);
            }
            Stmt::Try {
                span,
                body,
                catch,
                finally,
                ..
            } => {
                self.reject(
                    self.config.disallow_try_catch,
                    SyntaxFeature::TryCatch,
                    *span,
                );
                self.block(body);
                if let Some(catch) = catch {
                    self.block(catch);
                }
                if let Some(finally) = finally {
                    self.block(finally);
                }
            }
            Stmt::ObjectDestructure {
                span,
                bindings,
                value,
            } => {
                self.reject(
                    self.config.disallow_variable_decl,
                    SyntaxFeature::VariableDecl,
                    *span,
                );
                self.reject(
                    self.config.disallow_destructure,
                    SyntaxFeature::Destructure,
                    *span,
                );
                for binding in bindings {
                    if let Some(default) = &binding.default {
                        self.expr(default);
                    }
                }
                self.expr(value);
            }
            Stmt::ArrayDestructure {
                span,
                elements,
                value,
            } => {
                self.reject(
                    self.config.disallow_variable_decl,
                    SyntaxFeature::VariableDecl,
                    *span,
                );
                self.reject(
                    self.config.disallow_destructure,
                    SyntaxFeature::Destructure,
                    *span,
                );
                for element in elements {
                    if let Some(default) = &element.default {
                        self.expr(default);
                    }
                }
                self.expr(value);
            }
            Stmt::Expr(expr) => self.expr(expr),
        }
    }

    fn block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.stmt(stmt);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Int { .. }
            | Expr::Float { .. }
            | Expr::Bool { .. }
            | Expr::Nil { .. }
            | Expr::Ident { .. } => {}
            Expr::Str { span, parts, .. } => {
                if let Some(parts) = parts {
                    self.reject(self.config.disallow_templates, SyntaxFeature::Template, *span);
                    for part in parts {
                        if let StrPart::Expr { expr, .. } = part {
                            self.expr(expr);
                        }
                    }
                }
            }
            Expr::List { items, .. } => {
                for item in items {
                    self.expr(item);
                }
            }
            Expr::Map { items, .. } => {
                for MapItem { key, value, .. } in items {
                    if let Some(key) = key {
                        self.expr(key);
                    }
                    self.expr(value);
                }
            }
            Expr::Spread { span, value } => {
                self.reject(self.config.disallow_spread, SyntaxFeature::Spread, *span);
                self.expr(value);
            }
            Expr::Prefix { operand, .. } => self.expr(operand),
            Expr::Infix { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Postfix { span, operand, .. } => {
                // ++/-- mutate their operand
                self.reject(
                    self.config.disallow_assignment,
                    SyntaxFeature::Assignment,
                    *span,
                );
                self.expr(operand);
            }
            Expr::Assign {
                span,
                target,
                value,
                ..
            } => {
                self.reject(
                    self.config.disallow_assignment,
                    SyntaxFeature::Assignment,
                    *span,
                );
                self.expr(target);
                self.expr(value);
            }
            Expr::Ternary {
                cond,
                if_true,
                if_false,
                ..
            } => {
                self.expr(cond);
                self.expr(if_true);
                self.expr(if_false);
            }
            Expr::If {
                span,
                cond,
                consequence,
                alternative,
            } => {
                self.reject(self.config.disallow_if, SyntaxFeature::If, *span);
                self.expr(cond);
                self.block(consequence);
                if let Some(alternative) = alternative {
                    self.block(alternative);
                }
            }
            Expr::Switch {
                span,
                subject,
                cases,
            } => {
                self.reject(self.config.disallow_switch, SyntaxFeature::Switch, *span);
                self.expr(subject);
                for SwitchCase { values, body, .. } in cases {
                    if let Some(values) = values {
                        for value in values {
                            self.expr(value);
                        }
                    }
                    for stmt in body {
                        self.stmt(stmt);
                    }
                }
            }
            Expr::Match { subject, arms, .. } => {
                self.expr(subject);
                for MatchArm { pattern, body, .. } in arms {
                    if let Some(pattern) = pattern {
                        self.expr(pattern);
                    }
                    self.expr(body);
                }
            }
            Expr::Call { span, func, args } => {
                self.reject(self.config.disallow_func_call, SyntaxFeature::FuncCall, *span);
                self.expr(func);
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::ObjectCall {
                span, object, call, ..
            } => {
                self.reject(self.config.disallow_func_call, SyntaxFeature::FuncCall, *span);
                self.expr(object);
                // the inner call node is this same method call; only its
                // pieces are walked so it is not reported twice
                if let Expr::Call { func, args, .. } = call.as_ref() {
                    self.expr(func);
                    for arg in args {
                        self.expr(arg);
                    }
                } else {
                    self.expr(call);
                }
            }
            Expr::GetAttr { object, .. } => self.expr(object),
            Expr::SetAttr {
                span,
                object,
                value,
                ..
            } => {
                self.reject(
                    self.config.disallow_assignment,
                    SyntaxFeature::Assignment,
                    *span,
                );
                self.expr(object);
                self.expr(value);
            }
            Expr::Index { object, index, .. } => {
                self.expr(object);
                self.expr(index);
            }
            Expr::Slice {
                object, low, high, ..
            } => {
                self.expr(object);
                if let Some(low) = low {
                    self.expr(low);
                }
                if let Some(high) = high {
                    self.expr(high);
                }
            }
            Expr::Pipe { span, stages } => {
                self.reject(self.config.disallow_pipe, SyntaxFeature::Pipe, *span);
                for stage in stages {
                    self.expr(stage);
                }
            }
            Expr::In { left, right, .. } | Expr::NotIn { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Func(func) => {
                self.reject(self.config.disallow_func_def, SyntaxFeature::FuncDef, func.span);
                for param in &func.params {
                    match param {
                        Param::Ident { .. } => {}
                        Param::Object { span, bindings } => {
                            self.reject(
                                self.config.disallow_destructure,
                                SyntaxFeature::Destructure,
                                *span,
                            );
                            for binding in bindings {
                                if let Some(default) = &binding.default {
                                    self.expr(default);
                                }
                            }
                        }
                        Param::Array { span, elements } => {
                            self.reject(
                                self.config.disallow_destructure,
                                SyntaxFeature::Destructure,
                                *span,
                            );
                            for element in elements {
                                if let Some(default) = &element.default {
                                    self.expr(default);
                                }
                            }
                        }
                    }
                }
                for (_, default) in &func.defaults {
                    self.expr(default);
                }
                self.block(&func.body);
            }
        }
    }
}
