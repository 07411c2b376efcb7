//! Typed AST for Rill programs.
//!
//! The tree is a tagged sum: `Stmt` and `Expr` enums whose variants each
//! carry the span of source text they cover. Nodes are immutable once the
//! parser hands them out, and the tree contains no cycles, so a `Program`
//! can be shared freely across threads.
//!
//! `Display` renders a deterministic debug form — fully parenthesized
//! expressions, source-like statements. It is for inspection and tests,
//! not round-tripping.

use indexmap::IndexMap;

use crate::position::{Position, Span};
use crate::token::TokenKind;

/// A parsed source file: statements in source order plus the file name
/// they came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub filename: String,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn pos(&self) -> Position {
        self.statements.first().map_or(Position::ZERO, Stmt::pos)
    }

    pub fn end(&self) -> Position {
        self.statements.last().map_or(Position::ZERO, Stmt::end)
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name = value`
    Var {
        span: Span,
        name: String,
        value: Expr,
    },
    /// `let a, b = value`
    MultiVar {
        span: Span,
        names: Vec<String>,
        value: Expr,
    },
    /// `const name = value`
    Const {
        span: Span,
        name: String,
        value: Expr,
    },
    /// `target = value` and the compound forms, at statement level.
    Assign {
        span: Span,
        target: Expr,
        op: TokenKind,
        value: Expr,
    },
    /// `return` with an optional value.
    Return { span: Span, value: Option<Expr> },
    /// `throw value`
    Throw { span: Span, value: Expr },
    /// `try { … } catch err { … } finally { … }`; at least one of
    /// catch/finally is present.
    Try {
        span: Span,
        body: Block,
        catch_name: Option<String>,
        catch: Option<Block>,
        finally: Option<Block>,
    },
    /// `let {key, other: alias = default} = value`
    ObjectDestructure {
        span: Span,
        bindings: Vec<DestructureBinding>,
        value: Expr,
    },
    /// `let [a, b = default] = value`
    ArrayDestructure {
        span: Span,
        elements: Vec<DestructureElement>,
        value: Expr,
    },
    /// An expression in statement position.
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Var { span, .. }
            | Stmt::MultiVar { span, .. }
            | Stmt::Const { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Try { span, .. }
            | Stmt::ObjectDestructure { span, .. }
            | Stmt::ArrayDestructure { span, .. } => *span,
            Stmt::Expr(expr) => expr.span(),
        }
    }

    pub fn pos(&self) -> Position {
        self.span().start
    }

    pub fn end(&self) -> Position {
        self.span().end
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int {
        span: Span,
        value: i64,
    },
    Float {
        span: Span,
        value: f64,
    },
    Bool {
        span: Span,
        value: bool,
    },
    Nil {
        span: Span,
    },
    /// A string literal. `parts` is present only for template strings
    /// containing `${…}` interpolation; `value` holds the raw text.
    Str {
        span: Span,
        value: String,
        parts: Option<Vec<StrPart>>,
    },
    List {
        span: Span,
        items: Vec<Expr>,
    },
    Map {
        span: Span,
        items: Vec<MapItem>,
    },
    /// `...value` in a list, map, or call.
    Spread {
        span: Span,
        value: Box<Expr>,
    },
    Ident {
        span: Span,
        name: String,
    },
    /// `-x`, `!x`
    Prefix {
        span: Span,
        op: TokenKind,
        operand: Box<Expr>,
    },
    Infix {
        span: Span,
        op: TokenKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `x++`, `x--`; the operand is on the same line as the operator.
    Postfix {
        span: Span,
        op: TokenKind,
        operand: Box<Expr>,
    },
    /// Assignment in expression position. The statement driver promotes a
    /// top-level occurrence to [`Stmt::Assign`].
    Assign {
        span: Span,
        target: Box<Expr>,
        op: TokenKind,
        value: Box<Expr>,
    },
    /// `cond ? if_true : if_false`; never nested.
    Ternary {
        span: Span,
        cond: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
    If {
        span: Span,
        cond: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    /// `switch subject { case …: … default: … }`; at most one case has
    /// `values: None` (the default).
    Switch {
        span: Span,
        subject: Box<Expr>,
        cases: Vec<SwitchCase>,
    },
    /// `match subject { pattern => expr, …, _ => expr }`; exactly one arm
    /// has `pattern: None` (the wildcard).
    Match {
        span: Span,
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    Call {
        span: Span,
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.call(…)` / `object?.call(…)`; `call` is always a `Call`.
    ObjectCall {
        span: Span,
        object: Box<Expr>,
        call: Box<Expr>,
        optional: bool,
    },
    /// `object.name` / `object?.name`
    GetAttr {
        span: Span,
        object: Box<Expr>,
        name: String,
        optional: bool,
    },
    /// `object.name = value` and the compound forms.
    SetAttr {
        span: Span,
        object: Box<Expr>,
        name: String,
        op: TokenKind,
        value: Box<Expr>,
    },
    Index {
        span: Span,
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `object[low:high]`; either bound may be absent.
    Slice {
        span: Span,
        object: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },
    /// `a | b | c`; stages in order.
    Pipe {
        span: Span,
        stages: Vec<Expr>,
    },
    In {
        span: Span,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    NotIn {
        span: Span,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Func(FuncLit),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int { span, .. }
            | Expr::Float { span, .. }
            | Expr::Bool { span, .. }
            | Expr::Nil { span }
            | Expr::Str { span, .. }
            | Expr::List { span, .. }
            | Expr::Map { span, .. }
            | Expr::Spread { span, .. }
            | Expr::Ident { span, .. }
            | Expr::Prefix { span, .. }
            | Expr::Infix { span, .. }
            | Expr::Postfix { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::If { span, .. }
            | Expr::Switch { span, .. }
            | Expr::Match { span, .. }
            | Expr::Call { span, .. }
            | Expr::ObjectCall { span, .. }
            | Expr::GetAttr { span, .. }
            | Expr::SetAttr { span, .. }
            | Expr::Index { span, .. }
            | Expr::Slice { span, .. }
            | Expr::Pipe { span, .. }
            | Expr::In { span, .. }
            | Expr::NotIn { span, .. } => *span,
            Expr::Func(func) => func.span,
        }
    }

    pub fn pos(&self) -> Position {
        self.span().start
    }

    pub fn end(&self) -> Position {
        self.span().end
    }

    /// True for the node kinds that may be assigned to or stepped with
    /// `++`/`--`: identifiers, index expressions, attribute access.
    pub fn is_place(&self) -> bool {
        matches!(
            self,
            Expr::Ident { .. } | Expr::Index { .. } | Expr::GetAttr { .. }
        )
    }
}

/// `{ statements }` used as a body by functions, `if`, `try` and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub span: Span,
    pub statements: Vec<Stmt>,
}

/// One entry of a map literal. `key: None` marks a spread entry whose
/// `value` is the spread expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MapItem {
    pub span: Span,
    pub key: Option<Expr>,
    pub value: Expr,
}

/// A fragment of a template string, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum StrPart {
    Lit { span: Span, value: String },
    Expr { span: Span, expr: Expr },
}

/// One `case`/`default` entry of a switch. `values: None` marks the
/// default case.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub span: Span,
    pub values: Option<Vec<Expr>>,
    pub body: Vec<Stmt>,
}

/// One arm of a match. `pattern: None` marks the `_` wildcard arm.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub span: Span,
    pub pattern: Option<Expr>,
    pub body: Expr,
}

/// A function literal: named or anonymous `function`, or an arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub span: Span,
    pub name: Option<String>,
    pub params: Vec<Param>,
    /// Default values for simple identifier parameters, in declaration
    /// order. Defaults inside destructure patterns live on their bindings.
    pub defaults: IndexMap<String, Expr>,
    /// Trailing `...rest` parameter, if any.
    pub rest: Option<String>,
    pub body: Block,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Ident {
        span: Span,
        name: String,
    },
    Object {
        span: Span,
        bindings: Vec<DestructureBinding>,
    },
    Array {
        span: Span,
        elements: Vec<DestructureElement>,
    },
}

impl Param {
    pub fn span(&self) -> Span {
        match self {
            Param::Ident { span, .. } | Param::Object { span, .. } | Param::Array { span, .. } => {
                *span
            }
        }
    }
}

/// `key`, `key: alias`, `key = default`, `key: alias = default` inside an
/// object destructure pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructureBinding {
    pub span: Span,
    pub key: String,
    pub alias: Option<String>,
    pub default: Option<Expr>,
}

impl DestructureBinding {
    /// The name the binding introduces.
    pub fn name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.key)
    }
}

/// `name` or `name = default` inside an array destructure pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructureElement {
    pub span: Span,
    pub name: String,
    pub default: Option<Expr>,
}

// ---------------------------------------------------------------------------
// Debug form

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Var { name, value, .. } => write!(f, "let {name} = {value}"),
            Stmt::MultiVar { names, value, .. } => {
                write!(f, "let {} = {value}", names.join(", "))
            }
            Stmt::Const { name, value, .. } => write!(f, "const {name} = {value}"),
            Stmt::Assign {
                target, op, value, ..
            } => write!(f, "{target} {op} {value}"),
            Stmt::Return { value: None, .. } => write!(f, "return"),
            Stmt::Return {
                value: Some(value), ..
            } => write!(f, "return {value}"),
            Stmt::Throw { value, .. } => write!(f, "throw {value}"),
            Stmt::Try {
                body,
                catch_name,
                catch,
                finally,
                ..
            } => {
                write!(f, "try {body}")?;
                if let Some(catch) = catch {
                    match catch_name {
                        Some(name) => write!(f, " catch {name} {catch}")?,
                        None => write!(f, " catch {catch}")?,
                    }
                }
                if let Some(finally) = finally {
                    write!(f, " finally {finally}")?;
                }
                Ok(())
            }
            Stmt::ObjectDestructure {
                bindings, value, ..
            } => {
                write!(f, "let {{")?;
                write_joined(f, bindings, ", ")?;
                write!(f, "}} = {value}")
            }
            Stmt::ArrayDestructure {
                elements, value, ..
            } => {
                write!(f, "let [")?;
                write_joined(f, elements, ", ")?;
                write!(f, "] = {value}")
            }
            Stmt::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Int { value, .. } => write!(f, "{value}"),
            Expr::Float { value, .. } => write!(f, "{value}"),
            Expr::Bool { value, .. } => write!(f, "{value}"),
            Expr::Nil { .. } => write!(f, "nil"),
            Expr::Str {
                value, parts: None, ..
            } => write!(f, "{value:?}"),
            Expr::Str {
                value,
                parts: Some(_),
                ..
            } => write!(f, "`{value}`"),
            Expr::List { items, .. } => {
                write!(f, "[")?;
                write_joined(f, items, ", ")?;
                write!(f, "]")
            }
            Expr::Map { items, .. } => {
                write!(f, "{{")?;
                write_joined(f, items, ", ")?;
                write!(f, "}}")
            }
            Expr::Spread { value, .. } => write!(f, "...{value}"),
            Expr::Ident { name, .. } => write!(f, "{name}"),
            Expr::Prefix { op, operand, .. } => write!(f, "({op}{operand})"),
            Expr::Infix {
                op, left, right, ..
            } => write!(f, "({left} {op} {right})"),
            Expr::Postfix { op, operand, .. } => write!(f, "({operand}{op})"),
            Expr::Assign {
                target, op, value, ..
            } => write!(f, "{target} {op} {value}"),
            Expr::Ternary {
                cond,
                if_true,
                if_false,
                ..
            } => write!(f, "({cond} ? {if_true} : {if_false})"),
            Expr::If {
                cond,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {cond} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Expr::Switch { subject, cases, .. } => {
                write!(f, "switch {subject} {{ ")?;
                write_joined(f, cases, " ")?;
                write!(f, " }}")
            }
            Expr::Match { subject, arms, .. } => {
                write!(f, "match {subject} {{ ")?;
                write_joined(f, arms, ", ")?;
                write!(f, " }}")
            }
            Expr::Call { func, args, .. } => {
                write!(f, "{func}(")?;
                write_joined(f, args, ", ")?;
                write!(f, ")")
            }
            Expr::ObjectCall {
                object,
                call,
                optional,
                ..
            } => write!(f, "{object}{}{call}", if *optional { "?." } else { "." }),
            Expr::GetAttr {
                object,
                name,
                optional,
                ..
            } => write!(f, "{object}{}{name}", if *optional { "?." } else { "." }),
            Expr::SetAttr {
                object,
                name,
                op,
                value,
                ..
            } => write!(f, "{object}.{name} {op} {value}"),
            Expr::Index { object, index, .. } => write!(f, "{object}[{index}]"),
            Expr::Slice {
                object, low, high, ..
            } => {
                write!(f, "{object}[")?;
                if let Some(low) = low {
                    write!(f, "{low}")?;
                }
                write!(f, ":")?;
                if let Some(high) = high {
                    write!(f, "{high}")?;
                }
                write!(f, "]")
            }
            Expr::Pipe { stages, .. } => {
                write!(f, "(")?;
                write_joined(f, stages, " | ")?;
                write!(f, ")")
            }
            Expr::In { left, right, .. } => write!(f, "({left} in {right})"),
            Expr::NotIn { left, right, .. } => write!(f, "({left} not in {right})"),
            Expr::Func(func) => write!(f, "{func}"),
        }
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        write_joined(f, &self.statements, "; ")?;
        write!(f, " }}")
    }
}

impl std::fmt::Display for MapItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{key}: {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl std::fmt::Display for SwitchCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.values {
            Some(values) => {
                write!(f, "case ")?;
                write_joined(f, values, ", ")?;
            }
            None => write!(f, "default")?,
        }
        write!(f, ":")?;
        for stmt in &self.body {
            write!(f, " {stmt};")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for MatchArm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pattern {
            Some(pattern) => write!(f, "{pattern} => {}", self.body),
            None => write!(f, "_ => {}", self.body),
        }
    }
}

impl std::fmt::Display for FuncLit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "function {name}(")?,
            None => write!(f, "function(")?,
        }
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match param {
                Param::Ident { name, .. } => {
                    write!(f, "{name}")?;
                    if let Some(default) = self.defaults.get(name) {
                        write!(f, " = {default}")?;
                    }
                }
                Param::Object { bindings, .. } => {
                    write!(f, "{{")?;
                    write_joined(f, bindings, ", ")?;
                    write!(f, "}}")?;
                }
                Param::Array { elements, .. } => {
                    write!(f, "[")?;
                    write_joined(f, elements, ", ")?;
                    write!(f, "]")?;
                }
            }
        }
        if let Some(rest) = &self.rest {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...{rest}")?;
        }
        write!(f, ") {}", self.body)
    }
}

impl std::fmt::Display for DestructureBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(alias) = &self.alias {
            write!(f, ": {alias}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for DestructureElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

fn write_joined<T: std::fmt::Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
