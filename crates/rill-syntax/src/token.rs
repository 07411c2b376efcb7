//! Token kinds and the token model.
//!
//! `TokenKind` is the closed set of lexemes in the language. Logos derives
//! recognition for everything with a `#[token]`/`#[regex]` attribute; the
//! remaining variants (`Eof`, `Illegal`) are synthesized by the lexer.
//! Newlines are real tokens — the parser decides whether each one
//! terminates a statement.

use logos::Logos;

use crate::position::Span;

/// All token kinds. Whitespace and comments are skipped by the lexer and
/// never reach the parser.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip(r"#[^\n]*", allow_greedy = true))]
pub enum TokenKind {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("**")]
    Power,

    #[token("&")]
    Amp,

    #[token("<<")]
    Shl,

    #[token(">>")]
    Shr,

    #[token("==")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("!")]
    Bang,

    #[token("=")]
    Assign,

    #[token("+=")]
    PlusAssign,

    #[token("-=")]
    MinusAssign,

    #[token("*=")]
    StarAssign,

    #[token("/=")]
    SlashAssign,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("|")]
    Pipe,

    #[token("|>")]
    PipeArrow,

    #[token("??")]
    Nullish,

    #[token("?")]
    Question,

    #[token("?.")]
    QuestionDot,

    #[token("...")]
    Ellipsis,

    #[token("=>")]
    Arrow,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[token("let")]
    Let,

    #[token("const")]
    Const,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("switch")]
    Switch,

    #[token("case")]
    Case,

    #[token("default")]
    Default,

    #[token("function")]
    Function,

    #[token("return")]
    Return,

    #[token("throw")]
    Throw,

    #[token("try")]
    Try,

    #[token("catch")]
    Catch,

    #[token("finally")]
    Finally,

    #[token("in")]
    In,

    #[token("not")]
    Not,

    #[token("match")]
    Match,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("nil")]
    Nil,

    /// Decimal, hex, octal (`0o…` or legacy leading zero), or binary.
    #[regex("[0-9]+")]
    #[regex("0[xX][0-9a-fA-F]+")]
    #[regex("0[oO][0-7]+")]
    #[regex("0[bB][01]+")]
    Int,

    /// Both integer and fractional digits are required.
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    /// Single- or double-quoted; may not span lines.
    #[regex(r#""(?:[^"\\\n]|\\[^\n])*""#)]
    #[regex(r"'(?:[^'\\\n]|\\[^\n])*'")]
    Str,

    /// Backtick-quoted; may span lines and contain `${…}` fragments.
    #[regex(r"`[^`]*`")]
    TemplateStr,

    /// Defined after the keywords so they take precedence.
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// End of input; the lexer repeats it forever.
    Eof,

    /// Coalesced unrecognized characters.
    Illegal,
}

impl TokenKind {
    /// Human-readable label used in diagnostics.
    pub fn token_type(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Str => "string",
            TokenKind::TemplateStr => "template string",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of file",
            TokenKind::Illegal => "illegal character",
            other => other.symbol(),
        }
    }

    /// Canonical spelling for fixed tokens; class label for the rest.
    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Power => "**",
            TokenKind::Amp => "&",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Bang => "!",
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Pipe => "|",
            TokenKind::PipeArrow => "|>",
            TokenKind::Nullish => "??",
            TokenKind::Question => "?",
            TokenKind::QuestionDot => "?.",
            TokenKind::Ellipsis => "...",
            TokenKind::Arrow => "=>",
            TokenKind::Newline => "\\n",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::In => "in",
            TokenKind::Not => "not",
            TokenKind::Match => "match",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Str => "string",
            TokenKind::TemplateStr => "template string",
            TokenKind::Eof => "end of file",
            TokenKind::Illegal => "illegal character",
        }
    }

    /// True for `=`, `+=`, `-=`, `*=`, `/=`.
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A lexed token: kind, exact source text, and the span it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    /// A zero-width synthesized token (EOF, or a placeholder before priming).
    pub fn synthetic(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            literal: String::new(),
            span,
        }
    }
}
