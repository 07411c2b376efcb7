//! Diagnostics: error records, the bounded aggregate, rendering, and the
//! suggestion engine.
//!
//! The parser produces [`ParseError`]s collected into an [`ErrorList`].
//! Both satisfy `std::error::Error`; the list's `Display` is the compact
//! one-line form, and [`ErrorList::to_formatted`] converts to
//! [`FormattedError`] records for the renderer and IDE integration.

mod codes;
mod formatted;
mod printer;
mod suggest;


pub use codes::ErrorCode;
pub use formatted::{FormattedError, SourceLine, StackFrame};
pub use printer::Formatter;
pub use suggest::{MAX_SUGGESTIONS, Suggestion, format_suggestions, levenshtein, suggest_similar};

use crate::position::Span;

/// What stage or class of failure a diagnostic belongs to. The label is
/// part of the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKind {
    #[default]
    Error,
    ParseError,
    SyntaxError,
    ContextError,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Error => "error",
            ErrorKind::ParseError => "parse error",
            ErrorKind::SyntaxError => "syntax error",
            ErrorKind::ContextError => "context error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single diagnostic with its source location and the text of the line
/// it points into.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub filename: String,
    pub span: Span,
    pub line_text: String,
    pub hint: Option<String>,
}

impl ParseError {
    /// Location as `file:line:col`, omitting the file when unnamed and the
    /// whole location when the span is unknown.
    pub fn location(&self) -> Option<String> {
        if self.span.start.is_zero() {
            return None;
        }
        if self.filename.is_empty() {
            Some(self.span.start.to_string())
        } else {
            Some(format!("{}:{}", self.filename, self.span.start))
        }
    }

    pub fn to_formatted(&self) -> FormattedError {
        let start = self.span.start;
        let end = self.span.end;
        let end_column = if end.line == start.line && end.column > start.column {
            end.column
        } else {
            start.column
        };
        let lines = if start.line > 0 {
            vec![SourceLine {
                number: start.line,
                text: self.line_text.clone(),
                is_main: true,
            }]
        } else {
            Vec::new()
        };
        FormattedError {
            code: self.code.map(|c| c.code().to_string()),
            kind: self.kind.label().to_string(),
            message: self.message.clone(),
            file: self.filename.clone(),
            line: start.line,
            column: start.column,
            end_column,
            lines,
            hint: self.hint.clone(),
            note: None,
            trace: Vec::new(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(location) = self.location() {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Ordered collection of diagnostics from one parse. Never empty when
/// returned as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList {
    errors: Vec<ParseError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    pub fn to_formatted(&self) -> Vec<FormattedError> {
        self.errors.iter().map(ParseError::to_formatted).collect()
    }
}

impl std::fmt::Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [single] => write!(f, "{single}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more errors)", rest.len()),
        }
    }
}

impl std::error::Error for ErrorList {}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
