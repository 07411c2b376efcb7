//! Structured error records for rendering and IDE integration.

use serde::{Deserialize, Serialize};

/// A fully resolved diagnostic, ready for the renderer or for export as
/// JSON. Line and column numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedError {
    /// Error code such as `"E1001"`, when a known category applies.
    pub code: Option<String>,
    /// Kind label: `"error"`, `"parse error"`, `"syntax error"`, ….
    pub kind: String,
    pub message: String,
    /// Empty when the source has no file name.
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Column of the last character covered; equal to `column` for a
    /// single-character (or unknown-width) range.
    pub end_column: u32,
    /// Source lines to show; the main line gets the caret underline.
    pub lines: Vec<SourceLine>,
    pub hint: Option<String>,
    pub note: Option<String>,
    pub trace: Vec<StackFrame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub number: u32,
    pub text: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub function: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl StackFrame {
    /// `file:line:col`, or `line:col` when the file name is empty.
    pub fn location(&self) -> String {
        if self.file.is_empty() {
            format!("{}:{}", self.line, self.column)
        } else {
            format!("{}:{}:{}", self.file, self.line, self.column)
        }
    }
}
