//! Lexer for Rill source text.
//!
//! The whole input is tokenized up front via logos and served from a
//! cursor, which makes `save_state`/`restore_state` an O(1) checkpoint —
//! the only rollback the parser ever performs. Byte ranges are converted
//! to line/column positions through a line-start table computed once.
//!
//! ## Error handling
//!
//! Consecutive unrecognized characters coalesce into a single error rather
//! than one per character, keeping the stream manageable for malformed
//! input. A quote character that logos could not match as a string token
//! marks an unterminated literal: the error covers the rest of the line
//! (or the rest of the file for a backtick template) and lexing resumes
//! after it.

use logos::Logos;

use crate::position::{Position, Span};
use crate::token::{Token, TokenKind};

/// A lexical error. The parser promotes these to syntax-error diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Cursor checkpoint returned by [`Lexer::save_state`].
#[derive(Debug, Clone, Copy)]
pub struct LexerState {
    cursor: usize,
}

pub struct Lexer<'src> {
    source: &'src str,
    filename: String,
    entries: Vec<Result<Token, LexError>>,
    line_starts: Vec<u32>,
    cursor: usize,
    eof: Token,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_filename(source, "")
    }

    pub fn with_filename(source: &'src str, filename: impl Into<String>) -> Self {
        let line_starts = line_starts(source);
        let entries = tokenize(source, &line_starts);
        let eof_pos = pos_at(source, &line_starts, source.len());
        Self {
            source,
            filename: filename.into(),
            entries,
            line_starts,
            cursor: 0,
            eof: Token::synthetic(TokenKind::Eof, Span::new(eof_pos, eof_pos)),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Next token, or the lexical error occupying that slot. Once the input
    /// is exhausted the terminal EOF token repeats forever.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.entries.get(self.cursor) {
            Some(entry) => {
                self.cursor += 1;
                entry.clone()
            }
            None => Ok(self.eof.clone()),
        }
    }

    /// The full source line containing the token's start, without the
    /// trailing line break.
    pub fn line_text(&self, token: &Token) -> &str {
        self.line_text_at(token.span.start.line)
    }

    /// The full source line with the given 1-based number.
    pub fn line_text_at(&self, line: u32) -> &str {
        if line == 0 || line as usize > self.line_starts.len() {
            return "";
        }
        let start = self.line_starts[line as usize - 1] as usize;
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(self.source.len(), |&next| next as usize);
        self.source[start..end].trim_end_matches(['\n', '\r'])
    }

    pub fn save_state(&self) -> LexerState {
        LexerState {
            cursor: self.cursor,
        }
    }

    pub fn restore_state(&mut self, state: LexerState) {
        self.cursor = state.cursor;
    }
}

fn line_starts(source: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i as u32 + 1);
        }
    }
    starts
}

fn pos_at(source: &str, line_starts: &[u32], offset: usize) -> Position {
    let line_idx = match line_starts.binary_search(&(offset as u32)) {
        Ok(i) => i,
        Err(i) => i - 1,
    };
    let line_start = line_starts[line_idx] as usize;
    let column = source[line_start..offset].chars().count() as u32 + 1;
    Position::new(line_idx as u32 + 1, column, offset as u32)
}

/// Span over `range`, with an inclusive end position (last character).
fn span_of(source: &str, line_starts: &[u32], range: std::ops::Range<usize>) -> Span {
    let start = pos_at(source, line_starts, range.start);
    let last = source[range.clone()]
        .char_indices()
        .last()
        .map_or(range.start, |(i, _)| range.start + i);
    Span::new(start, pos_at(source, line_starts, last))
}

fn tokenize(source: &str, line_starts: &[u32]) -> Vec<Result<Token, LexError>> {
    let mut entries = Vec::new();
    let mut base = 0usize;

    'restart: while base < source.len() {
        let mut lexer = TokenKind::lexer(&source[base..]);
        let mut garbage: Option<std::ops::Range<usize>> = None;

        while let Some(result) = lexer.next() {
            let rel = lexer.span();
            let range = base + rel.start..base + rel.end;

            match result {
                Ok(kind) => {
                    flush_garbage(source, line_starts, &mut garbage, &mut entries);
                    entries.push(Ok(Token::new(
                        kind,
                        &source[range.clone()],
                        span_of(source, line_starts, range),
                    )));
                }
                Err(()) => {
                    let first = source[range.start..].chars().next().unwrap_or('\0');
                    match first {
                        '"' | '\'' => {
                            flush_garbage(source, line_starts, &mut garbage, &mut entries);
                            let end = source[range.start..]
                                .find('\n')
                                .map_or(source.len(), |i| range.start + i);
                            entries.push(Err(LexError {
                                message: "unterminated string literal".into(),
                                span: span_of(source, line_starts, range.start..end),
                            }));
                            base = end;
                            continue 'restart;
                        }
                        '`' => {
                            flush_garbage(source, line_starts, &mut garbage, &mut entries);
                            entries.push(Err(LexError {
                                message: "unterminated template literal".into(),
                                span: span_of(source, line_starts, range.start..source.len()),
                            }));
                            return entries;
                        }
                        _ => match &mut garbage {
                            Some(run) if run.end == range.start => run.end = range.end,
                            _ => {
                                flush_garbage(source, line_starts, &mut garbage, &mut entries);
                                garbage = Some(range);
                            }
                        },
                    }
                }
            }
        }

        flush_garbage(source, line_starts, &mut garbage, &mut entries);
        break;
    }

    entries
}

fn flush_garbage(
    source: &str,
    line_starts: &[u32],
    garbage: &mut Option<std::ops::Range<usize>>,
    entries: &mut Vec<Result<Token, LexError>>,
) {
    if let Some(range) = garbage.take() {
        let first = source[range.start..].chars().next().unwrap_or('\0');
        entries.push(Err(LexError {
            message: format!("unexpected character '{}'", first.escape_default()),
            span: span_of(source, line_starts, range),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            match lexer.next_token() {
                Ok(tok) if tok.kind == TokenKind::Eof => break,
                Ok(tok) => out.push(tok.kind),
                Err(_) => out.push(TokenKind::Illegal),
            }
        }
        out
    }

    #[test]
    fn operators_prefer_longest_match() {
        use TokenKind::*;
        assert_eq!(kinds("a ** b |> c ?? d ?. e"), vec![
            Ident, Power, Ident, PipeArrow, Ident, Nullish, Ident, QuestionDot, Ident,
        ]);
        assert_eq!(kinds("x += 1"), vec![Ident, PlusAssign, Int]);
        assert_eq!(kinds("i++"), vec![Ident, PlusPlus]);
        assert_eq!(kinds("...rest"), vec![Ellipsis, Ident]);
    }

    #[test]
    fn keywords_are_not_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("let letter in inner"), vec![Let, Ident, In, Ident]);
        assert_eq!(kinds("not nil true false"), vec![Not, Nil, True, False]);
    }

    #[test]
    fn number_literal_forms() {
        use TokenKind::*;
        assert_eq!(kinds("42 0xFF 0o755 0b101 077 3.14"), vec![
            Int, Int, Int, Int, Int, Float
        ]);
        // `1.` is not a float
        assert_eq!(kinds("1.foo"), vec![Int, Dot, Ident]);
    }

    #[test]
    fn newlines_are_tokens_and_comments_are_not() {
        use TokenKind::*;
        assert_eq!(kinds("a // trailing\nb # another\nc"), vec![
            Ident, Newline, Ident, Newline, Ident
        ]);
    }

    #[test]
    fn positions_are_one_based_and_inclusive() {
        let mut lexer = Lexer::new("let x\ny");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.span.start, Position::new(1, 1, 0));
        assert_eq!(tok.span.end, Position::new(1, 3, 2));
        let x = lexer.next_token().unwrap();
        assert_eq!(x.span.start, Position::new(1, 5, 4));
        lexer.next_token().unwrap(); // newline
        let y = lexer.next_token().unwrap();
        assert_eq!(y.span.start, Position::new(2, 1, 6));
        assert_eq!(lexer.line_text(&y), "y");
    }

    #[test]
    fn unterminated_string_covers_rest_of_line() {
        let mut lexer = Lexer::new("let s = \"abc\nlet t = 1");
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.span.start.column, 9);
        // lexing resumes on the next line
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Newline);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Let);
    }

    #[test]
    fn garbage_runs_coalesce() {
        let mut lexer = Lexer::new("a @@@ b");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.message, "unexpected character '@'");
        assert_eq!(err.span.start.column, 3);
        assert_eq!(err.span.end.column, 5);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
    }

    #[test]
    fn save_and_restore_rewind_the_cursor() {
        let mut lexer = Lexer::new("a b c");
        lexer.next_token().unwrap();
        let state = lexer.save_state();
        assert_eq!(lexer.next_token().unwrap().literal, "b");
        assert_eq!(lexer.next_token().unwrap().literal, "c");
        lexer.restore_state(state);
        assert_eq!(lexer.next_token().unwrap().literal, "b");
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}
