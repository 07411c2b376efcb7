//! Renderer for [`FormattedError`] records.
//!
//! Layout follows the familiar terminal style: header, `-->` location,
//! gutter with line numbers padded to the widest number shown, caret
//! underline on the main line, then optional `= hint:` / `= note:` lines
//! and a stack-trace tail. Colour is 16-colour SGR and entirely off when
//! `use_color` is false — no escape sequence is ever emitted then.

use super::formatted::FormattedError;

const RED: &str = "1;31";
const BLUE: &str = "1;34";
const CYAN: &str = "1;36";
const BOLD: &str = "1";

pub struct Formatter {
    use_color: bool,
}

impl Formatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Render one diagnostic. The result ends with a newline.
    pub fn format(&self, err: &FormattedError) -> String {
        self.format_with_prefix(err, "")
    }

    /// Render several diagnostics: `[i/total]` prefixes on each header and
    /// a `found N errors` footer. A single diagnostic renders bare.
    pub fn format_multiple(&self, errors: &[FormattedError]) -> String {
        match errors {
            [] => String::new(),
            [one] => self.format(one),
            many => {
                let total = many.len();
                let mut out = String::new();
                for (i, err) in many.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    let prefix = format!("[{}/{}] ", i + 1, total);
                    out.push_str(&self.format_with_prefix(err, &prefix));
                }
                out.push('\n');
                out.push_str(&format!("found {total} errors\n"));
                out
            }
        }
    }

    fn format_with_prefix(&self, err: &FormattedError, prefix: &str) -> String {
        let width = err
            .lines
            .iter()
            .map(|l| l.number.to_string().len())
            .max()
            .unwrap_or(1);
        let pad = " ".repeat(width);
        let pipe = self.paint("|", BLUE);

        let mut out = String::new();

        // header
        let head = match &err.code {
            Some(code) => format!("{}[{}]", err.kind, code),
            None => err.kind.clone(),
        };
        out.push_str(prefix);
        out.push_str(&self.paint(&head, RED));
        out.push_str(": ");
        out.push_str(&self.paint(&err.message, BOLD));
        out.push('\n');

        // location
        if err.line > 0 {
            let location = if err.file.is_empty() {
                format!("{}:{}", err.line, err.column)
            } else {
                format!("{}:{}:{}", err.file, err.line, err.column)
            };
            out.push_str(&format!("{pad}{} {location}\n", self.paint("-->", BLUE)));
        }

        // source lines with caret underline on the main line
        if !err.lines.is_empty() {
            out.push_str(&format!("{pad} {pipe}\n"));
            for line in &err.lines {
                let number = self.paint(&format!("{:>width$}", line.number), BLUE);
                out.push_str(&format!("{number} {pipe} {}\n", line.text));
                if line.is_main && err.column > 0 {
                    let carets = if err.end_column > err.column {
                        (err.end_column - err.column + 1) as usize
                    } else {
                        1
                    };
                    let indent = " ".repeat((err.column - 1) as usize);
                    out.push_str(&format!(
                        "{pad} {pipe} {indent}{}\n",
                        self.paint(&"^".repeat(carets), RED)
                    ));
                }
            }
        }

        // hint and note
        if err.hint.is_some() || err.note.is_some() {
            out.push_str(&format!("{pad} {pipe}\n"));
            if let Some(hint) = &err.hint {
                out.push_str(&format!("{pad} = {} {hint}\n", self.paint("hint:", CYAN)));
            }
            if let Some(note) = &err.note {
                out.push_str(&format!("{pad} = {} {note}\n", self.paint("note:", CYAN)));
            }
        }

        // stack trace
        if !err.trace.is_empty() {
            out.push_str(&format!("{pad} {pipe}\n"));
            out.push_str(&format!(
                "{pad} = {}\n",
                self.paint("stack trace:", CYAN)
            ));
            for frame in &err.trace {
                out.push_str(&format!(
                    "{pad}     at {} ({})\n",
                    frame.function,
                    frame.location()
                ));
            }
        }

        out
    }

    fn paint(&self, text: &str, style: &str) -> String {
        if self.use_color {
            format!("\x1b[{style}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}
