//! Delimited record codec shared by the event loader and the table artifact.
//!
//! One record per line. Fields may be wrapped in double quotes, in which case
//! the delimiter loses its meaning and `""` stands for a literal quote.
//! Records spanning several lines are not supported.

use std::io::{self, Write};

/// How a delimited source is split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: char,
    /// Lines starting with this character are ignored.
    pub comment: Option<char>,
    /// Drop unquoted whitespace at the start of every field.
    pub trim_leading_space: bool,
}

impl Dialect {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            comment: None,
            trim_leading_space: false,
        }
    }

    pub fn with_comment(mut self, comment: Option<char>) -> Self {
        self.comment = comment;
        self
    }

    pub fn trim_leading_space(mut self, yes: bool) -> Self {
        self.trim_leading_space = yes;
        self
    }

    /// True for lines that carry no record at all.
    pub fn is_skippable(&self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        matches!(self.comment, Some(c) if line.starts_with(c))
    }

    /// Split a single line into fields.
    pub fn split(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut at_start = true;
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
                continue;
            }

            if c == self.delimiter {
                fields.push(std::mem::take(&mut field));
                at_start = true;
                continue;
            }

            if at_start {
                if self.trim_leading_space && c.is_whitespace() {
                    continue;
                }
                at_start = false;
                if c == '"' {
                    in_quotes = true;
                    continue;
                }
            }
            field.push(c);
        }

        fields.push(field);
        fields
    }
}

fn needs_quotes(field: &str, delimiter: char) -> bool {
    field.starts_with(char::is_whitespace)
        || field
            .chars()
            .any(|c| c == delimiter || c == '"' || c == '\r' || c == '\n')
}

/// Write one record terminated by `\n`, quoting fields where required.
pub fn write_record<W, S>(w: &mut W, fields: &[S], delimiter: char) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    let mut sep = [0u8; 4];
    let sep = delimiter.encode_utf8(&mut sep).as_bytes();

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            w.write_all(sep)?;
        }
        let field = field.as_ref();
        if needs_quotes(field, delimiter) {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            w.write_all(field.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}
