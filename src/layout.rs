//! Field layout of an event source: which column plays which role.
//!
//! JSON shape (every key optional, defaults shown):
//! {
//!   "name": 2,
//!   "run_id": 5,
//!   "category_id": 6,          // null: single category 0
//!   "timestamp": 10,
//!   "delimiter": ";",
//!   "comment": null,           // e.g. "#"
//!   "timestamp_format": "%Y-%m-%d %H:%M:%S"
//! }

use crate::error::LayoutError;
use crate::record::Dialect;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldLayout {
    pub name: usize,
    pub run_id: usize,
    pub category_id: Option<usize>,
    pub timestamp: usize,
    pub delimiter: char,
    pub comment: Option<char>,
    /// chrono format string for the timestamp column.
    pub timestamp_format: String,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            name: 2,
            run_id: 5,
            category_id: Some(6),
            timestamp: 10,
            delimiter: ';',
            comment: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl FieldLayout {
    /// Reject delimiters that cannot be split on and columns mapped twice.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_delimiter(self.delimiter)?;
        if self.comment == Some(self.delimiter) {
            return Err(LayoutError::ReservedDelimiter(self.delimiter));
        }

        let mut roles: Vec<(usize, &'static str)> = vec![
            (self.name, "name"),
            (self.run_id, "run_id"),
            (self.timestamp, "timestamp"),
        ];
        if let Some(idx) = self.category_id {
            roles.push((idx, "category_id"));
        }
        for (i, &(index, first)) in roles.iter().enumerate() {
            if let Some(&(_, second)) = roles[i + 1..].iter().find(|(idx, _)| *idx == index) {
                return Err(LayoutError::SharedIndex {
                    index,
                    first,
                    second,
                });
            }
        }
        Ok(())
    }

    /// Fewest fields a record needs before every role can be read.
    pub fn min_fields(&self) -> usize {
        [self.name, self.run_id, self.timestamp]
            .into_iter()
            .chain(self.category_id)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn dialect(&self) -> Dialect {
        Dialect::new(self.delimiter)
            .with_comment(self.comment)
            .trim_leading_space(true)
    }
}

/// Load and validate a layout file.
pub fn load_layout_file(path: &Path) -> anyhow::Result<FieldLayout> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read layout file {}", path.display()))?;
    let layout: FieldLayout = serde_json::from_str(&text)
        .with_context(|| format!("parse layout file {}", path.display()))?;
    layout
        .validate()
        .with_context(|| format!("invalid layout in {}", path.display()))?;
    Ok(layout)
}

/// Parse a command-line delimiter, which must be exactly one usable character.
pub fn parse_delimiter(what: &'static str, value: &str) -> Result<char, LayoutError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            check_delimiter(c)?;
            Ok(c)
        }
        _ => Err(LayoutError::NotOneChar {
            what,
            value: value.to_string(),
        }),
    }
}

fn check_delimiter(c: char) -> Result<(), LayoutError> {
    if matches!(c, '"' | '\r' | '\n') {
        return Err(LayoutError::ReservedDelimiter(c));
    }
    Ok(())
}
