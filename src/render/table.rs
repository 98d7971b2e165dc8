use crate::error::TableError;
use crate::model::TransitionMatrix;
use crate::record::{Dialect, write_record};
use anyhow::Context;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Literal first cell of the header row.
pub const CORNER: &str = "From/To";

/// Square view of a matrix: a header axis of destinations and one row per
/// source. Row and column order are whatever the producer chose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub from: String,
    /// One count per entry of `Table::columns`.
    pub counts: Vec<u64>,
}

impl Table {
    /// Both axes are the sorted union of every name in the matrix, so names
    /// that are only ever destinations still get a (zero) row.
    pub fn from_matrix(matrix: &TransitionMatrix) -> Self {
        let names = matrix.names();
        let rows = names
            .iter()
            .map(|from| TableRow {
                from: from.to_string(),
                counts: names.iter().map(|to| matrix.get(from, to)).collect(),
            })
            .collect();

        Self {
            columns: names.into_iter().map(str::to_string).collect(),
            rows,
        }
    }

    pub fn write_to<W: Write>(&self, w: &mut W, delimiter: char) -> io::Result<()> {
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(CORNER);
        header.extend(self.columns.iter().map(String::as_str));
        write_record(w, &header, delimiter)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(row.counts.len() + 1);
            record.push(row.from.clone());
            record.extend(row.counts.iter().map(u64::to_string));
            write_record(w, &record, delimiter)?;
        }
        Ok(())
    }

    /// Parse a table artifact. An empty source is an empty table.
    pub fn parse(text: &str, dialect: &Dialect) -> Result<Self, TableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !dialect.is_skippable(line));

        let Some((_, header)) = lines.next() else {
            return Ok(Self::default());
        };
        let columns: Vec<String> = dialect.split(header).into_iter().skip(1).collect();
        let expected = columns.len() + 1;

        let mut rows = Vec::new();
        for (lno, line) in lines {
            let mut fields = dialect.split(line).into_iter();
            let got = fields.len();
            if got != expected {
                return Err(TableError::Ragged {
                    line: lno,
                    expected,
                    got,
                });
            }

            let from = fields.next().unwrap_or_default();
            let counts = fields
                .zip(&columns)
                .map(|(cell, to)| {
                    cell.trim().parse::<u64>().map_err(|_| TableError::BadCount {
                        line: lno,
                        from: from.clone(),
                        to: to.clone(),
                        value: cell.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(TableRow { from, counts });
        }

        Ok(Self { columns, rows })
    }
}

/// Render a matrix as a count table.
pub fn render_table(matrix: &TransitionMatrix, delimiter: char) -> anyhow::Result<String> {
    let mut out = Vec::new();
    Table::from_matrix(matrix)
        .write_to(&mut out, delimiter)
        .context("render table")?;
    Ok(String::from_utf8(out)?)
}

/// Read a table artifact from disk; `#` lines are comments.
pub fn read_table_file(path: &Path, delimiter: char) -> anyhow::Result<Table> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read table file {}", path.display()))?;
    let dialect = Dialect::new(delimiter).with_comment(Some('#'));
    Table::parse(&text, &dialect).with_context(|| format!("parse table file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matrix(cells: &[(&str, &str, u64)]) -> TransitionMatrix {
        cells.iter().copied().collect()
    }

    #[test]
    fn single_transition_gets_zero_filled_rows() {
        let m = matrix(&[("E1", "E2", 1)]);
        assert_eq!(render_table(&m, ',').unwrap(), "From/To,E1,E2\nE1,0,1\nE2,0,0\n");
    }

    #[test]
    fn bracketed_matrix_table() {
        let m = matrix(&[
            ("start", "Event1", 1),
            ("Event1", "Event2", 2),
            ("Event1", "Event3", 3),
            ("Event2", "Event1", 1),
            ("Event3", "stop", 1),
        ]);
        assert_eq!(
            render_table(&m, ',').unwrap(),
            "From/To,Event1,Event2,Event3,start,stop\n\
             Event1,0,2,3,0,0\n\
             Event2,1,0,0,0,0\n\
             Event3,0,0,0,0,1\n\
             start,1,0,0,0,0\n\
             stop,0,0,0,0,0\n"
        );
    }

    #[test]
    fn empty_matrix_is_header_only() {
        assert_eq!(render_table(&TransitionMatrix::new(), ',').unwrap(), "From/To\n");
    }

    #[test]
    fn custom_delimiter_and_quoting() {
        let m = matrix(&[("a;b", "c", 12)]);
        assert_eq!(
            render_table(&m, ';').unwrap(),
            "From/To;\"a;b\";c\n\"a;b\";0;12\nc;0;0\n"
        );
    }

    #[test]
    fn rendering_is_repeatable() {
        let m = matrix(&[("x", "y", 3), ("y", "x", 1), ("y", "z", 4)]);
        assert_eq!(render_table(&m, ',').unwrap(), render_table(&m, ',').unwrap());
    }

    #[test]
    fn parses_written_table() {
        let m = matrix(&[("E1", "E2", 2), ("E2", "E1", 1)]);
        let text = format!("# generated\n{}", render_table(&m, ',').unwrap());
        let dialect = Dialect::new(',').with_comment(Some('#'));
        let table = Table::parse(&text, &dialect).unwrap();
        assert_eq!(table, Table::from_matrix(&m));
        assert_eq!(table.columns, vec!["E1", "E2"]);
        assert_eq!(table.rows[0].counts, vec![0, 2]);
    }

    #[test]
    fn names_with_multibyte_characters_render_intact() {
        let m = matrix(&[("café", "naïve", 1), ("\u{FFFD}", "café", 2)]);
        assert_eq!(
            render_table(&m, ',').unwrap(),
            "From/To,café,naïve,\u{FFFD}\n\
             café,0,1,0\n\
             naïve,0,0,0\n\
             \u{FFFD},2,0,0\n"
        );
    }

    #[test]
    fn empty_text_is_empty_table() {
        let table = Table::parse("", &Dialect::new(',')).unwrap();
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = Table::parse("From/To,a,b\na,1\n", &Dialect::new(',')).unwrap_err();
        assert_eq!(
            err,
            TableError::Ragged {
                line: 2,
                expected: 3,
                got: 2,
            }
        );
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        let err = Table::parse("From/To,a,b\na,1,x\n", &Dialect::new(',')).unwrap_err();
        assert_eq!(
            err,
            TableError::BadCount {
                line: 2,
                from: "a".into(),
                to: "b".into(),
                value: "x".into(),
            }
        );
    }

    #[test]
    fn reads_table_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        fs::write(&path, "From/To;a\na;5\n").unwrap();
        let table = read_table_file(&path, ';').unwrap();
        assert_eq!(table.rows[0].counts, vec![5]);

        assert!(read_table_file(&dir.path().join("missing.csv"), ';').is_err());
    }
}
