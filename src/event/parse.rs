use crate::diagnostics::Diagnostics;
use crate::error::{LoadError, RowError};
use crate::event::row::{DEFAULT_CATEGORY, Event, EventsByCategory};
use crate::layout::FieldLayout;
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

/// Events grouped by category plus every record that was skipped on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedEvents {
    pub by_category: EventsByCategory,
    pub diagnostics: Diagnostics,
}

impl LoadedEvents {
    pub fn event_count(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }
}

/// Read an event export from disk.
///
/// Only an unreadable file or a missing header fails; bad rows end up in
/// `diagnostics`. Bytes that are not UTF-8 (e.g. Latin-1 names) are replaced
/// with U+FFFD so the row survives.
pub fn load_events_file(path: &Path, layout: &FieldLayout) -> Result<LoadedEvents, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_events(path, &String::from_utf8_lossy(&bytes), layout)
}

/// Parse an in-memory export. `path` only labels errors.
///
/// Expected shape: one header line, then one record per line, e.g. with the
/// default layout:
/// id;app;name;x;y;run;kind;a;b;c;sent_at
/// 1;web;login;;;42;3;;;;2022-05-10 08:00:00
pub fn load_events(
    path: &Path,
    text: &str,
    layout: &FieldLayout,
) -> Result<LoadedEvents, LoadError> {
    let dialect = layout.dialect();
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !dialect.is_skippable(line));

    // Header carries no information we use; it only has to exist.
    if lines.next().is_none() {
        return Err(LoadError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut out = LoadedEvents::default();
    for (lno, line) in lines {
        let fields = dialect.split(line);
        match parse_record(&fields, layout) {
            Ok(event) => {
                let category = event.category_id.unwrap_or(DEFAULT_CATEGORY);
                out.by_category.entry(category).or_default().push(event);
            }
            Err(reason) => out.diagnostics.skip(lno, reason),
        }
    }

    Ok(out)
}

fn parse_record(fields: &[String], layout: &FieldLayout) -> Result<Event, RowError> {
    let expected = layout.min_fields();
    if fields.len() < expected {
        return Err(RowError::TooFewFields {
            expected,
            got: fields.len(),
        });
    }

    let sent_at = fields[layout.timestamp].trim();
    if sent_at.is_empty() {
        return Err(RowError::MissingTimestamp);
    }
    let timestamp = parse_timestamp(sent_at, &layout.timestamp_format)
        .ok_or_else(|| RowError::InvalidTimestamp(sent_at.to_string()))?;

    let category_id = match layout.category_id {
        Some(idx) => {
            let raw = fields[idx].trim();
            Some(
                raw.parse::<i64>()
                    .map_err(|_| RowError::InvalidCategory(raw.to_string()))?,
            )
        }
        None => None,
    };

    let raw_run = fields[layout.run_id].trim();
    let run_id = raw_run
        .parse::<i64>()
        .map_err(|_| RowError::InvalidRunId(raw_run.to_string()))?;

    Ok(Event {
        name: fields[layout.name].clone(),
        run_id,
        timestamp,
        category_id,
    })
}

/// Parse with `format`, then with a trailing fractional-seconds part as
/// database exports often carry one.
fn parse_timestamp(raw: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, format)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, &format!("{}%.f", format)))
        .ok()
}
