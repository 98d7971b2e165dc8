//! Row-level diagnostics collected while loading.
//!
//! The loader never logs on its own; it hands back a `Diagnostics` and the
//! caller decides whether to `emit` it.

use crate::error::RowError;

/// Log target for every skipped-record warning.
pub const SKIPPED_TARGET: &str = "skipped-malformed-record";

/// A record the loader dropped, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: usize,
    pub reason: RowError,
}

impl SkippedRecord {
    /// Empty timestamps are expected in exports and are not worth a warning.
    pub fn is_silent(&self) -> bool {
        matches!(self.reason, RowError::MissingTimestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub skipped: Vec<SkippedRecord>,
}

impl Diagnostics {
    pub fn skip(&mut self, line: usize, reason: RowError) {
        self.skipped.push(SkippedRecord { line, reason });
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Number of skips that warrant a warning.
    pub fn warning_count(&self) -> usize {
        self.skipped.iter().filter(|s| !s.is_silent()).count()
    }

    /// Log one line per skipped record.
    pub fn emit(&self, source: &str) {
        for s in &self.skipped {
            if s.is_silent() {
                log::debug!(
                    target: SKIPPED_TARGET,
                    "{}:{}: skipping record: {}",
                    source,
                    s.line,
                    s.reason
                );
            } else {
                log::warn!(
                    target: SKIPPED_TARGET,
                    "{}:{}: skipping record with {}",
                    source,
                    s.line,
                    s.reason
                );
            }
        }
    }
}
