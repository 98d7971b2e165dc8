use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Category used when the layout has no category column.
pub const DEFAULT_CATEGORY: i64 = 0;

/// A single named event from the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub run_id: i64,
    pub timestamp: NaiveDateTime,
    pub category_id: Option<i64>,
}

/// Events partitioned by category, each list in input order.
pub type EventsByCategory = BTreeMap<i64, Vec<Event>>;
