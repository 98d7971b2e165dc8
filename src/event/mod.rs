//! Event loading from delimited exports.

pub mod parse;
pub mod row;

pub use parse::load_events_file;
pub use row::Event;
