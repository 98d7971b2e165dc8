//! Output artifacts for a transition matrix: count table and Mermaid diagram.

pub mod diagram;
pub mod table;

pub use diagram::{render_diagram, render_matrix_diagram};
pub use table::{read_table_file, render_table};
