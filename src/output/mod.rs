//! File exporters for generated trees.

pub mod csv;
pub mod json;

pub use csv::{write_families_csv, write_persons_csv};
pub use json::{write_graph_json, write_json, write_json_compact, GraphView};
