//! Tabular data handling for importance computation

mod table;

pub use table::DataTable;
