//! Chart rendering for importance rankings

mod backend;
mod chart;

pub use backend::{Color, PlotBackend, Surface, DEFAULT_PALETTE};
pub use chart::ImportanceChart;
