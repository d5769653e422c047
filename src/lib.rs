//! featimp - Permutation feature importance for predictive models
//!
//! This crate scores features by how much a model's predictions shift when
//! one feature column is overwritten with a random-choice resample of its
//! own observed values, and turns the per-feature shifts into a normalized
//! ranking:
//!
//! # Modules
//!
//! - [`data`] - Named-column tabular data with a polars bridge
//! - [`model`] - The prediction capability contract and adapters
//! - [`importance`] - The importance engine and ranked results
//! - [`plot`] - Backend-agnostic horizontal bar chart rendering
//!
//! For each feature the engine perturbs a private working copy of the
//! dataset, re-predicts, and scores the feature by the standard deviation of
//! the prediction change across rows, averaged over prediction outputs. The
//! dataset handed in is never modified and the perturbed column is restored
//! before the next feature is inspected.

// Core error handling
pub mod error;

// Data and model contracts
pub mod data;
pub mod model;

// Importance computation
pub mod importance;

// Chart rendering
pub mod plot;

pub use error::{FeatimpError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{FeatimpError, Result};

    // Data
    pub use crate::data::DataTable;

    // Models
    pub use crate::model::{single_output, PredictFn, SingleOutput};

    // Importance
    pub use crate::importance::{FeatureScore, ImportanceResult, PermutationImportance};

    // Rendering
    pub use crate::plot::{Color, ImportanceChart, PlotBackend, Surface, DEFAULT_PALETTE};
}
