//! Named-column tabular data backed by a rectangular f64 array

use crate::error::{FeatimpError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use polars::prelude::*;
use rand::Rng;
use std::collections::HashSet;

/// A rectangular dataset with named feature columns and labelled rows.
///
/// The importance engine reads a table immutably and clones it for its
/// private working copy; all mutation goes through [`DataTable::set_column`],
/// which keeps the array rectangular.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Feature identifiers, in enumeration order
    names: Vec<String>,
    /// Row labels, "0".."n-1" unless supplied
    labels: Vec<String>,
    /// Values, n_rows x n_features
    values: Array2<f64>,
}

impl DataTable {
    /// Create a table from a values array and one name per column.
    pub fn new<S: Into<String>>(values: Array2<f64>, names: Vec<S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != values.ncols() {
            return Err(FeatimpError::ShapeError {
                expected: format!("{} feature names", values.ncols()),
                actual: format!("{}", names.len()),
            });
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(FeatimpError::ValidationError(format!(
                    "Duplicate feature name: {}",
                    name
                )));
            }
        }
        let labels = (0..values.nrows()).map(|i| i.to_string()).collect();
        Ok(Self {
            names,
            labels,
            values,
        })
    }

    /// Replace the default row labels.
    pub fn with_labels<S: Into<String>>(mut self, labels: Vec<S>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.values.nrows() {
            return Err(FeatimpError::ShapeError {
                expected: format!("{} row labels", self.values.nrows()),
                actual: format!("{}", labels.len()),
            });
        }
        self.labels = labels;
        Ok(self)
    }

    /// Build a table from a polars DataFrame, casting every column to f64.
    ///
    /// Columns that cannot be cast, and null values, are rejected.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut values = Array2::zeros((df.height(), names.len()));
        for (col_idx, name) in names.iter().enumerate() {
            let casted = df
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let ca = casted.f64()?;
            for (row_idx, value) in ca.into_iter().enumerate() {
                match value {
                    Some(v) => values[[row_idx, col_idx]] = v,
                    None => {
                        return Err(FeatimpError::DataError(format!(
                            "Null or non-numeric value in column '{}' at row {}",
                            name, row_idx
                        )))
                    }
                }
            }
        }
        Self::new(values, names)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Feature identifiers in enumeration order.
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Row labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The full data as a rows x features array.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Read a column by feature identifier.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        Ok(self.values.column(self.column_index(name)?))
    }

    /// Replace a column's values, keeping the row count intact.
    pub fn set_column(&mut self, name: &str, column: Array1<f64>) -> Result<()> {
        let idx = self.column_index(name)?;
        if column.len() != self.values.nrows() {
            return Err(FeatimpError::ShapeError {
                expected: format!("{} values", self.values.nrows()),
                actual: format!("{}", column.len()),
            });
        }
        self.values.column_mut(idx).assign(&column);
        Ok(())
    }

    /// Draw `n_samples` values uniformly, with replacement, from the observed
    /// values of a column.
    pub fn sample_column<R: Rng>(
        &self,
        name: &str,
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Array1<f64>> {
        let column = self.column(name)?;
        if column.is_empty() {
            return Err(FeatimpError::ValidationError(format!(
                "Cannot sample from empty column '{}'",
                name
            )));
        }
        let drawn: Vec<f64> = (0..n_samples)
            .map(|_| column[rng.gen_range(0..column.len())])
            .collect();
        Ok(Array1::from_vec(drawn))
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| FeatimpError::FeatureNotFound(name.to_string()))
    }
}
