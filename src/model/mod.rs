//! Prediction capability contract

use crate::error::Result;
use ndarray::{Array1, Array2, Axis};

/// A prediction capability over tabular data.
///
/// Implementations take a rows x features array and return one prediction
/// row per input row. Multi-output models (e.g. per-class probabilities)
/// return one column per output; single-output models return an `n x 1`
/// array, most conveniently through [`single_output`].
///
/// Any `Fn(&Array2<f64>) -> Result<Array2<f64>>` closure satisfies the
/// contract directly.
pub trait PredictFn {
    /// Predict one output row per input row.
    fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>>;
}

impl<F> PredictFn for F
where
    F: Fn(&Array2<f64>) -> Result<Array2<f64>>,
{
    fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        (self)(x)
    }
}

/// Adapter lifting a single-output prediction function to [`PredictFn`].
pub struct SingleOutput<F> {
    inner: F,
}

/// Wrap a function returning one prediction per row as a [`PredictFn`]
/// producing an `n x 1` output array.
pub fn single_output<F>(f: F) -> SingleOutput<F>
where
    F: Fn(&Array2<f64>) -> Result<Array1<f64>>,
{
    SingleOutput { inner: f }
}

impl<F> PredictFn for SingleOutput<F>
where
    F: Fn(&Array2<f64>) -> Result<Array1<f64>>,
{
    fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        Ok((self.inner)(x)?.insert_axis(Axis(1)))
    }
}
