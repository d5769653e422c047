//! Prediction-shift permutation importance

use crate::data::DataTable;
use crate::error::{FeatimpError, Result};
use crate::model::PredictFn;
use ndarray::{Array2, Axis};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Importance score for a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    /// Feature identifier
    pub feature: String,
    /// Normalized importance score
    pub score: f64,
}

/// Ranked feature importance scores
///
/// Scores are sorted in the requested order and normalized to sum to 1.0.
/// When every raw score is zero the zeros are kept as-is and
/// [`ImportanceResult::is_degenerate`] reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceResult {
    /// Per-feature scores, in the requested sort order
    pub scores: Vec<FeatureScore>,
    /// Sort order the ranking was requested in
    pub ascending: bool,
    /// Sum of the raw scores before normalization
    pub raw_total: f64,
}

impl ImportanceResult {
    fn empty(ascending: bool) -> Self {
        Self {
            scores: Vec::new(),
            ascending,
            raw_total: 0.0,
        }
    }

    fn from_raw(raw: Vec<(String, f64)>, ascending: bool) -> Self {
        let mut scores: Vec<FeatureScore> = raw
            .into_iter()
            .map(|(feature, score)| FeatureScore { feature, score })
            .collect();
        sort_scores(&mut scores, ascending);
        let raw_total: f64 = scores.iter().map(|s| s.score).sum();
        if raw_total > 0.0 {
            for entry in &mut scores {
                entry.score /= raw_total;
            }
        }
        Self {
            scores,
            ascending,
            raw_total,
        }
    }

    /// Number of features scored.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the ranking contains no features.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Look up one feature's score.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.feature == feature)
            .map(|s| s.score)
    }

    /// Feature identifiers, in result order.
    pub fn features(&self) -> Vec<&str> {
        self.scores.iter().map(|s| s.feature.as_str()).collect()
    }

    /// The `k` highest-scoring features, most important first.
    pub fn top_k(&self, k: usize) -> Vec<FeatureScore> {
        let mut sorted = self.scores_sorted(false);
        sorted.truncate(k);
        sorted
    }

    /// A copy of the scores re-sorted in the given order.
    pub fn scores_sorted(&self, ascending: bool) -> Vec<FeatureScore> {
        let mut out = self.scores.clone();
        sort_scores(&mut out, ascending);
        out
    }

    /// Sum of the normalized scores, 1.0 unless degenerate or empty.
    pub fn total(&self) -> f64 {
        self.scores.iter().map(|s| s.score).sum()
    }

    /// True when every raw score was zero and normalization was skipped.
    pub fn is_degenerate(&self) -> bool {
        self.raw_total == 0.0
    }

    /// Serialize the ranking to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn sort_scores(scores: &mut [FeatureScore], ascending: bool) {
    if ascending {
        scores.sort_by(|a, b| a.score.total_cmp(&b.score));
    } else {
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    }
}

/// Permutation feature importance calculator
///
/// Scores each feature by how much the model's predictions shift when that
/// feature's column is overwritten with a random-choice resample of its own
/// observed values. For one feature the shift is measured as the standard
/// deviation, across rows, of the prediction change, averaged over the
/// prediction outputs. The dataset handed in is never modified; perturbation
/// happens on a private working copy whose column is restored after each
/// feature.
pub struct PermutationImportance<M: PredictFn> {
    /// Prediction capability under inspection
    model: M,
    /// Sort order of the returned ranking
    ascending: bool,
    /// Seed for reproducible sampling, entropy-seeded when absent
    seed: Option<u64>,
}

impl<M: PredictFn> PermutationImportance<M> {
    /// Create a calculator with ascending ordering and entropy seeding.
    pub fn new(model: M) -> Self {
        Self {
            model,
            ascending: true,
            seed: None,
        }
    }

    /// Set the sort order of the returned ranking.
    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Set the random seed for reproducible sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Compute importance against the model's own baseline predictions.
    pub fn compute(&self, table: &DataTable) -> Result<ImportanceResult> {
        self.compute_impl(table, None)
    }

    /// Compute importance against an externally supplied baseline, used in
    /// place of predicting on the unperturbed table. Ground-truth targets
    /// are the usual baseline; its shape must match the model's output.
    pub fn compute_with_baseline(
        &self,
        table: &DataTable,
        baseline: &Array2<f64>,
    ) -> Result<ImportanceResult> {
        self.compute_impl(table, Some(baseline))
    }

    fn compute_impl(
        &self,
        table: &DataTable,
        baseline: Option<&Array2<f64>>,
    ) -> Result<ImportanceResult> {
        if table.n_features() == 0 {
            return Ok(ImportanceResult::empty(self.ascending));
        }
        if table.n_rows() == 0 {
            return Err(FeatimpError::ValidationError(
                "Dataset has no rows".to_string(),
            ));
        }

        let predicted;
        let baseline = match baseline {
            Some(b) => b,
            None => {
                predicted = self.model.predict(table.values())?;
                &predicted
            }
        };
        if baseline.nrows() != table.n_rows() {
            return Err(FeatimpError::ShapeError {
                expected: format!("{} baseline rows", table.n_rows()),
                actual: format!("{}", baseline.nrows()),
            });
        }
        let n = baseline.nrows();
        debug!("baseline ready: {} rows, {} outputs", n, baseline.ncols());

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut working = table.clone();
        let mut raw: Vec<(String, f64)> = Vec::with_capacity(table.n_features());

        for name in table.feature_names() {
            let samples = table.sample_column(name, n, &mut rng)?;
            working.set_column(name, samples)?;

            let new_predictions = self.model.predict(working.values())?;
            if new_predictions.dim() != baseline.dim() {
                return Err(FeatimpError::ShapeError {
                    expected: format!("{:?} predictions", baseline.dim()),
                    actual: format!("{:?}", new_predictions.dim()),
                });
            }

            let delta = &new_predictions - baseline;
            let spread = delta.std_axis(Axis(0), 0.0);
            let score = spread.mean().unwrap_or(0.0);
            debug!("feature '{}' raw importance {:.6}", name, score);
            raw.push((name.clone(), score));

            // put the untouched column back before perturbing the next one
            working.set_column(name, table.column(name)?.to_owned())?;
        }

        Ok(ImportanceResult::from_raw(raw, self.ascending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::single_output;
    use ndarray::{array, Array1, Array2};

    fn two_feature_table() -> DataTable {
        let values = array![
            [1.0, 100.0],
            [2.0, 100.0],
            [3.0, 100.0],
            [4.0, 100.0],
            [5.0, 100.0],
            [6.0, 100.0],
            [7.0, 100.0],
            [8.0, 100.0],
        ];
        DataTable::new(values, vec!["signal", "noise"]).unwrap()
    }

    #[test]
    fn test_from_raw_sorts_and_normalizes() {
        let raw = vec![
            ("a".to_string(), 3.0),
            ("b".to_string(), 1.0),
            ("c".to_string(), 0.0),
        ];
        let result = ImportanceResult::from_raw(raw, true);

        assert_eq!(result.features(), vec!["c", "b", "a"]);
        assert!((result.total() - 1.0).abs() < 1e-12);
        assert!((result.get("a").unwrap() - 0.75).abs() < 1e-12);
        assert!((result.get("b").unwrap() - 0.25).abs() < 1e-12);
        assert!(!result.is_degenerate());
    }

    #[test]
    fn test_from_raw_all_zero_skips_normalization() {
        let raw = vec![("a".to_string(), 0.0), ("b".to_string(), 0.0)];
        let result = ImportanceResult::from_raw(raw, true);

        assert!(result.is_degenerate());
        for entry in &result.scores {
            assert_eq!(entry.score, 0.0);
            assert!(!entry.score.is_nan());
        }
    }

    #[test]
    fn test_result_helpers() {
        let raw = vec![
            ("a".to_string(), 1.0),
            ("b".to_string(), 2.0),
            ("c".to_string(), 3.0),
        ];
        let result = ImportanceResult::from_raw(raw, true);

        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());

        let top = result.top_k(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, "c");
        assert_eq!(top[1].feature, "b");

        let descending = result.scores_sorted(false);
        assert_eq!(descending[0].feature, "c");
        // the stored order is untouched by re-sorted copies
        assert_eq!(result.features(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_influential_feature_outranks_ignored_one() {
        let model = single_output(|x: &Array2<f64>| Ok(x.column(0).to_owned()));
        let engine = PermutationImportance::new(model).with_seed(7);
        let result = engine.compute(&two_feature_table()).unwrap();

        // the model reads only "signal", so "noise" scores zero
        assert!(result.get("signal").unwrap() > 0.9);
        assert!(result.get("noise").unwrap() < 1e-12);
        assert!((result.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let table = two_feature_table();
        let model = |x: &Array2<f64>| -> Result<Array2<f64>> { Ok(x.clone()) };

        let first = PermutationImportance::new(model).with_seed(99).compute(&table);
        let second = PermutationImportance::new(model).with_seed(99).compute(&table);
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn test_input_table_is_untouched() {
        let table = two_feature_table();
        let before = table.clone();

        let model = single_output(|x: &Array2<f64>| Ok(x.column(0).to_owned()));
        PermutationImportance::new(model)
            .with_seed(1)
            .compute(&table)
            .unwrap();

        assert_eq!(table, before);
    }

    #[test]
    fn test_empty_feature_set_gives_empty_result() {
        let table = DataTable::new(Array2::zeros((4, 0)), Vec::<String>::new()).unwrap();
        let model = |_: &Array2<f64>| -> Result<Array2<f64>> { Ok(Array2::zeros((4, 1))) };
        let result = PermutationImportance::new(model).compute(&table).unwrap();

        assert!(result.is_empty());
        assert!(result.is_degenerate());
    }

    #[test]
    fn test_empty_rows_is_an_error() {
        let table = DataTable::new(Array2::zeros((0, 2)), vec!["a", "b"]).unwrap();
        let model = |_: &Array2<f64>| -> Result<Array2<f64>> { Ok(Array2::zeros((0, 1))) };
        let result = PermutationImportance::new(model).compute(&table);

        match result {
            Err(err) => assert_eq!(err.to_string(), "Validation error: Dataset has no rows"),
            Ok(_) => panic!("expected a validation error"),
        }
    }

    #[test]
    fn test_prediction_failure_propagates() {
        let model = |_: &Array2<f64>| -> Result<Array2<f64>> {
            Err(FeatimpError::PredictionError("model exploded".to_string()))
        };
        let result = PermutationImportance::new(model).compute(&two_feature_table());

        match result {
            Err(FeatimpError::PredictionError(msg)) => assert_eq!(msg, "model exploded"),
            other => panic!("expected prediction error, got {:?}", other),
        }
    }

    #[test]
    fn test_baseline_row_mismatch() {
        let table = two_feature_table();
        let model = single_output(|x: &Array2<f64>| Ok(x.column(0).to_owned()));
        let baseline = Array2::zeros((3, 1));

        let result = PermutationImportance::new(model).compute_with_baseline(&table, &baseline);
        assert!(matches!(result, Err(FeatimpError::ShapeError { .. })));
    }

    #[test]
    fn test_drifting_prediction_shape_is_rejected() {
        // one output column at baseline, two on every later call
        let calls = std::cell::Cell::new(0u32);
        let model = |x: &Array2<f64>| -> Result<Array2<f64>> {
            let k = if calls.get() == 0 { 1 } else { 2 };
            calls.set(calls.get() + 1);
            Ok(Array2::zeros((x.nrows(), k)))
        };

        let result = PermutationImportance::new(model)
            .with_seed(3)
            .compute(&two_feature_table());
        assert!(matches!(result, Err(FeatimpError::ShapeError { .. })));
    }

    #[test]
    fn test_multi_output_scores_average_over_columns() {
        // two outputs, both reading only column 0
        let model = |x: &Array2<f64>| -> Result<Array2<f64>> {
            let c = x.column(0);
            let mut out = Array2::zeros((x.nrows(), 2));
            out.column_mut(0).assign(&c);
            out.column_mut(1).assign(&c.map(|v| v * 2.0));
            Ok(out)
        };
        let engine = PermutationImportance::new(model).with_seed(11);
        let result = engine.compute(&two_feature_table()).unwrap();

        assert!(result.get("signal").unwrap() > 0.9);
        assert!(result.get("noise").unwrap() < 1e-12);
    }

    #[test]
    fn test_json_roundtrip_keeps_full_float_precision() {
        // thirds have no finite binary expansion, so the equality below
        // requires bit-exact float parsing
        let raw = vec![("a".to_string(), 1.0), ("b".to_string(), 2.0)];
        let result = ImportanceResult::from_raw(raw, false);
        assert!((result.get("b").unwrap() - 2.0 / 3.0).abs() < 1e-15);

        let json = result.to_json().unwrap();
        let back: ImportanceResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_single_feature_scores_one() {
        let values = Array1::linspace(0.0, 9.0, 10)
            .into_shape_with_order((10, 1))
            .unwrap();
        let table = DataTable::new(values, vec!["only"]).unwrap();
        let model = single_output(|x: &Array2<f64>| Ok(x.column(0).to_owned()));

        let result = PermutationImportance::new(model)
            .with_seed(5)
            .compute(&table)
            .unwrap();
        assert_eq!(result.get("only").unwrap(), 1.0);
    }
}
