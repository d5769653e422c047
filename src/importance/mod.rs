//! Permutation feature importance

mod permutation;

pub use permutation::{FeatureScore, ImportanceResult, PermutationImportance};
