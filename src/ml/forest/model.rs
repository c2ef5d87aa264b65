use super::train::ForestError;
use super::tree::DecisionTree;

/// Fitted random forest.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub(super) fn new(n_features: usize, n_classes: usize, trees: Vec<DecisionTree>) -> Self {
        Self {
            n_features,
            n_classes,
            trees,
        }
    }

    /// Feature vector length expected by [`predict_proba`](Self::predict_proba).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean of the per-tree leaf distributions; sums to 1.
    ///
    /// `features` must hold exactly [`n_features`](Self::n_features) values.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ForestError> {
        let width_error = || ForestError::FeatureCount {
            expected: self.n_features,
            found: features.len(),
        };
        if features.len() != self.n_features {
            return Err(width_error());
        }
        let mut proba = vec![0.0f64; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_distribution(features).ok_or_else(width_error)?;
            for (acc, p) in proba.iter_mut().zip(leaf) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len().max(1) as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }

    /// Most probable class index; ties go to the lower index.
    pub fn predict(&self, features: &[f64]) -> Result<usize, ForestError> {
        Ok(argmax(&self.predict_proba(features)?))
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{ForestOptions, TrainDataset, train_forest};

    #[test]
    fn argmax_prefers_lower_index_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.2, 0.8]), 1);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let dataset = TrainDataset {
            n_classes: 2,
            x: (0..30).map(|i| vec![i as f64, (i % 3) as f64]).collect(),
            y: (0..30).map(|i| usize::from(i >= 15)).collect(),
        };
        let options = ForestOptions {
            n_trees: 15,
            seed: Some(11),
            ..ForestOptions::default()
        };
        let forest = train_forest(&dataset, &options).unwrap();
        assert_eq!(forest.trees().len(), 15);
        assert_eq!(forest.n_features(), 2);
        for probe in [-5.0, 0.0, 14.5, 15.0, 40.0] {
            let proba = forest.predict_proba(&[probe, 1.0]).unwrap();
            assert_eq!(proba.len(), 2);
            assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        assert_eq!(forest.predict(&[0.0, 0.0]), Ok(0));
        assert_eq!(forest.predict(&[29.0, 0.0]), Ok(1));
    }

    #[test]
    fn rows_of_the_wrong_width_are_rejected() {
        let dataset = TrainDataset {
            n_classes: 2,
            x: (0..20).map(|i| vec![i as f64, (i % 4) as f64, 1.0]).collect(),
            y: (0..20).map(|i| usize::from(i >= 10)).collect(),
        };
        let options = ForestOptions {
            n_trees: 5,
            seed: Some(2),
            ..ForestOptions::default()
        };
        let forest = train_forest(&dataset, &options).unwrap();
        assert_eq!(
            forest.predict_proba(&[1.0]),
            Err(ForestError::FeatureCount {
                expected: 3,
                found: 1
            })
        );
        assert_eq!(
            forest.predict(&[]),
            Err(ForestError::FeatureCount {
                expected: 3,
                found: 0
            })
        );
        assert!(forest.predict_proba(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }
}
