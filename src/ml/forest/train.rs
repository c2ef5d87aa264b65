use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use super::model::RandomForest;
use super::tree::{DecisionTree, TreeParams};

/// Number of candidate features examined at each split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(n_features)))`.
    #[default]
    Sqrt,
    /// Every feature at every split (plain bagged trees).
    All,
    /// A fixed count, capped at the feature count.
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = match self {
            Self::Sqrt => (n_features as f64).sqrt().floor() as usize,
            Self::All => n_features,
            Self::Count(count) => count.min(n_features),
        };
        n.max(1)
    }
}

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestOptions {
    pub n_trees: usize,
    /// `None` grows every tree until its leaves are pure.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    /// Resample the training rows with replacement for each tree.
    pub bootstrap: bool,
    /// Fixed seed for reproducible fits; `None` uses fresh entropy.
    pub seed: Option<u64>,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: None,
        }
    }
}

/// In-memory training data: a row-major feature matrix and class indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainDataset {
    pub n_classes: usize,
    pub x: Vec<Vec<f64>>,
    pub y: Vec<usize>,
}

/// Reasons a forest cannot be trained.
#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("Training set is empty")]
    EmptyDataset,
    #[error("Feature matrix has {rows} rows but there are {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("Row {row} has {found} features, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Expected {expected} features per row, got {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("Row {row} feature {feature} is not a finite number")]
    NonFinite { row: usize, feature: usize },
    #[error("Label {label} at row {row} is outside 0..{n_classes}")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        n_classes: usize,
    },
    #[error("Need at least 2 classes, got {0}")]
    TooFewClasses(usize),
    #[error("Forest needs at least one tree")]
    NoTrees,
}

/// Fit a random forest on `dataset`.
pub fn train_forest(
    dataset: &TrainDataset,
    options: &ForestOptions,
) -> Result<RandomForest, ForestError> {
    let n_features = validate(dataset, options)?;
    let started = Instant::now();
    let params = TreeParams {
        n_classes: dataset.n_classes,
        max_depth: options.max_depth,
        min_samples_split: options.min_samples_split.max(2),
        min_samples_leaf: options.min_samples_leaf.max(1),
        max_features: options.max_features.resolve(n_features),
    };

    let mut seeder = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let n = dataset.x.len();
    let mut trees = Vec::with_capacity(options.n_trees);
    for _ in 0..options.n_trees {
        let mut rng = StdRng::seed_from_u64(seeder.random());
        let samples: Vec<usize> = if options.bootstrap {
            (0..n).map(|_| rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };
        trees.push(DecisionTree::grow(
            &dataset.x,
            &dataset.y,
            samples,
            &params,
            &mut rng,
        ));
    }

    debug!(
        trees = trees.len(),
        rows = n,
        features = n_features,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fitted random forest"
    );
    Ok(RandomForest::new(n_features, dataset.n_classes, trees))
}

fn validate(dataset: &TrainDataset, options: &ForestOptions) -> Result<usize, ForestError> {
    if options.n_trees == 0 {
        return Err(ForestError::NoTrees);
    }
    if dataset.n_classes < 2 {
        return Err(ForestError::TooFewClasses(dataset.n_classes));
    }
    if dataset.x.len() != dataset.y.len() {
        return Err(ForestError::LengthMismatch {
            rows: dataset.x.len(),
            labels: dataset.y.len(),
        });
    }
    let Some(first) = dataset.x.first() else {
        return Err(ForestError::EmptyDataset);
    };
    let n_features = first.len();
    for (row, (features, &label)) in dataset.x.iter().zip(&dataset.y).enumerate() {
        if features.len() != n_features {
            return Err(ForestError::RowWidth {
                row,
                expected: n_features,
                found: features.len(),
            });
        }
        if let Some(feature) = features.iter().position(|value| !value.is_finite()) {
            return Err(ForestError::NonFinite { row, feature });
        }
        if label >= dataset.n_classes {
            return Err(ForestError::LabelOutOfRange {
                row,
                label,
                n_classes: dataset.n_classes,
            });
        }
    }
    Ok(n_features)
}
