//! Bagged ensemble of CART decision trees for binary and multi-class data.
//!
//! Defaults follow the usual random-forest recipe: 100 fully grown trees,
//! Gini impurity, bootstrap resampling and `sqrt(n_features)` candidate
//! features per split. Probabilities are the mean of the per-tree leaf class
//! distributions.
//!
//! Randomness is driven by [`ForestOptions::seed`]: a fixed seed makes fitting
//! reproducible, `None` draws fresh entropy for every fit.

mod model;
mod train;
mod tree;

pub use model::RandomForest;
pub use train::{ForestError, ForestOptions, MaxFeatures, TrainDataset, train_forest};
pub use tree::{DecisionTree, Node};
