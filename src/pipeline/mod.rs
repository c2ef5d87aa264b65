//! Fit-and-score pipeline over the normalized loan table.
//!
//! Every call to [`run`] fits a fresh forest on the full table and scores one
//! applicant row; nothing is cached between calls. A run either returns a
//! complete [`Prediction`] or fails as a whole.

mod row;

use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::dataset::{LABEL_COLUMN, NormalizedTable};
use crate::ml::forest::{ForestError, ForestOptions, RandomForest, TrainDataset, train_forest};

pub use row::{FeatureRow, SchemaMismatch};

/// Loan approval outcome classes.
pub const CLASS_NAMES: [&str; 2] = ["Rejected", "Approved"];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Dataset has no `{0}` column")]
    MissingLabel(&'static str),
    #[error("Row {row}: label {value} is not 0 or 1")]
    InvalidLabel { row: usize, value: f64 },
    #[error("Feature row does not match training columns: {0}")]
    SchemaMismatch(SchemaMismatch),
    #[error("Model fit failed: {0}")]
    Fit(#[from] ForestError),
    #[error("Scoring failed: {0}")]
    Score(ForestError),
}

/// Feature matrix and label vector split out of a normalized table.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    /// Feature column names in matrix order.
    pub columns: Vec<String>,
    pub data: TrainDataset,
}

/// Predicted label with its class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// `1` approved, `0` rejected.
    pub label: u8,
    /// `[P(rejected), P(approved)]`.
    pub probabilities: [f64; 2],
}

impl Prediction {
    fn from_proba(proba: &[f64]) -> Self {
        let p0 = proba.first().copied().unwrap_or(0.0);
        let p1 = proba.get(1).copied().unwrap_or(0.0);
        Self {
            label: u8::from(p1 > p0),
            probabilities: [p0, p1],
        }
    }

    pub fn approved(&self) -> bool {
        self.label == 1
    }

    pub fn label_name(&self) -> &'static str {
        CLASS_NAMES[usize::from(self.label)]
    }
}

/// Split a table into the feature matrix (all columns but the label) and labels.
pub fn split_features_labels(table: &NormalizedTable) -> Result<TrainingSet, PipelineError> {
    let label_idx = table
        .column_index(LABEL_COLUMN)
        .ok_or(PipelineError::MissingLabel(LABEL_COLUMN))?;
    let columns: Vec<String> = table
        .feature_columns()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut x = Vec::with_capacity(table.len());
    let mut y = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().iter().enumerate() {
        let value = row[label_idx];
        let label = match value {
            v if v == 0.0 => 0,
            v if v == 1.0 => 1,
            _ => return Err(PipelineError::InvalidLabel { row: idx + 1, value }),
        };
        x.push(
            row.iter()
                .enumerate()
                .filter(|(col, _)| *col != label_idx)
                .map(|(_, v)| *v)
                .collect(),
        );
        y.push(label);
    }

    Ok(TrainingSet {
        columns,
        data: TrainDataset { n_classes: 2, x, y },
    })
}

/// A forest fitted for one invocation, with the column order it was trained on.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    columns: Vec<String>,
    model: RandomForest,
}

impl FittedPipeline {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn model(&self) -> &RandomForest {
        &self.model
    }

    /// Score one row; its column set must equal the training columns.
    pub fn score(&self, row: &FeatureRow) -> Result<Prediction, PipelineError> {
        let features = row
            .align(&self.columns)
            .map_err(PipelineError::SchemaMismatch)?;
        self.score_aligned(&features)
    }

    /// Score a row already laid out in training column order.
    ///
    /// A row with fewer values than training columns reports the trailing
    /// columns as missing; extra values are reported by position.
    pub fn score_aligned(&self, features: &[f64]) -> Result<Prediction, PipelineError> {
        if features.len() != self.columns.len() {
            let split = features.len().min(self.columns.len());
            return Err(PipelineError::SchemaMismatch(SchemaMismatch {
                missing: self.columns[split..].to_vec(),
                unexpected: (split..features.len()).map(|idx| format!("#{idx}")).collect(),
                duplicated: Vec::new(),
            }));
        }
        let proba = self
            .model
            .predict_proba(features)
            .map_err(PipelineError::Score)?;
        Ok(Prediction::from_proba(&proba))
    }
}

/// Fit a fresh forest on the whole table.
pub fn fit(table: &NormalizedTable, options: &ForestOptions) -> Result<FittedPipeline, PipelineError> {
    let training = split_features_labels(table)?;
    fit_training_set(training, options)
}

/// Fit on an already split training set.
pub fn fit_training_set(
    training: TrainingSet,
    options: &ForestOptions,
) -> Result<FittedPipeline, PipelineError> {
    let started = Instant::now();
    let model = train_forest(&training.data, options)?;
    info!(
        rows = training.data.x.len(),
        trees = model.trees().len(),
        seed = ?options.seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fitted loan approval model"
    );
    Ok(FittedPipeline {
        columns: training.columns,
        model,
    })
}

/// Fit on `table` and score `row`; the model is dropped on return.
pub fn run(
    table: &NormalizedTable,
    row: &FeatureRow,
    options: &ForestOptions,
) -> Result<Prediction, PipelineError> {
    let fitted = fit(table, options)?;
    let prediction = fitted.score(row)?;
    debug!(
        label = prediction.label,
        p_rejected = prediction.probabilities[0],
        p_approved = prediction.probabilities[1],
        "Scored applicant row"
    );
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NormalizedTable {
        let rows = (0..40)
            .map(|i| {
                let score = 300.0 + i as f64 * 15.0;
                let approved = if score >= 600.0 { 1.0 } else { 0.0 };
                vec![score, (i % 3) as f64, approved]
            })
            .collect();
        NormalizedTable::new(
            vec!["cibil_score".into(), "no_of_dependents".into(), LABEL_COLUMN.into()],
            rows,
        )
        .unwrap()
    }

    fn seeded() -> ForestOptions {
        ForestOptions {
            n_trees: 20,
            seed: Some(9),
            ..ForestOptions::default()
        }
    }

    #[test]
    fn split_drops_label_from_features() {
        let training = split_features_labels(&table()).unwrap();
        assert_eq!(training.columns, vec!["cibil_score", "no_of_dependents"]);
        assert_eq!(training.data.x[0], vec![300.0, 0.0]);
        assert_eq!(training.data.y[0], 0);
        assert_eq!(training.data.y[39], 1);
    }

    #[test]
    fn non_binary_label_fails_the_fit() {
        let mut rows = table().rows().to_vec();
        rows[4][2] = 0.5;
        let table = NormalizedTable::new(table().columns().to_vec(), rows).unwrap();
        let err = fit(&table, &seeded()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLabel { row: 5, .. }));
    }

    #[test]
    fn scores_rows_with_matching_columns() {
        let row = FeatureRow::new()
            .with("no_of_dependents", 1.0)
            .with("cibil_score", 850.0);
        let prediction = run(&table(), &row, &seeded()).unwrap();
        assert_eq!(prediction.label, 1);
        assert!(prediction.approved());
        assert_eq!(prediction.label_name(), "Approved");
        assert!((prediction.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn schema_mismatch_is_fatal() {
        let row = FeatureRow::new().with("cibil_score", 850.0);
        let err = run(&table(), &row, &seeded()).unwrap_err();
        match err {
            PipelineError::SchemaMismatch(mismatch) => {
                assert_eq!(mismatch.missing, vec!["no_of_dependents"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn positional_rows_must_match_the_training_width() {
        let fitted = fit(&table(), &seeded()).unwrap();
        match fitted.score_aligned(&[700.0]).unwrap_err() {
            PipelineError::SchemaMismatch(mismatch) => {
                assert_eq!(mismatch.missing, vec!["no_of_dependents"]);
                assert!(mismatch.unexpected.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        match fitted.score_aligned(&[700.0, 1.0, 5.0]).unwrap_err() {
            PipelineError::SchemaMismatch(mismatch) => {
                assert_eq!(mismatch.unexpected, vec!["#2"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fitted.score_aligned(&[]).is_err());
        assert!(fitted.score_aligned(&[700.0, 1.0]).unwrap().approved());
    }

    #[test]
    fn table_without_label_is_rejected() {
        let table = NormalizedTable::new(vec!["a".into()], vec![vec![1.0]]).unwrap();
        assert!(matches!(
            split_features_labels(&table),
            Err(PipelineError::MissingLabel(LABEL_COLUMN))
        ));
    }

    #[test]
    fn prediction_breaks_ties_toward_rejection() {
        let prediction = Prediction::from_proba(&[0.5, 0.5]);
        assert_eq!(prediction.label, 0);
        assert_eq!(prediction.label_name(), "Rejected");
    }
}
