//! Evaluation metrics for classification models.

use serde::Serialize;

/// Confusion matrix for a `K`-class classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Count one prediction; out-of-range indices are ignored.
    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

/// Precision/recall statistics for a single class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Number of rows whose true class is this one.
    pub support: u32,
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|class_idx| {
            let tp = cm.get(class_idx, class_idx) as f64;
            let support: u32 = (0..k).map(|j| cm.get(class_idx, j)).sum();
            let predicted: u32 = (0..k).map(|i| cm.get(i, class_idx)).sum();
            let precision = if predicted == 0 {
                0.0
            } else {
                tp / predicted as f64
            };
            let recall = if support == 0 { 0.0 } else { tp / support as f64 };
            PerClassStats {
                precision,
                recall,
                support,
            }
        })
        .collect()
}

/// Overall accuracy; `0.0` for an empty matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|i| cm.get(i, i) as u64).sum();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::new(2);
        for (truth, predicted) in [(0, 0), (0, 0), (0, 1), (1, 1), (1, 1), (1, 1), (1, 0)] {
            cm.add(truth, predicted);
        }
        cm.add(5, 0);
        cm
    }

    #[test]
    fn accuracy_counts_diagonal() {
        let cm = sample();
        assert_eq!(cm.total(), 7);
        assert!((accuracy(&cm) - 5.0 / 7.0).abs() < 1e-12);
        assert_eq!(accuracy(&ConfusionMatrix::new(2)), 0.0);
    }

    #[test]
    fn precision_and_recall_per_class() {
        let stats = precision_recall_by_class(&sample());
        assert_eq!(stats[0].support, 3);
        assert!((stats[0].precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats[0].recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats[1].support, 4);
        assert!((stats[1].precision - 0.75).abs() < 1e-12);
        assert!((stats[1].recall - 0.75).abs() < 1e-12);
    }
}
