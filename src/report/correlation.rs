use crate::dataset::NormalizedTable;

/// Pairwise Pearson correlations between every column of a table.
///
/// Entries involving a constant column are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    /// Row-major `n x n` coefficients.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }

    /// Coefficient between two named columns.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let row = self.columns.iter().position(|c| c == a)?;
        let col = self.columns.iter().position(|c| c == b)?;
        Some(self.get(row, col))
    }
}

pub fn correlation_matrix(table: &NormalizedTable) -> CorrelationMatrix {
    let n_cols = table.columns().len();
    let n_rows = table.len() as f64;
    let mut means = vec![0.0f64; n_cols];
    for row in table.rows() {
        for (mean, value) in means.iter_mut().zip(row) {
            *mean += value;
        }
    }
    for mean in &mut means {
        *mean /= n_rows.max(1.0);
    }

    // Centered cross products, upper triangle mirrored.
    let mut sums = vec![0.0f64; n_cols * n_cols];
    for row in table.rows() {
        for i in 0..n_cols {
            let di = row[i] - means[i];
            for j in i..n_cols {
                sums[i * n_cols + j] += di * (row[j] - means[j]);
            }
        }
    }

    let mut values = vec![f64::NAN; n_cols * n_cols];
    for i in 0..n_cols {
        for j in i..n_cols {
            let denom = (sums[i * n_cols + i] * sums[j * n_cols + j]).sqrt();
            let r = if denom > 0.0 {
                (sums[i * n_cols + j] / denom).clamp(-1.0, 1.0)
            } else {
                f64::NAN
            };
            values[i * n_cols + j] = r;
            values[j * n_cols + i] = r;
        }
    }

    CorrelationMatrix {
        columns: table.columns().to_vec(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NormalizedTable {
        NormalizedTable::new(
            vec!["a".into(), "double".into(), "inverse".into(), "flat".into()],
            (0..10)
                .map(|i| {
                    let v = i as f64;
                    vec![v, 2.0 * v + 1.0, -v, 4.0]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn linear_relations_hit_the_extremes() {
        let matrix = correlation_matrix(&table());
        assert_eq!(matrix.len(), 4);
        assert!((matrix.between("a", "double").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.between("a", "inverse").unwrap() + 1.0).abs() < 1e-12);
        assert!((matrix.get(0, 0) - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get(1, 2), matrix.get(2, 1));
    }

    #[test]
    fn constant_columns_are_undefined() {
        let matrix = correlation_matrix(&table());
        assert!(matrix.between("a", "flat").unwrap().is_nan());
        assert!(matrix.between("flat", "flat").unwrap().is_nan());
        assert!(matrix.between("a", "missing").is_none());
    }
}
