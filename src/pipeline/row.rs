use std::collections::HashSet;
use std::fmt;

/// One record of named feature values handed to a fitted model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    entries: Vec<(String, f64)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push((name.into(), value));
    }

    /// First value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(column, value)| (column.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder values to `columns`, failing unless the column sets match exactly.
    pub fn align(&self, columns: &[String]) -> Result<Vec<f64>, SchemaMismatch> {
        let mut mismatch = SchemaMismatch::default();
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (column, _) in &self.entries {
            if !seen.insert(column.as_str()) {
                mismatch.duplicated.push(column.clone());
            } else if !columns.contains(column) {
                mismatch.unexpected.push(column.clone());
            }
        }
        mismatch.missing = columns
            .iter()
            .filter(|column| !seen.contains(column.as_str()))
            .cloned()
            .collect();
        if !mismatch.is_empty() {
            return Err(mismatch);
        }
        Ok(columns
            .iter()
            .filter_map(|column| self.get(column))
            .collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FeatureRow {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(column, value)| (column.to_string(), value))
                .collect(),
        }
    }
}

/// Column-level differences between a feature row and the training columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaMismatch {
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
    pub duplicated: Vec<String>,
}

impl SchemaMismatch {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.duplicated.is_empty()
    }
}

impl fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("missing", &self.missing),
            ("unexpected", &self.unexpected),
            ("duplicated", &self.duplicated),
        ];
        let mut first = true;
        for (kind, columns) in parts {
            if columns.is_empty() {
                continue;
            }
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{kind} {}", columns.join(", "))?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_columns() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn align_reorders_by_name() {
        let row = FeatureRow::new().with("c", 3.0).with("a", 1.0).with("b", 2.0);
        assert_eq!(row.align(&training_columns()).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn align_reports_every_difference() {
        let row = FeatureRow::new()
            .with("a", 1.0)
            .with("a", 1.5)
            .with("z", 9.0)
            .with("c", 3.0);
        let mismatch = row.align(&training_columns()).unwrap_err();
        assert_eq!(mismatch.missing, vec!["b"]);
        assert_eq!(mismatch.unexpected, vec!["z"]);
        assert_eq!(mismatch.duplicated, vec!["a"]);
        assert_eq!(mismatch.to_string(), "missing b; unexpected z; duplicated a");
    }

    #[test]
    fn collects_from_pairs() {
        let row: FeatureRow = [("x", 1.0), ("y", 2.0)].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("y"), Some(2.0));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
