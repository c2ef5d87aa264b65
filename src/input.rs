//! Applicant attributes collected from the sidebar widgets.
//!
//! [`FEATURE_SPECS`] fixes the order, bounds and defaults of the 11 feature
//! columns; [`ApplicantInputs`] holds one in-bounds value per column and turns
//! them into the [`FeatureRow`] scored by the pipeline.

use thiserror::Error;

use crate::pipeline::FeatureRow;

/// How a feature is edited in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Integer slider over `[min, max]`.
    Slider,
    /// Radio choice between `0` and `1`.
    Choice,
}

/// Schema entry for one feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub name: &'static str,
    /// Widget caption.
    pub label: &'static str,
    pub kind: WidgetKind,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl FeatureSpec {
    const fn slider(name: &'static str, label: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            label,
            kind: WidgetKind::Slider,
            min,
            max,
            default,
        }
    }

    const fn choice(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: WidgetKind::Choice,
            min: 0,
            max: 1,
            default: 0,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

/// Number of feature columns handed to the model.
pub const FEATURE_COUNT: usize = 11;

/// Feature columns in training order.
///
/// Choices and the dependents slider start at their first option, as the
/// source widgets show no explicit default.
pub static FEATURE_SPECS: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec::slider("no_of_dependents", "Number of dependants", 0, 5, 0),
    FeatureSpec::choice("education", "Education"),
    FeatureSpec::choice("self_employed", "Self-employed"),
    FeatureSpec::slider("income_annum", "Income per annum", 200_000, 9_900_000, 5_100_000),
    FeatureSpec::slider("loan_amount", "Loan Amount", 300_000, 39_500_000, 14_500_000),
    FeatureSpec::slider("loan_term", "Loan Term", 2, 20, 10),
    FeatureSpec::slider("cibil_score", "Cibil Score", 300, 900, 600),
    FeatureSpec::slider(
        "residential_assets_value",
        "Residential Asset Value",
        -100_000,
        29_100_000,
        5_600_000,
    ),
    FeatureSpec::slider(
        "commercial_assets_value",
        "Commercial Asset Value",
        0,
        19_400_000,
        3_700_000,
    ),
    FeatureSpec::slider(
        "luxury_assets_value",
        "Luxury Asset Value",
        300_000,
        39_200_000,
        14_600_000,
    ),
    FeatureSpec::slider("bank_asset_value", "Bank Asset Value", 0, 14_700_000, 4_600_000),
];

/// Look up a feature's schema entry by column name.
pub fn feature_spec(name: &str) -> Option<&'static FeatureSpec> {
    FEATURE_SPECS.iter().find(|spec| spec.name == name)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown feature `{0}`")]
    UnknownFeature(String),
    #[error("`{name}` must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("Expected `name=value`, got {0:?}")]
    InvalidAssignment(String),
}

/// One applicant's attributes, always within their configured bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantInputs {
    values: [i64; FEATURE_COUNT],
}

impl Default for ApplicantInputs {
    fn default() -> Self {
        Self {
            values: FEATURE_SPECS.each_ref().map(|spec| spec.default),
        }
    }
}

impl ApplicantInputs {
    pub fn get(&self, name: &str) -> Option<i64> {
        index_of(name).map(|idx| self.values[idx])
    }

    /// Set a value, rejecting unknown names and out-of-range values.
    pub fn set(&mut self, name: &str, value: i64) -> Result<(), InputError> {
        let idx = index_of(name).ok_or_else(|| InputError::UnknownFeature(name.to_string()))?;
        let spec = &FEATURE_SPECS[idx];
        if !spec.contains(value) {
            return Err(InputError::OutOfRange {
                name: name.to_string(),
                value,
                min: spec.min,
                max: spec.max,
            });
        }
        self.values[idx] = value;
        Ok(())
    }

    /// Set a value, clamping it into bounds. Returns the stored value.
    pub fn set_clamped(&mut self, name: &str, value: i64) -> Result<i64, InputError> {
        let idx = index_of(name).ok_or_else(|| InputError::UnknownFeature(name.to_string()))?;
        let clamped = FEATURE_SPECS[idx].clamp(value);
        self.values[idx] = clamped;
        Ok(clamped)
    }

    /// Apply a `name=value` assignment such as `cibil_score=750`.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), InputError> {
        let invalid = || InputError::InvalidAssignment(assignment.to_string());
        let (name, value) = assignment.split_once('=').ok_or_else(invalid)?;
        let value = value.trim().parse::<i64>().map_err(|_| invalid())?;
        self.set(name.trim(), value)
    }

    /// Schema entries paired with their current values, in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FeatureSpec, i64)> + '_ {
        FEATURE_SPECS.iter().zip(self.values.iter().copied())
    }

    /// Mutable access for widgets; callers keep values within each feature's bounds.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static FeatureSpec, &mut i64)> {
        FEATURE_SPECS.iter().zip(self.values.iter_mut())
    }

    /// Clamp every value back into bounds after widget edits.
    pub fn clamp_all(&mut self) {
        for (spec, value) in FEATURE_SPECS.iter().zip(self.values.iter_mut()) {
            *value = spec.clamp(*value);
        }
    }

    pub fn to_feature_row(&self) -> FeatureRow {
        self.iter()
            .map(|(spec, value)| (spec.name, value as f64))
            .collect()
    }
}

fn index_of(name: &str) -> Option<usize> {
    FEATURE_SPECS.iter().position(|spec| spec.name == name)
}
