use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{self, DashboardConfig};
use crate::dataset::NormalizedTable;
use crate::input::ApplicantInputs;
use crate::pipeline::{self, FeatureRow, Prediction};
use crate::report::{CorrelationMatrix, LabelHistogram, correlation_matrix, label_histogram};

/// Holds the loaded table and the viewer's current selections.
///
/// The UI edits a copy of the inputs and hands it back through
/// [`DashboardController::edit_inputs`]; [`DashboardController::refresh`] then
/// runs the pipeline at most once per committed change. Edits made while a
/// slider is still being dragged stay a draft and never trigger a fit.
pub struct DashboardController {
    table: NormalizedTable,
    config: DashboardConfig,
    config_path: Option<PathBuf>,
    inputs: ApplicantInputs,
    draft: Option<ApplicantInputs>,
    extended_report: bool,
    histogram_column: String,
    dirty: bool,
    outcome: Option<Result<Prediction, String>>,
    correlation: Option<CorrelationMatrix>,
    histogram: Option<Result<LabelHistogram, String>>,
    runs: u64,
}

impl DashboardController {
    pub fn new(table: NormalizedTable, config: DashboardConfig) -> Self {
        let extended_report = config.extended_report;
        let histogram_column = config.report.histogram_column.clone();
        Self {
            table,
            config,
            config_path: None,
            inputs: ApplicantInputs::default(),
            draft: None,
            extended_report,
            histogram_column,
            dirty: true,
            outcome: None,
            correlation: None,
            histogram: None,
            runs: 0,
        }
    }

    /// Persist report preferences to `path` when they change.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn inputs(&self) -> &ApplicantInputs {
        &self.inputs
    }

    /// Replace the inputs; returns whether anything changed.
    pub fn set_inputs(&mut self, mut inputs: ApplicantInputs) -> bool {
        inputs.clamp_all();
        if inputs == self.inputs {
            return false;
        }
        self.inputs = inputs;
        self.dirty = true;
        true
    }

    /// Inputs as the sidebar shows them, including an uncommitted drag.
    pub fn draft_inputs(&self) -> &ApplicantInputs {
        self.draft.as_ref().unwrap_or(&self.inputs)
    }

    /// Take edited inputs from the sidebar.
    ///
    /// While `dragging` the edit is only kept as a draft; the first call with
    /// `dragging == false` commits it. Returns whether the committed inputs changed.
    pub fn edit_inputs(&mut self, mut inputs: ApplicantInputs, dragging: bool) -> bool {
        if dragging {
            inputs.clamp_all();
            self.draft = Some(inputs);
            return false;
        }
        self.draft = None;
        self.set_inputs(inputs)
    }

    pub fn feature_row(&self) -> FeatureRow {
        self.inputs.to_feature_row()
    }

    /// Latest prediction, or the error text of the last failed run.
    pub fn outcome(&self) -> Option<&Result<Prediction, String>> {
        self.outcome.as_ref()
    }

    /// Number of pipeline runs since launch.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn extended_report(&self) -> bool {
        self.extended_report
    }

    pub fn set_extended_report(&mut self, enabled: bool) {
        if self.extended_report == enabled {
            return;
        }
        self.extended_report = enabled;
        self.config.extended_report = enabled;
        self.persist_config();
    }

    pub fn histogram_column(&self) -> &str {
        &self.histogram_column
    }

    pub fn set_histogram_column(&mut self, column: &str) {
        if self.histogram_column == column {
            return;
        }
        self.histogram_column = column.to_string();
        self.histogram = None;
        self.config.report.histogram_column = column.to_string();
        self.persist_config();
    }

    pub fn correlation(&self) -> Option<&CorrelationMatrix> {
        self.correlation.as_ref()
    }

    pub fn histogram(&self) -> Option<&Result<LabelHistogram, String>> {
        self.histogram.as_ref()
    }

    /// Whether the next [`DashboardController::refresh`] has work to do.
    pub fn needs_refresh(&self) -> bool {
        self.dirty
            || (self.extended_report && (self.correlation.is_none() || self.histogram.is_none()))
    }

    /// Re-run the pipeline if the inputs changed and fill the report caches.
    ///
    /// Returns whether a pipeline run happened.
    pub fn refresh(&mut self) -> bool {
        let ran = self.dirty;
        if self.dirty {
            self.dirty = false;
            self.runs += 1;
            let started = Instant::now();
            let row = self.inputs.to_feature_row();
            let options = self.config.forest.to_options();
            let outcome = pipeline::run(&self.table, &row, &options).map_err(|err| err.to_string());
            match &outcome {
                Ok(prediction) => debug!(
                    run = self.runs,
                    label = prediction.label,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Dashboard refreshed"
                ),
                Err(err) => warn!(run = self.runs, "Prediction failed: {err}"),
            }
            self.outcome = Some(outcome);
        }
        if self.extended_report {
            self.ensure_report();
        }
        ran
    }

    fn ensure_report(&mut self) {
        if self.correlation.is_none() {
            let started = Instant::now();
            self.correlation = Some(correlation_matrix(&self.table));
            info!(
                columns = self.table.columns().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Computed correlation matrix"
            );
        }
        if self.histogram.is_none() {
            let bins = self.config.report.histogram_bins;
            self.histogram = Some(
                label_histogram(&self.table, &self.histogram_column, bins)
                    .map_err(|err| err.to_string()),
            );
        }
    }

    fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = config::save_to_path(&self.config, path) {
            warn!("Failed to save dashboard config: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForestSettings;
    use crate::dataset::LABEL_COLUMN;
    use crate::input::FEATURE_SPECS;
    use tempfile::tempdir;

    fn table() -> NormalizedTable {
        let mut columns: Vec<String> = FEATURE_SPECS.iter().map(|spec| spec.name.to_string()).collect();
        columns.push(LABEL_COLUMN.to_string());
        let rows = (0..30)
            .map(|i| {
                let mut row: Vec<f64> = FEATURE_SPECS.iter().map(|spec| spec.default as f64).collect();
                let cibil = 300.0 + i as f64 * 20.0;
                row[6] = cibil;
                row[0] = (i % 6) as f64;
                row.push(if cibil >= 550.0 { 1.0 } else { 0.0 });
                row
            })
            .collect();
        NormalizedTable::new(columns, rows).unwrap()
    }

    fn config() -> DashboardConfig {
        DashboardConfig {
            forest: ForestSettings {
                n_trees: 10,
                seed: Some(5),
                ..ForestSettings::default()
            },
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn refresh_runs_once_per_change() {
        let mut controller = DashboardController::new(table(), config());
        assert!(controller.refresh());
        assert!(!controller.refresh());
        assert_eq!(controller.runs(), 1);
        assert!(matches!(controller.outcome(), Some(Ok(_))));

        let unchanged = controller.inputs().clone();
        assert!(!controller.set_inputs(unchanged));
        assert!(!controller.refresh());

        let mut inputs = controller.inputs().clone();
        inputs.set("cibil_score", 850).unwrap();
        assert!(controller.set_inputs(inputs));
        assert!(controller.refresh());
        assert_eq!(controller.runs(), 2);
    }

    #[test]
    fn dragged_edits_fit_only_once_released() {
        let mut controller = DashboardController::new(table(), config());
        controller.refresh();
        assert_eq!(controller.runs(), 1);

        for score in [400, 500, 600, 700] {
            let mut inputs = controller.draft_inputs().clone();
            inputs.set("cibil_score", score).unwrap();
            assert!(!controller.edit_inputs(inputs, true));
            assert!(!controller.needs_refresh());
            assert!(!controller.refresh());
        }
        assert_eq!(controller.runs(), 1);
        assert_eq!(controller.draft_inputs().get("cibil_score"), Some(700));
        assert_ne!(controller.inputs().get("cibil_score"), Some(700));

        let released = controller.draft_inputs().clone();
        assert!(controller.edit_inputs(released, false));
        assert!(controller.refresh());
        assert_eq!(controller.runs(), 2);
        assert_eq!(controller.inputs().get("cibil_score"), Some(700));
        assert_eq!(controller.draft_inputs(), controller.inputs());
    }

    #[test]
    fn pipeline_failures_become_visible_text() {
        let table = NormalizedTable::new(
            vec!["cibil_score".into(), LABEL_COLUMN.into()],
            vec![vec![300.0, 0.0], vec![900.0, 1.0]],
        )
        .unwrap();
        let mut controller = DashboardController::new(table, config());
        controller.refresh();
        match controller.outcome() {
            Some(Err(message)) => assert!(message.contains("unexpected no_of_dependents")),
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[test]
    fn report_is_built_only_when_enabled() {
        let mut controller = DashboardController::new(table(), config());
        controller.refresh();
        assert!(controller.correlation().is_none());
        controller.set_extended_report(true);
        controller.refresh();
        assert_eq!(controller.correlation().map(|m| m.len()), Some(12));
        let hist = controller.histogram().unwrap().as_ref().unwrap();
        assert_eq!(hist.column, "cibil_score");
        assert_eq!(hist.total(0) + hist.total(1), 30);
    }

    #[test]
    fn report_selections_rebuild_without_refitting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut controller =
            DashboardController::new(table(), config()).with_config_path(path.clone());
        controller.set_extended_report(true);
        controller.refresh();
        controller.set_histogram_column("loan_term");
        assert!(controller.histogram().is_none());
        assert!(!controller.refresh());
        let hist = controller.histogram().unwrap().as_ref().unwrap();
        assert_eq!(hist.column, "loan_term");
        controller.set_extended_report(false);
        assert!(!controller.refresh());
        assert_eq!(controller.runs(), 1);

        let saved = config::load_from_path(&path).unwrap();
        assert!(saved.extended_report);
        assert_eq!(saved.report.histogram_column, "loan_term");
    }
}
