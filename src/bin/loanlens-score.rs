//! Headless scorer: fit on the loan dataset and score one applicant row.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use loanlens::config;
use loanlens::dataset::{NormalizedTable, load_dataset};
use loanlens::input::ApplicantInputs;
use loanlens::logging;
use loanlens::ml::forest::{ForestOptions, TrainDataset};
use loanlens::ml::metrics::{ConfusionMatrix, PerClassStats, accuracy, precision_recall_by_class};
use loanlens::pipeline::{self, CLASS_NAMES, Prediction, TrainingSet};

const HOLDOUT_SEED: u64 = 42;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init_console() {
        eprintln!("Logging disabled: {err}");
    }

    let config = config::load_or_default().map_err(|err| err.to_string())?;
    let dataset = options.dataset.clone().unwrap_or(config.dataset_path.clone());
    let table = load_dataset(&dataset).map_err(|err| err.to_string())?;

    let mut forest = config.forest.to_options();
    if options.seed.is_some() {
        forest.seed = options.seed;
    }
    if let Some(trees) = options.trees {
        forest.n_trees = trees;
    }

    let mut inputs = ApplicantInputs::default();
    for assignment in &options.assignments {
        inputs.apply_assignment(assignment).map_err(|err| err.to_string())?;
    }
    let row = inputs.to_feature_row();
    let prediction = pipeline::run(&table, &row, &forest).map_err(|err| err.to_string())?;

    let holdout = match options.holdout {
        Some(fraction) => Some(evaluate_holdout(&table, fraction, &forest)?),
        None => None,
    };

    let report = ScoreReport {
        dataset: dataset.display().to_string(),
        rows: table.len(),
        features: row
            .iter()
            .map(|(name, value)| FeatureValue {
                name: name.to_string(),
                value,
            })
            .collect(),
        label_name: prediction.label_name(),
        prediction,
        holdout,
    };

    if options.json {
        let text = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{text}");
    } else {
        print_report(&report);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    dataset: String,
    rows: usize,
    features: Vec<FeatureValue>,
    prediction: Prediction,
    label_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    holdout: Option<HoldoutReport>,
}

#[derive(Debug, Serialize)]
struct FeatureValue {
    name: String,
    value: f64,
}

#[derive(Debug, Serialize)]
struct HoldoutReport {
    fraction: f64,
    train_rows: usize,
    test_rows: usize,
    accuracy: f64,
    per_class: Vec<PerClassStats>,
    /// Rows are true labels, columns predicted labels.
    confusion: Vec<Vec<u32>>,
}

fn print_report(report: &ScoreReport) {
    println!("dataset: {} ({} rows)", report.dataset, report.rows);
    println!("feature row:");
    for feature in &report.features {
        println!("  {:<26} {:>12}", feature.name, feature.value);
    }
    println!(
        "prediction: {} ({})",
        report.prediction.label, report.label_name
    );
    for (idx, name) in CLASS_NAMES.iter().enumerate() {
        println!(
            "  P({idx} {name:<8}) = {:.4}",
            report.prediction.probabilities[idx]
        );
    }
    let Some(holdout) = &report.holdout else {
        return;
    };
    println!(
        "holdout {:.2}: train={} test={}",
        holdout.fraction, holdout.train_rows, holdout.test_rows
    );
    println!("test accuracy: {:.4}", holdout.accuracy);
    for (idx, stats) in holdout.per_class.iter().enumerate() {
        println!(
            "class {idx} {:<8}  precision={:.3}  recall={:.3}  support={}",
            CLASS_NAMES[idx], stats.precision, stats.recall, stats.support
        );
    }
    println!("confusion matrix (rows=true, cols=pred):");
    for counts in &holdout.confusion {
        let row: String = counts.iter().map(|count| format!("{count:6}")).collect();
        println!("{row}");
    }
}

/// Fit on a shuffled `1 - fraction` share of the table and score the rest.
fn evaluate_holdout(
    table: &NormalizedTable,
    fraction: f64,
    forest: &ForestOptions,
) -> Result<HoldoutReport, String> {
    let training = pipeline::split_features_labels(table).map_err(|err| err.to_string())?;
    let total = training.data.x.len();
    let test_rows = ((total as f64) * fraction).round() as usize;
    if test_rows == 0 || test_rows >= total {
        return Err(format!(
            "Holdout {fraction} leaves no rows to {} on ({total} rows)",
            if test_rows == 0 { "test" } else { "train" }
        ));
    }

    let mut order: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(forest.seed.unwrap_or(HOLDOUT_SEED));
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(test_rows);

    let subset = |indices: &[usize]| TrainDataset {
        n_classes: training.data.n_classes,
        x: indices.iter().map(|&i| training.data.x[i].clone()).collect(),
        y: indices.iter().map(|&i| training.data.y[i]).collect(),
    };
    let fitted = pipeline::fit_training_set(
        TrainingSet {
            columns: training.columns.clone(),
            data: subset(train_idx),
        },
        forest,
    )
    .map_err(|err| err.to_string())?;

    let mut cm = ConfusionMatrix::new(training.data.n_classes);
    for &i in test_idx {
        let prediction = fitted
            .score_aligned(&training.data.x[i])
            .map_err(|err| err.to_string())?;
        cm.add(training.data.y[i], usize::from(prediction.label));
    }
    let confusion = (0..cm.n_classes)
        .map(|truth| (0..cm.n_classes).map(|pred| cm.get(truth, pred)).collect())
        .collect();
    Ok(HoldoutReport {
        fraction,
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        accuracy: accuracy(&cm),
        per_class: precision_recall_by_class(&cm),
        confusion,
    })
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    dataset: Option<PathBuf>,
    seed: Option<u64>,
    trees: Option<usize>,
    assignments: Vec<String>,
    holdout: Option<f64>,
    json: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions {
        dataset: None,
        seed: None,
        trees: None,
        assignments: Vec::new(),
        holdout: None,
        json: false,
    };

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--dataset" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--dataset requires a value".to_string())?;
                options.dataset = Some(PathBuf::from(value));
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--trees" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--trees requires a value".to_string())?;
                let trees = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --trees value: {value}"))?;
                if trees == 0 || trees > config::MAX_TREES {
                    return Err(format!("--trees must be within 1..={}", config::MAX_TREES));
                }
                options.trees = Some(trees);
            }
            "--set" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--set requires name=value".to_string())?;
                options.assignments.push(value.clone());
            }
            "--holdout" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--holdout requires a value".to_string())?;
                let fraction = value
                    .parse::<f64>()
                    .ok()
                    .filter(|f| *f > 0.0 && *f < 1.0)
                    .ok_or_else(|| format!("--holdout must be between 0 and 1, got {value}"))?;
                options.holdout = Some(fraction);
            }
            "--json" => options.json = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(Some(options))
}

fn help_text() -> String {
    [
        "loanlens-score",
        "",
        "Fit the loan approval forest and score one applicant.",
        "",
        "Usage:",
        "  loanlens-score [--dataset <csv>] [--seed <u64>] [--trees <n>]",
        "                 [--set name=value]... [--holdout <fraction>] [--json]",
        "",
        "Options:",
        "  --dataset <csv>      Dataset CSV (default: configured dataset_path).",
        "  --seed <u64>         Fix the forest seed.",
        "  --trees <n>          Number of trees (default: configured n_trees).",
        "  --set name=value     Override one applicant attribute; repeatable.",
        "  --holdout <f>        Also report metrics on a held-out share of rows.",
        "  --json               Print the result as JSON.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_repeated_assignments_and_flags() {
        let options = parse_args(args(&[
            "--dataset",
            "loans.csv",
            "--seed",
            "7",
            "--set",
            "cibil_score=750",
            "--set",
            "loan_term=10",
            "--holdout",
            "0.2",
            "--json",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(options.dataset, Some(PathBuf::from("loans.csv")));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.assignments, vec!["cibil_score=750", "loan_term=10"]);
        assert_eq!(options.holdout, Some(0.2));
        assert!(options.json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_args(args(&["--holdout", "1.5"])).is_err());
        assert!(parse_args(args(&["--trees", "0"])).is_err());
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--bogus"])).unwrap_err().contains("Unknown argument"));
    }

    #[test]
    fn help_exits_without_options() {
        assert_eq!(parse_args(args(&["--help"])), Ok(None));
        assert_eq!(parse_args(args(&["--json", "-h"])), Ok(None));
        assert!(parse_args(Vec::new()).unwrap().is_some());
    }
}
