use std::fmt::Write as _;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Header laid out like the published loan approval CSV, leading spaces included.
pub const HEADER: &str = "loan_id, no_of_dependents, education, self_employed, income_annum, \
loan_amount, loan_term, cibil_score, residential_assets_value, commercial_assets_value, \
luxury_assets_value, bank_asset_value, loan_status";

/// Deterministic synthetic applications whose outcome follows the credit score.
pub fn loan_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::from(HEADER);
    out.push('\n');
    for id in 1..=rows {
        let cibil: i64 = rng.random_range(300..=900);
        let income: i64 = rng.random_range(2..=99) * 100_000;
        let loan_amount = (income * rng.random_range(1..=4)).min(39_500_000);
        // A thin band of noise keeps the boundary from being perfectly clean.
        let approved = if (540..=560).contains(&cibil) {
            rng.random_bool(0.5)
        } else {
            cibil > 550
        };
        let _ = writeln!(
            out,
            "{id}, {}, {}, {}, {income}, {loan_amount}, {}, {cibil}, {}, {}, {}, {}, {}",
            rng.random_range(0..=5),
            if rng.random_bool(0.5) { "Graduate" } else { "Not Graduate" },
            if rng.random_bool(0.3) { "Yes" } else { "No" },
            rng.random_range(1..=10) * 2,
            rng.random_range(0..=290) * 100_000,
            rng.random_range(0..=194) * 100_000,
            rng.random_range(3..=392) * 100_000,
            rng.random_range(0..=147) * 100_000,
            if approved { "Approved" } else { "Rejected" },
        );
    }
    out
}

pub fn write_loan_csv(path: &Path, rows: usize, seed: u64) {
    std::fs::write(path, loan_csv(rows, seed)).expect("write loan csv");
}
