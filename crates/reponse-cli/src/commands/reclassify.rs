//! The `reponse reclassify` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use reponse_batch::{BatchClassifier, BatchConfig, BatchProgress, BatchReport, JsonFileStore};
use reponse_core::model::Difficulty;
use reponse_judge::{load_config_from, HttpJudge};

/// Console progress feed, a single line rewritten in place after every
/// settled batch.
struct ConsoleProgress;

impl BatchProgress for ConsoleProgress {
    fn on_batch(&self, processed: usize, total: usize, changed: usize, unchanged: usize, errors: usize) {
        let percent = if total == 0 {
            100
        } else {
            processed * 100 / total
        };
        eprint!(
            "\r  processed {processed}/{total} ({percent}%) changed {changed} unchanged {unchanged} errors {errors}"
        );
    }
}

pub async fn execute(
    questions_path: PathBuf,
    report_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let store = Arc::new(JsonFileStore::load(&questions_path)?);
    eprintln!(
        "reponse reclassify — {} questions from {}",
        store.len(),
        questions_path.display()
    );

    let rater = Arc::new(HttpJudge::new(&config.judge));
    let batch_config = BatchConfig {
        page_size: config.batch.page_size,
        batch_size: config.batch.batch_size,
    };
    let classifier = BatchClassifier::new(rater, store, batch_config);

    let report = classifier.run(&ConsoleProgress).await?;
    eprintln!();

    print_summary(&report);

    if let Some(path) = report_path {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec![
        "Original \\ Assigned",
        "Beginner",
        "Intermediate",
        "Advanced",
    ]);
    for original in Difficulty::ALL {
        let mut row = vec![Cell::new(original.to_string())];
        for assigned in Difficulty::ALL {
            row.push(Cell::new(report.matrix.get(original, assigned).to_string()));
        }
        table.add_row(row);
    }
    eprintln!("\n{table}");

    let percent_changed = if report.total == 0 {
        0.0
    } else {
        report.changed as f64 * 100.0 / report.total as f64
    };
    eprintln!(
        "\nTotal: {} | changed {} ({:.1}%) | unchanged {} | errors {}",
        report.total, report.changed, percent_changed, report.unchanged, report.errors
    );
    eprintln!(
        "Distribution: beginner {} / intermediate {} / advanced {} ({}ms)",
        report.distribution[0], report.distribution[1], report.distribution[2], report.duration_ms
    );
}
