use chrono::DateTime;
use tabled::Table;

use crate::{
    info,
    management::RunReportManager,
    success,
    types::FetchReport,
    warning,
};

/// Prints the summary of the last fetch run.
///
/// A missing or unreadable report is a warning, not an error; the process
/// still exits with 0.
///
/// # Example
///
/// ```bash
/// posterpick report
/// ```
pub async fn report() {
    let manager = match RunReportManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            warning!("No run report available yet. Run posterpick first.\n Error: {}", e);
            return;
        }
    };

    let run = manager.report();
    let started = DateTime::from_timestamp(run.started_at, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| run.started_at.to_string());

    info!(
        "Last run: {} ({}s), codes from {}, posters in {}",
        started,
        run.finished_at - run.started_at,
        run.codes_file,
        run.posters_dir
    );
    print_fetch_report(&run.report);
}

pub(super) fn print_fetch_report(report: &FetchReport) {
    if report.outcomes.is_empty() {
        return;
    }

    let table = Table::new(report.table_rows());
    println!("{}", table);

    success!(
        "{} saved, {} already present, {} failed",
        report.saved().len(),
        report.skipped().len(),
        report.failed().len()
    );

    let failed = report.failed_identifiers();
    if !failed.is_empty() {
        warning!("Failed: {}", failed.join(", "));
    }
}
