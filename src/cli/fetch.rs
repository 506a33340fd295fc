use std::io;

use chrono::Utc;

use crate::{
    codes::{self, BlankLines},
    config::Settings,
    curation, error,
    imdb::ImdbProvider,
    info,
    management::{PosterStore, RunReportManager},
    pipeline, success,
    types::RunReport,
    warning,
};

use super::{report::print_fetch_report, review::run_review};

/// Downloads the posters for every code in the codes file.
///
/// Loads and validates the codes, runs the fetch pipeline with a progress
/// bar, prints the outcome table and saves it as the last run report. When
/// `curate` is `None` the user is asked whether to review right away.
///
/// # Arguments
///
/// * `settings` - Resolved settings, CLI overrides already applied
/// * `blank_lines` - Whether blank lines and malformed codes abort the run
/// * `curate` - `Some(true)` reviews, `Some(false)` skips the review,
///   `None` asks with a `(Y/n)` prompt
///
/// # Errors
///
/// Does not return errors. A codes file that is missing or rejected in strict
/// mode, a failing HTTP client setup and an output directory that cannot be
/// created end the process with exit code 1. Failed posters only show up in
/// the report and the process exits with 0.
///
/// # Example
///
/// ```
/// let settings = Settings::from_env();
/// cli::fetch(settings, BlankLines::Skip, Some(false)).await;
/// ```
pub async fn fetch(settings: Settings, blank_lines: BlankLines, curate: Option<bool>) {
    let started_at = Utc::now().timestamp();

    info!("Loading IMDB codes from {}", settings.codes_file.display());
    let identifiers = match codes::load_codes(&settings.codes_file, blank_lines).await {
        Ok(identifiers) => identifiers,
        Err(e) => error!("Cannot load IMDB codes. Err: {}", e),
    };

    if identifiers.is_empty() {
        warning!(
            "No IMDB codes found in {}. Nothing to do.",
            settings.codes_file.display()
        );
        return;
    }
    success!("Loaded {} codes", identifiers.len());

    let provider = match ImdbProvider::new(&settings) {
        Ok(provider) => provider,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };
    let store = PosterStore::new(settings.posters_dir.clone());

    info!("Downloading posters to {}", store.dir().display());
    let report = match pipeline::fetch_all(
        &provider,
        &store,
        &identifiers,
        settings.existing,
        true,
    )
    .await
    {
        Ok(report) => report,
        Err(e) => error!("Cannot prepare {}. Err: {}", store.dir().display(), e),
    };

    print_fetch_report(&report);

    let run = RunReport {
        started_at,
        finished_at: Utc::now().timestamp(),
        codes_file: settings.codes_file.display().to_string(),
        posters_dir: settings.posters_dir.display().to_string(),
        report,
    };
    if let Err(e) = RunReportManager::new(run).persist().await {
        warning!("Cannot save run report. Err: {}", e);
    }

    let curate = match curate {
        Some(curate) => curate,
        None => curation::confirm(
            "Done downloading. Choose posters to keep? (Y/n) ",
            &mut io::stdin().lock(),
            &mut io::stdout(),
        ),
    };

    if curate {
        run_review(&store).await;
    } else {
        info!("Posters left in {} for manual review", store.dir().display());
    }
}
