use crate::{
    config::Settings,
    curation::{self, ConsolePrompt},
    error, info,
    management::PosterStore,
    success, warning,
};

/// Reviews the posters already in the output directory.
///
/// # Arguments
///
/// * `settings` - Only `posters_dir` is used
///
/// # Errors
///
/// Exits with code 1 if the output directory does not exist or cannot be
/// read. Quitting the review early is not an error.
pub async fn review(settings: &Settings) {
    let store = PosterStore::new(settings.posters_dir.clone());
    if !store.dir().is_dir() {
        error!("No poster directory at {}", store.dir().display());
    }

    run_review(&store).await;
}

/// Runs the console review over `store` and prints how many posters were
/// kept and discarded.
pub(super) async fn run_review(store: &PosterStore) {
    let mut prompt = ConsolePrompt::stdio();

    let report = match curation::review(store, &mut prompt).await {
        Ok(report) => report,
        Err(e) => error!("Review aborted. Err: {}", e),
    };

    if report.entries.is_empty() && !report.stopped_early {
        warning!("No posters to review in {}", store.dir().display());
        return;
    }

    success!(
        "Kept {} and discarded {} posters",
        report.kept().len(),
        report.discarded().len()
    );
    if report.stopped_early {
        info!("Review stopped early, remaining posters were left untouched");
    }
}
