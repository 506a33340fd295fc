use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    imdb::PosterProvider,
    management::{PosterStore, StoreError},
    types::{ExistingPolicy, FetchOutcome, FetchReport, Identifier, PosterState},
    warning,
};

/// Fetches and saves posters for every identifier, in order.
///
/// Each identifier gets exactly one attempt. Failures are recorded in the
/// returned report and never stop the loop. With [`ExistingPolicy::Skip`] an
/// identifier that already has a poster on disk is not fetched at all; with
/// [`ExistingPolicy::Overwrite`] the old files are removed only once the new
/// ones are saved.
///
/// # Arguments
///
/// * `provider` - Source of the posters, [`crate::imdb::ImdbProvider`] in production
/// * `store` - Output directory the posters are written to
/// * `identifiers` - Codes in input order, duplicates allowed
/// * `existing` - What to do with identifiers that already have a poster
/// * `show_progress` - Draw a progress bar on the terminal
///
/// # Returns
///
/// A [`FetchReport`] with one outcome per identifier, in input order.
///
/// # Errors
///
/// Returns [`StoreError`] only if the output directory cannot be created,
/// which happens before any fetch.
///
/// # Example
///
/// ```
/// let provider = ImdbProvider::new(&settings)?;
/// let store = PosterStore::new(settings.posters_dir.clone());
/// let report = fetch_all(&provider, &store, &codes, ExistingPolicy::Skip, true).await?;
/// println!("{} saved", report.saved().len());
/// ```
pub async fn fetch_all<P: PosterProvider>(
    provider: &P,
    store: &PosterStore,
    identifiers: &[Identifier],
    existing: ExistingPolicy,
    show_progress: bool,
) -> Result<FetchReport, StoreError> {
    store.ensure().await?;

    let pb = if show_progress {
        ProgressBar::new(identifiers.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::with_template("{bar:30.blue} ({pos}/{len}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut report = FetchReport::default();

    for identifier in identifiers {
        pb.set_message(format!("Fetching poster for {identifier}"));

        let outcome = fetch_one(provider, store, identifier, existing, &pb).await;
        if outcome.state == PosterState::Failed {
            pb.suspend(|| {
                warning!(
                    "{}: {}",
                    identifier,
                    outcome.reason.as_deref().unwrap_or("unknown error")
                )
            });
        }

        report.outcomes.push(outcome);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(report)
}

async fn fetch_one<P: PosterProvider>(
    provider: &P,
    store: &PosterStore,
    identifier: &Identifier,
    existing: ExistingPolicy,
    pb: &ProgressBar,
) -> FetchOutcome {
    let mut outcome = FetchOutcome {
        identifier: identifier.clone(),
        title: None,
        state: PosterState::Pending,
        files: Vec::new(),
        reason: None,
    };

    let present = match store.artifacts_for(identifier).await {
        Ok(present) => present,
        Err(e) => return failed(outcome, format!("write failed: {e}")),
    };

    if existing == ExistingPolicy::Skip && !present.is_empty() {
        outcome.state = PosterState::Skipped;
        outcome.files = present.iter().map(|a| a.file_name()).collect();
        return outcome;
    }

    outcome.state = PosterState::Fetching;
    let set = match provider.fetch(identifier).await {
        Ok(set) if set.posters.is_empty() => return failed(outcome, "no poster image found".to_string()),
        Ok(set) => set,
        Err(e) => return failed(outcome, e.to_string()),
    };
    outcome.title = set.title;

    let saved = match store.save(identifier, &set.posters).await {
        Ok(saved) => saved,
        Err(e) => return failed(outcome, format!("write failed: {e}")),
    };

    // Old files that the new save did not replace under the same name.
    for stale in present.iter().filter(|a| !saved.iter().any(|s| s.path == a.path)) {
        if let Err(e) = store.remove(stale).await {
            pb.suspend(|| warning!("{}: could not remove {}: {}", identifier, stale.file_name(), e));
        }
    }

    outcome.state = PosterState::Saved;
    outcome.files = saved.iter().map(|a| a.file_name()).collect();
    outcome
}

fn failed(mut outcome: FetchOutcome, reason: String) -> FetchOutcome {
    outcome.state = PosterState::Failed;
    outcome.reason = Some(reason);
    outcome
}
