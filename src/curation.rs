//! Interactive review of downloaded posters.
//!
//! The review loop walks the output directory one identifier at a time and
//! asks a [`DecisionProvider`] what to do with its posters. The console
//! implementation reads answers from any `BufRead`, so tests drive the same
//! loop with scripted input.

use std::io::{self, BufRead, Write};

use crate::{
    management::{PosterStore, StoreError},
    types::{CuratedArtifact, CurationReport, Decision, PosterState, ReviewItem},
    warning,
};

pub trait DecisionProvider {
    fn decide(&mut self, item: &ReviewItem) -> Decision;
}

/// Runs the review loop over everything currently in `store`.
///
/// Stops after the last identifier or on [`Decision::Quit`]; posters not
/// reviewed yet are left untouched.
pub async fn review<D: DecisionProvider>(
    store: &PosterStore,
    decider: &mut D,
) -> Result<CurationReport, StoreError> {
    let mut report = CurationReport::default();

    for item in store.review_items().await? {
        match decider.decide(&item) {
            Decision::Quit => {
                report.stopped_early = true;
                break;
            }
            Decision::Keep => keep_all(&item, &mut report),
            Decision::Discard => {
                for artifact in &item.artifacts {
                    store.remove(artifact).await?;
                    report.entries.push(CuratedArtifact {
                        file_name: artifact.file_name(),
                        state: PosterState::Discarded,
                    });
                }
            }
            Decision::Pick(n) => {
                let index = (n as usize).checked_sub(1);
                let Some(keeper) = index.and_then(|i| item.artifacts.get(i)) else {
                    warning!(
                        "{}: no poster number {}, keeping all of them",
                        item.identifier,
                        n
                    );
                    keep_all(&item, &mut report);
                    continue;
                };

                for artifact in item.artifacts.iter().filter(|a| *a != keeper) {
                    store.remove(artifact).await?;
                    report.entries.push(CuratedArtifact {
                        file_name: artifact.file_name(),
                        state: PosterState::Discarded,
                    });
                }

                let kept = store.promote(keeper).await?;
                report.entries.push(CuratedArtifact {
                    file_name: kept.file_name(),
                    state: PosterState::Kept,
                });
            }
        }
    }

    Ok(report)
}

fn keep_all(item: &ReviewItem, report: &mut CurationReport) {
    report
        .entries
        .extend(item.artifacts.iter().map(|a| CuratedArtifact {
            file_name: a.file_name(),
            state: PosterState::Kept,
        }));
}

/// Asks the operator on a terminal-like pair of streams.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn decide_single(&mut self, item: &ReviewItem) -> Decision {
        let file = item
            .artifacts
            .first()
            .map(|a| a.file_name())
            .unwrap_or_default();
        let prompt = format!("{} ({file}) [K]eep, [d]iscard, [q]uit? ", item.identifier);

        loop {
            let Some(answer) = ask(&mut self.input, &mut self.output, &prompt) else {
                return Decision::Quit;
            };

            match answer.to_ascii_lowercase().as_str() {
                "" | "k" | "keep" => return Decision::Keep,
                "d" | "discard" => return Decision::Discard,
                "q" | "quit" => return Decision::Quit,
                _ => {
                    let _ = writeln!(self.output, "Please answer k, d or q.");
                }
            }
        }
    }

    fn decide_multiple(&mut self, item: &ReviewItem) -> Decision {
        let total = item.artifacts.len();
        for (i, artifact) in item.artifacts.iter().enumerate() {
            let _ = writeln!(self.output, "  {}) {}", i + 1, artifact.file_name());
        }
        let prompt = format!(
            "{} poster (1-{total}), [a]ll, [d]iscard, [q]uit? ",
            item.identifier
        );

        loop {
            let Some(answer) = ask(&mut self.input, &mut self.output, &prompt) else {
                return Decision::Quit;
            };

            match answer.to_ascii_lowercase().as_str() {
                "a" | "all" => return Decision::Keep,
                "d" | "discard" => return Decision::Discard,
                "q" | "quit" => return Decision::Quit,
                other => match other.parse::<u32>() {
                    Ok(n) if n >= 1 && n as usize <= total => return Decision::Pick(n),
                    _ => {
                        let _ = writeln!(self.output, "Please choose a number (1-{total}).");
                    }
                },
            }
        }
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsolePrompt<R, W> {
    fn decide(&mut self, item: &ReviewItem) -> Decision {
        if item.artifacts.len() > 1 {
            self.decide_multiple(item)
        } else {
            self.decide_single(item)
        }
    }
}

/// Yes/no question defaulting to yes; only an answer starting with `n` says no.
///
/// End of input counts as no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> bool {
    match ask(input, output, prompt) {
        Some(answer) => !answer.to_ascii_lowercase().starts_with('n'),
        None => false,
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Option<String> {
    write!(output, "{prompt}").ok()?;
    output.flush().ok()?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
