use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Parses an IMDB title identifier such as `tt0111161`.
    ///
    /// Surrounding whitespace is ignored. The token must be `tt` followed by at
    /// least seven ASCII digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw.strip_prefix("tt")?;
        if digits.len() >= 7 && digits.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One downloaded image candidate.
#[derive(Debug, Clone)]
pub struct Poster {
    pub bytes: Vec<u8>,
    pub extension: String,
    pub source_url: String,
}

/// Everything a provider returned for one identifier.
#[derive(Debug, Clone)]
pub struct PosterSet {
    pub title: Option<String>,
    pub posters: Vec<Poster>,
}

/// A poster file inside the output directory.
///
/// `candidate` is set for numbered files (`tt0111161.2.jpg`) that still wait
/// for the operator to pick one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub identifier: Identifier,
    pub candidate: Option<u32>,
    pub extension: String,
    pub path: PathBuf,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        artifact_file_name(&self.identifier, self.candidate, &self.extension)
    }
}

pub fn artifact_file_name(identifier: &Identifier, candidate: Option<u32>, extension: &str) -> String {
    match candidate {
        Some(n) => format!("{identifier}.{n}.{extension}"),
        None => format!("{identifier}.{extension}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosterState {
    Pending,
    Fetching,
    Saved,
    Skipped,
    Failed,
    Kept,
    Discarded,
}

impl fmt::Display for PosterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Saved => "saved",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Kept => "kept",
            Self::Discarded => "discarded",
        };
        f.write_str(label)
    }
}

/// What to do with identifiers that already have posters on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingPolicy {
    #[default]
    Skip,
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub identifier: Identifier,
    pub title: Option<String>,
    pub state: PosterState,
    pub files: Vec<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchReport {
    pub outcomes: Vec<FetchOutcome>,
}

impl FetchReport {
    pub fn saved(&self) -> Vec<&FetchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.state == PosterState::Saved)
            .collect()
    }

    pub fn skipped(&self) -> Vec<&FetchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.state == PosterState::Skipped)
            .collect()
    }

    pub fn failed(&self) -> Vec<&FetchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.state == PosterState::Failed)
            .collect()
    }

    pub fn failed_identifiers(&self) -> Vec<String> {
        self.failed()
            .into_iter()
            .map(|o| o.identifier.to_string())
            .collect()
    }

    pub fn table_rows(&self) -> Vec<OutcomeTableRow> {
        self.outcomes
            .iter()
            .map(|o| OutcomeTableRow {
                identifier: o.identifier.to_string(),
                title: o.title.clone().unwrap_or_default(),
                state: o.state.to_string(),
                detail: match &o.reason {
                    Some(reason) => reason.clone(),
                    None => o.files.join(", "),
                },
            })
            .collect()
    }
}

#[derive(Tabled)]
pub struct OutcomeTableRow {
    pub identifier: String,
    pub title: String,
    pub state: String,
    pub detail: String,
}

/// A fetch report as persisted after each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: i64,
    pub finished_at: i64,
    pub codes_file: String,
    pub posters_dir: String,
    pub report: FetchReport,
}

/// All posters of one identifier, presented together for review.
#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub identifier: Identifier,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Discard,
    /// Keep candidate `n` (1-based) as the only poster.
    Pick(u32),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedArtifact {
    pub file_name: String,
    pub state: PosterState,
}

#[derive(Debug, Clone, Default)]
pub struct CurationReport {
    pub entries: Vec<CuratedArtifact>,
    pub stopped_early: bool,
}

impl CurationReport {
    pub fn kept(&self) -> Vec<&str> {
        self.with_state(PosterState::Kept)
    }

    pub fn discarded(&self) -> Vec<&str> {
        self.with_state(PosterState::Discarded)
    }

    fn with_state(&self, state: PosterState) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.state == state)
            .map(|e| e.file_name.as_str())
            .collect()
    }
}
