use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use crate::{
    types::{Artifact, Identifier, Poster, ReviewItem, artifact_file_name},
    warning,
};

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "poster directory error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// The output directory holding all poster files.
///
/// Files are named after their identifier, `tt0111161.jpg` for a single
/// poster and `tt0111161.2.jpg` for the second of several candidates.
/// Dotfiles are never touched, which also hides the `.part` files used while
/// a save is in progress.
///
/// # Example
///
/// ```
/// let store = PosterStore::new(PathBuf::from("posters"));
/// store.ensure().await?;
/// let saved = store.save(&identifier, &poster_set.posters).await?;
/// ```
pub struct PosterStore {
    dir: PathBuf,
}

impl PosterStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory and its parents if they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created, e.g.
    /// because a regular file already has its name.
    pub async fn ensure(&self) -> Result<(), StoreError> {
        async_fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Final location of a poster file.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Code the poster belongs to
    /// * `candidate` - Candidate number, `None` for the plain `<id>.<ext>` name
    /// * `extension` - File extension without the dot
    pub fn path_for(&self, identifier: &Identifier, candidate: Option<u32>, extension: &str) -> PathBuf {
        self.dir
            .join(artifact_file_name(identifier, candidate, extension))
    }

    /// Writes all posters of one identifier, or none of them.
    ///
    /// A single poster is saved as `<id>.<ext>`, several as `<id>.<n>.<ext>`.
    /// Every poster is first written to a hidden `.part` file next to its
    /// final name; only when all of them are on disk are they renamed into
    /// place. Existing files with the same final name are replaced.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Code the posters belong to
    /// * `posters` - Downloaded candidates in page order
    ///
    /// # Returns
    ///
    /// The saved artifacts in candidate order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if any write or rename fails. Staged files
    /// and posters already renamed by this call are removed again before
    /// returning, so a failed save leaves no new poster behind.
    pub async fn save(&self, identifier: &Identifier, posters: &[Poster]) -> Result<Vec<Artifact>, StoreError> {
        let numbered = posters.len() > 1;
        let mut staged: Vec<(PathBuf, Artifact)> = Vec::with_capacity(posters.len());

        for (index, poster) in posters.iter().enumerate() {
            let candidate = numbered.then_some(index as u32 + 1);
            let path = self.path_for(identifier, candidate, &poster.extension);
            let part = temp_path(&path);

            if let Err(e) = async_fs::write(&part, &poster.bytes).await {
                discard_paths(staged.iter().map(|(p, _)| p).chain([&part])).await;
                return Err(e.into());
            }

            staged.push((
                part,
                Artifact {
                    identifier: identifier.clone(),
                    candidate,
                    extension: poster.extension.clone(),
                    path,
                },
            ));
        }

        let mut saved: Vec<Artifact> = Vec::with_capacity(staged.len());
        for (index, (part, artifact)) in staged.iter().enumerate() {
            if let Err(e) = async_fs::rename(part, &artifact.path).await {
                discard_paths(saved.iter().map(|a| &a.path)).await;
                discard_paths(staged[index..].iter().map(|(p, _)| p)).await;
                return Err(e.into());
            }
            saved.push(artifact.clone());
        }

        Ok(saved)
    }

    /// Lists every poster in the directory, sorted by identifier and candidate.
    ///
    /// Dotfiles are ignored, other files that do not follow the naming scheme
    /// produce a warning. A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory exists but cannot be read.
    pub async fn artifacts(&self) -> Result<Vec<Artifact>, StoreError> {
        let (artifacts, foreign) = self.scan(None).await?;
        for name in foreign {
            warning!("File {} has the wrong name format. Ignoring.", name);
        }
        Ok(artifacts)
    }

    /// Lists the posters of one identifier.
    ///
    /// Unlike [`PosterStore::artifacts`] this stays silent about files that
    /// belong to nobody, it runs once per code during a fetch.
    pub async fn artifacts_for(&self, identifier: &Identifier) -> Result<Vec<Artifact>, StoreError> {
        let (artifacts, _) = self.scan(Some(identifier)).await?;
        Ok(artifacts)
    }

    /// Groups the directory content by identifier for review.
    pub async fn review_items(&self) -> Result<Vec<ReviewItem>, StoreError> {
        let mut items: Vec<ReviewItem> = Vec::new();

        for artifact in self.artifacts().await? {
            if let Some(item) = items
                .last_mut()
                .filter(|item| item.identifier == artifact.identifier)
            {
                item.artifacts.push(artifact);
                continue;
            }

            items.push(ReviewItem {
                identifier: artifact.identifier.clone(),
                artifacts: vec![artifact],
            });
        }

        Ok(items)
    }

    /// Deletes one poster file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be removed, including
    /// when it is already gone.
    pub async fn remove(&self, artifact: &Artifact) -> Result<(), StoreError> {
        async_fs::remove_file(&artifact.path).await?;
        Ok(())
    }

    /// Renames a numbered candidate to the plain `<id>.<ext>` name.
    ///
    /// An artifact that already carries the plain name is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the rename fails.
    pub async fn promote(&self, artifact: &Artifact) -> Result<Artifact, StoreError> {
        let path = self.path_for(&artifact.identifier, None, &artifact.extension);
        if path != artifact.path {
            async_fs::rename(&artifact.path, &path).await?;
        }

        Ok(Artifact {
            identifier: artifact.identifier.clone(),
            candidate: None,
            extension: artifact.extension.clone(),
            path,
        })
    }

    // Returns parsed artifacts (optionally of one identifier) and the names
    // of files that do not follow the scheme.
    async fn scan(&self, only: Option<&Identifier>) -> Result<(Vec<Artifact>, Vec<String>), StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), Vec::new())),
            Err(e) => return Err(e.into()),
        };

        let mut artifacts = Vec::new();
        let mut foreign = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            match parse_artifact_name(&name) {
                Some((identifier, candidate, extension)) => {
                    if only.is_some_and(|id| *id != identifier) {
                        continue;
                    }
                    artifacts.push(Artifact {
                        identifier,
                        candidate,
                        extension,
                        path: entry.path(),
                    });
                }
                None => foreign.push(name),
            }
        }

        artifacts.sort_by(|a, b| {
            a.identifier
                .cmp(&b.identifier)
                .then(a.candidate.cmp(&b.candidate))
                .then(a.extension.cmp(&b.extension))
        });
        foreign.sort();
        Ok((artifacts, foreign))
    }
}

/// Hidden staging name for a poster being written, `.tt0111161.jpg.part`.
fn temp_path(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_path.with_file_name(format!(".{name}.part"))
}

async fn discard_paths<'a, I>(paths: I)
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    for path in paths {
        let _ = async_fs::remove_file(path).await;
    }
}

/// Splits `tt0111161.jpg` or `tt0111161.2.jpg` into its parts.
pub fn parse_artifact_name(name: &str) -> Option<(Identifier, Option<u32>, String)> {
    let parts: Vec<&str> = name.split('.').collect();
    let (id, candidate, ext) = match parts.as_slice() {
        [id, ext] => (*id, None, *ext),
        [id, n, ext] => (*id, Some(n.parse::<u32>().ok()?), *ext),
        _ => return None,
    };

    if ext.is_empty() {
        return None;
    }
    Some((Identifier::parse(id)?, candidate, ext.to_string()))
}
