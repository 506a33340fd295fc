use std::{fmt, io, path::Path, path::PathBuf};

use crate::{types::Identifier, warning};

/// How blank and malformed lines in the codes file are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankLines {
    /// Blank lines are ignored, malformed identifiers are skipped with a warning.
    #[default]
    Skip,
    /// Blank lines and malformed identifiers abort loading.
    Reject,
}

#[derive(Debug)]
pub enum LoadError {
    FileNotFound(PathBuf),
    Io(io::Error),
    InvalidInput { line: usize, reason: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "codes file not found: {}", path.display()),
            Self::Io(err) => write!(f, "cannot read codes file: {err}"),
            Self::InvalidInput { line, reason } => write!(f, "line {line}: {reason}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::FileNotFound(_) | Self::InvalidInput { .. } => None,
        }
    }
}

/// Reads IMDB identifiers from `path`, one per line, in file order.
///
/// Lines starting with `#` are comments. Duplicates are kept.
pub async fn load_codes(path: &Path, blank_lines: BlankLines) -> Result<Vec<Identifier>, LoadError> {
    let content = async_fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::FileNotFound(path.to_path_buf())
        } else {
            LoadError::Io(e)
        }
    })?;

    parse_codes(&content, blank_lines)
}

pub fn parse_codes(content: &str, blank_lines: BlankLines) -> Result<Vec<Identifier>, LoadError> {
    let mut codes = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if trimmed.starts_with('#') {
            continue;
        }

        if trimmed.is_empty() {
            match blank_lines {
                BlankLines::Skip => continue,
                BlankLines::Reject => {
                    return Err(LoadError::InvalidInput {
                        line,
                        reason: "empty line".to_string(),
                    });
                }
            }
        }

        match Identifier::parse(trimmed) {
            Some(id) => codes.push(id),
            None => match blank_lines {
                BlankLines::Skip => warning!("Ignoring malformed IMDB code on line {}: {}", line, trimmed),
                BlankLines::Reject => {
                    return Err(LoadError::InvalidInput {
                        line,
                        reason: format!("malformed IMDB code '{trimmed}'"),
                    });
                }
            },
        }
    }

    Ok(codes)
}
