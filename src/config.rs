//! Configuration management for posterpick.
//!
//! Settings are resolved in three layers:
//! 1. Command line flags (highest priority, applied by the CLI layer)
//! 2. Environment variables
//! 3. The `.env` file in the local data directory
//!
//! Anything left unset falls back to the classic defaults:
//! `imdb_codes.txt` as input and `posters/` as output, both relative to the
//! working directory.

use std::{env, path::PathBuf, time::Duration};

use crate::types::ExistingPolicy;

pub const DEFAULT_CODES_FILE: &str = "imdb_codes.txt";
pub const DEFAULT_POSTERS_DIR: &str = "posters";
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com/title/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CANDIDATES: u32 = 1;
pub const DEFAULT_MAX_WIDTH: u32 = 145;
// Tall enough that the width is what limits a poster.
pub const DEFAULT_MAX_HEIGHT: u32 = 400;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/posterpick/.env`
/// - macOS: `~/Library/Application Support/posterpick/.env`
/// - Windows: `%LOCALAPPDATA%/posterpick/.env`
///
/// A missing file is not an error, every setting has a default. Variables
/// that are already present in the environment are not overridden.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("posterpick");
    path
}

fn env_path() -> PathBuf {
    data_dir().join(".env")
}

/// Resolved runtime settings, threaded explicitly through the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub codes_file: PathBuf,
    pub posters_dir: PathBuf,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub candidates: u32,
    pub existing: ExistingPolicy,
    /// Bounding box `(width, height)` posters are shrunk into, `None` keeps
    /// the downloaded bytes untouched.
    pub thumbnail: Option<(u32, u32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            codes_file: PathBuf::from(DEFAULT_CODES_FILE),
            posters_dir: PathBuf::from(DEFAULT_POSTERS_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            candidates: DEFAULT_CANDIDATES,
            existing: ExistingPolicy::default(),
            thumbnail: Some((DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT)),
        }
    }
}

impl Settings {
    /// Builds settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Empty values count as unset. Numbers that fail to parse fall back to
    /// their default. A maximum width or height of `0` turns thumbnailing off.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let mut base_url = get("POSTERPICK_BASE_URL").unwrap_or(defaults.base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let number = |key: &str, default: u32| {
            get(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };
        let thumbnail = match (
            number("POSTERPICK_MAX_WIDTH", DEFAULT_MAX_WIDTH),
            number("POSTERPICK_MAX_HEIGHT", DEFAULT_MAX_HEIGHT),
        ) {
            (0, _) | (_, 0) => None,
            size => Some(size),
        };

        Self {
            codes_file: get("POSTERPICK_CODES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.codes_file),
            posters_dir: get("POSTERPICK_POSTERS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.posters_dir),
            base_url,
            user_agent: get("POSTERPICK_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout: get("POSTERPICK_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            candidates: get("POSTERPICK_CANDIDATES")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.candidates),
            existing: defaults.existing,
            thumbnail,
        }
    }
}
