//! IMDB Poster Picker Library
//!
//! This library provides functionality for downloading movie posters for a
//! list of IMDB identifiers and for curating the downloaded images afterwards.
//! It includes modules for loading identifiers, talking to IMDB, storing
//! posters on disk, running the fetch pipeline and reviewing the results.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `codes` - Loading and validating IMDB identifiers from a text file
//! - `config` - Configuration management and environment variables
//! - `curation` - Interactive review of downloaded posters
//! - `imdb` - IMDB page scraping and poster download
//! - `management` - Poster directory and run report persistence
//! - `pipeline` - Sequential fetch-and-save loop over all identifiers
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use posterpick::{codes, config, imdb, management::PosterStore, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> posterpick::Res<()> {
//!     let settings = config::Settings::from_env();
//!     let ids = codes::load_codes(&settings.codes_file, codes::BlankLines::Skip).await?;
//!     let provider = imdb::ImdbProvider::new(&settings)?;
//!     let store = PosterStore::new(settings.posters_dir.clone());
//!     let report = pipeline::fetch_all(&provider, &store, &ids, settings.existing, false).await?;
//!     println!("{} failed", report.failed().len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod codes;
pub mod config;
pub mod curation;
pub mod imdb;
pub mod management;
pub mod pipeline;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Used by glue code that combines several error types, mostly the command
/// handlers and examples. Module level operations return their own error
/// enums instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading IMDB codes from {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Saved {} posters", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only used
/// for fatal errors such as a missing input file.
///
/// # Example
///
/// ```
/// error!("Cannot read {}", path.display());
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a single poster that failed to download.
///
/// # Example
///
/// ```
/// warning!("Skipping malformed line {}", line);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
