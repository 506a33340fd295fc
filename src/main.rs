use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use posterpick::{
    cli,
    codes::BlankLines,
    config::{self, Settings},
    types::ExistingPolicy,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
  args_conflicts_with_subcommands = true // fetch flags only apply without a subcommand
)]
struct Cli {
    #[clap(flatten)]
    fetch: FetchOptions,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Review posters already in the output directory
    Review(ReviewOptions),

    /// Show the summary of the last fetch run
    Report,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FetchOptions {
    /// File with one IMDB code per line
    #[clap(long)]
    pub codes: Option<PathBuf>,

    /// Directory the posters are saved to
    #[clap(long)]
    pub out: Option<PathBuf>,

    /// Download again even if posters for a code already exist
    #[clap(long)]
    pub overwrite: bool,

    /// Abort on blank lines or malformed codes instead of skipping them
    #[clap(long)]
    pub strict: bool,

    /// Number of poster candidates to download per movie
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub candidates: Option<u32>,

    /// Store posters exactly as downloaded instead of shrinking them
    #[clap(long)]
    pub as_served: bool,

    /// Start the review right after downloading
    #[clap(long, conflicts_with = "no_curate")]
    pub curate: bool,

    /// Skip the review and leave all posters in place
    #[clap(long)]
    pub no_curate: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ReviewOptions {
    /// Directory holding the posters to review
    #[clap(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file, using defaults. Err: {}", e);
    }

    let cli = Cli::parse();
    let mut settings = Settings::from_env();

    match cli.command {
        None => {
            let opt = cli.fetch;
            if let Some(codes) = opt.codes {
                settings.codes_file = codes;
            }
            if let Some(out) = opt.out {
                settings.posters_dir = out;
            }
            if let Some(candidates) = opt.candidates {
                settings.candidates = candidates;
            }
            if opt.overwrite {
                settings.existing = ExistingPolicy::Overwrite;
            }
            if opt.as_served {
                settings.thumbnail = None;
            }

            let blank_lines = if opt.strict {
                BlankLines::Reject
            } else {
                BlankLines::Skip
            };
            let curate = match (opt.curate, opt.no_curate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            cli::fetch(settings, blank_lines, curate).await
        }
        Some(Command::Review(opt)) => {
            if let Some(out) = opt.out {
                settings.posters_dir = out;
            }
            cli::review(&settings).await
        }
        Some(Command::Report) => cli::report().await,
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
