use std::{net::SocketAddr, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::{config::LIBRARY_ENV, render, store::DEFAULT_HIT_LIMIT};

#[derive(Debug, Parser)]
#[command(
    name = "quotegif",
    about = "Quote search over the subtitles of a video library"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index a library and serve the search and render API
    Serve(ServeArgs),
    /// Index a library and run a single query
    Search(SearchArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Serve --

#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Root directory of the media library
    #[arg(env = LIBRARY_ENV)]
    pub library: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Line hits fetched per query before de-duplication
    #[arg(long, default_value_t = DEFAULT_HIT_LIMIT)]
    pub hits: usize,

    /// Directory for rendered clips
    #[arg(long)]
    pub render_dir: Option<PathBuf>,

    /// Font used to draw captions
    #[arg(long, default_value = render::DEFAULT_FONT)]
    pub font: PathBuf,

    /// ffmpeg binary
    #[arg(long, default_value = render::DEFAULT_FFMPEG)]
    pub ffmpeg: PathBuf,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Root directory of the media library
    #[arg(long, short = 'l', env = LIBRARY_ENV)]
    pub library: Option<PathBuf>,

    /// The search query
    pub query: String,

    /// Line hits fetched per query before de-duplication
    #[arg(long, default_value_t = DEFAULT_HIT_LIMIT)]
    pub hits: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Print every match without trimming or ordering
    #[arg(long)]
    pub raw: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "quotegif",
            &mut std::io::stdout(),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_search_defaults() {
        let cli =
            Cli::parse_from(["quotegif", "search", "-l", "/tv", "kenobi"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "kenobi");
                assert_eq!(args.library, Some(PathBuf::from("/tv")));
                assert_eq!(args.hits, DEFAULT_HIT_LIMIT);
                assert!(!args.json);
                assert!(!args.raw);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::parse_from([
            "quotegif",
            "-vv",
            "serve",
            "/tv",
            "--addr",
            "127.0.0.1:9000",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.library, Some(PathBuf::from("/tv")));
                assert_eq!(args.addr.port(), 9000);
                assert_eq!(args.font, PathBuf::from(render::DEFAULT_FONT));
                assert!(args.render_dir.is_none());
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }
}
