use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quotegif::{
    Renderer,
    SrtFiles,
    StoreBuilder,
    cli::{Cli, Command, SearchArgs, ServeArgs},
    config,
    error,
    library,
    search,
    server::{self, AppState},
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("QUOTEGIF_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Serve(args) => cmd_serve(args)?,
        Command::Search(args) => cmd_search(&args)?,
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_serve(args: ServeArgs) -> error::Result<()> {
    let root = config::resolve_library(args.library.as_deref())?;
    let render_dir = config::resolve_render_dir(args.render_dir.as_deref())?;

    // The corpus is complete before the listener opens.
    let builder = StoreBuilder::new()?.with_hit_limit(args.hits);
    let store = library::build_index_with(&root, &SrtFiles, builder)?;

    let renderer = Renderer::new(render_dir)
        .with_font(args.font)
        .with_ffmpeg(args.ffmpeg);
    let state = Arc::new(AppState { store, renderer });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server::serve(args.addr, state))
}

fn cmd_search(args: &SearchArgs) -> error::Result<()> {
    let root = config::resolve_library(args.library.as_deref())?;
    let builder = StoreBuilder::new()?.with_hit_limit(args.hits);
    let store = library::build_index_with(&root, &SrtFiles, builder)?;

    let results = if args.raw {
        store.search(&args.query)?
    } else {
        search::execute_search(&store, &args.query)?
    };

    if args.json {
        search::format_json(results)?;
    } else {
        search::format_human(&results, &store);
    }
    Ok(())
}
