//! Spacer main entry point
//!
//! This is the command-line interface for the Spacer forum archiver.

use anyhow::Context;
use clap::{Parser, Subcommand};
use spacer::config::{load_config, Config};
use spacer::output::{load_statistics, print_statistics, render_posts_table, render_users_table};
use spacer::crawler::{Coordinator, ThreadLister};
use spacer::storage::{open_storage, ForumStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Spacer: an incremental forum thread archiver
///
/// Spacer walks the pages of a forum thread, extracts posts and their
/// authors, and upserts them into a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "spacer")]
#[command(version)]
#[command(about = "An incremental forum thread archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a thread and store its posts and authors
    Posts {
        /// Thread slug, e.g. `nasas-perseverance-is-exploring-mars.37226`
        thread: String,

        /// First page to fetch
        #[arg(long, default_value_t = 1)]
        start: u32,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// List the thread slugs of a forum
    Threads {
        /// Forum slug, e.g. `space-exploration.4`
        forum: String,

        /// First page to fetch
        #[arg(long, default_value_t = 1)]
        start: u32,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Print the stored posts of a thread
    Show {
        /// Thread slug
        thread: String,
    },

    /// Print stored users
    Users {
        /// Only users with this display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show record counts from the database
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Posts {
            thread,
            start,
            max_pages,
        } => handle_posts(config, &thread, start, max_pages).await,
        Command::Threads {
            forum,
            start,
            max_pages,
        } => handle_threads(&config, &forum, start, max_pages).await,
        Command::Show { thread } => handle_show(&config, &thread),
        Command::Users { name } => handle_users(&config, name.as_deref()),
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spacer=info,warn"),
            1 => EnvFilter::new("spacer=debug,info"),
            2 => EnvFilter::new("spacer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `posts`: walks a thread, persisting as configured
async fn handle_posts(
    config: Config,
    thread: &str,
    start: u32,
    max_pages: Option<usize>,
) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.storage.database_path))
        .context("failed to open database")?;
    let mut coordinator = Coordinator::new(config, storage)?;

    let summary = coordinator.walk_thread(thread, start, max_pages).await?;

    println!(
        "{}: {} page(s), {} post(s), {} user(s) (stopped: {:?})",
        thread, summary.pages, summary.posts, summary.users, summary.stopped
    );
    Ok(())
}

/// Handles `threads`: prints every thread slug of a forum, one per line
async fn handle_threads(
    config: &Config,
    forum: &str,
    start: u32,
    max_pages: Option<usize>,
) -> anyhow::Result<()> {
    let lister = ThreadLister::new(config)?;

    for slug in lister.walk_forum(forum, start, max_pages).await? {
        println!("{}", slug);
    }
    Ok(())
}

/// Handles `show`: prints the stored posts of a thread
fn handle_show(config: &Config, thread: &str) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let posts = storage.posts_by_thread(thread)?;
    print!("{}", render_posts_table(&posts));
    Ok(())
}

/// Handles `users`: prints stored users, optionally filtered by name
fn handle_users(config: &Config, name: Option<&str>) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let users = match name {
        Some(name) => storage.users_by_name(name)?,
        None => storage.all_users()?,
    };
    print!("{}", render_users_table(&users));
    Ok(())
}

/// Handles `stats`: shows record counts
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);
    Ok(())
}
