//! Pagesift main entry point
//!
//! Thin command-line driver for the crawl engine: creates tasks, runs them
//! to completion, and prints stored results.

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use pagesift::config::load_config_with_hash;
use pagesift::storage::{SqliteStorage, TaskStatus, TaskStore};
use pagesift::{CrawlEngine, StartOutcome};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Pagesift: single-page crawl task engine
#[derive(Parser, Debug)]
#[command(name = "pagesift")]
#[command(version = "1.0.0")]
#[command(about = "Analyze a web page and check its links", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a task for a URL, crawl it, and print the summary
    Run {
        /// The base URL to analyze
        url: String,
    },

    /// List all tasks and their statuses
    List,

    /// Show recorded broken links for a task
    Broken {
        /// The task id
        task_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    match cli.command {
        Commands::Run { url } => handle_run(&config, storage, &url).await?,
        Commands::List => handle_list(&storage)?,
        Commands::Broken { task_id } => handle_broken(&storage, task_id)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesift=info,warn"),
            1 => EnvFilter::new("pagesift=debug,info"),
            2 => EnvFilter::new("pagesift=trace,debug"),
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

/// Handles the `run` subcommand: crawl one URL end to end
async fn handle_run(
    config: &pagesift::Config,
    storage: SqliteStorage,
    url: &str,
) -> anyhow::Result<()> {
    let engine = CrawlEngine::new(config, storage)?;
    let store = engine.store();

    let task_id = store.lock().unwrap().create_task(url)?;
    println!("Created task {} for {}", task_id, url);

    match engine.start_crawl(task_id)? {
        StartOutcome::Accepted => tracing::info!("Crawl accepted for task {}", task_id),
        StartOutcome::NotFound => unreachable!("task was just created"),
    }

    // The start acknowledgment is immediate; poll the store for the
    // terminal status
    let task = loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let task = store
            .lock()
            .unwrap()
            .get_task(task_id)?
            .ok_or_else(|| anyhow!("task {} disappeared while running", task_id))?;
        if task.status.is_terminal() {
            break task;
        }
    };

    if task.status == TaskStatus::Failed {
        println!("Task {} failed", task_id);
        std::process::exit(1);
    }

    println!("\n=== Summary for task {} ===", task_id);
    println!("  URL:            {}", task.url);
    println!(
        "  HTML version:   {}",
        task.html_version.as_deref().unwrap_or("-")
    );
    println!(
        "  Title:          {}",
        task.page_title.as_deref().unwrap_or("-")
    );
    println!(
        "  Headings:       h1={} h2={} h3={}",
        task.h1_count.unwrap_or(0),
        task.h2_count.unwrap_or(0),
        task.h3_count.unwrap_or(0)
    );
    println!("  Internal links: {}", task.internal_links.unwrap_or(0));
    println!("  External links: {}", task.external_links.unwrap_or(0));
    println!("  Broken links:   {}", task.broken_links.unwrap_or(0));
    println!(
        "  Login form:     {}",
        if task.has_login_form.unwrap_or(false) {
            "yes"
        } else {
            "no"
        }
    );

    let broken = store.lock().unwrap().list_broken_links(task_id)?;
    if !broken.is_empty() {
        println!("\nBroken links:");
        for link in broken {
            println!("  {} ({})", link.url, link.status_code);
        }
    }

    Ok(())
}

/// Handles the `list` subcommand
fn handle_list(storage: &SqliteStorage) -> anyhow::Result<()> {
    let tasks = storage.list_tasks()?;
    if tasks.is_empty() {
        println!("No tasks recorded");
        return Ok(());
    }

    for task in tasks {
        println!(
            "{:>6}  {:<12}  {}",
            task.id,
            task.status.to_db_string(),
            task.url
        );
    }
    Ok(())
}

/// Handles the `broken` subcommand
fn handle_broken(storage: &SqliteStorage, task_id: i64) -> anyhow::Result<()> {
    let links = storage.list_broken_links(task_id)?;
    if links.is_empty() {
        println!("No broken links recorded for task {}", task_id);
        return Ok(());
    }

    for link in links {
        println!("{}  {}  {}", link.status_code, link.url, link.created_at);
    }
    Ok(())
}
